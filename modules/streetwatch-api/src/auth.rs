use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Hash a password with a fresh random salt. Stored form is `salt$hexdigest`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = sign(password, &salt);
    format!("{salt}${digest}")
}

/// Verify a password against its stored `salt$hexdigest` form.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    constant_time_eq(sign(password, salt).as_bytes(), digest.as_bytes())
}

fn sign(password: &str, salt: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC can take key of any size");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_password() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
    }

    #[test]
    fn rejects_wrong_password() {
        let stored = hash_password("hunter2");
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn rejects_tampered_hash() {
        let stored = hash_password("hunter2");
        let tampered = format!("{stored}ff");
        assert!(!verify_password("hunter2", &tampered));
    }

    #[test]
    fn rejects_malformed_stored_value() {
        assert!(!verify_password("hunter2", "no-dollar-separator"));
        assert!(!verify_password("hunter2", ""));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("hunter2");
        let b = hash_password("hunter2");
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a));
        assert!(verify_password("hunter2", &b));
    }
}
