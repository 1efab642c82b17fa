use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Enums ---

/// Coarse risk tag assigned to a crime record at creation, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Red,
    Yellow,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Red => write!(f, "red"),
            Severity::Yellow => write!(f, "yellow"),
        }
    }
}

impl Severity {
    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "red" => Severity::Red,
            _ => Severity::Yellow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

impl std::fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteDirection::Up => write!(f, "up"),
            VoteDirection::Down => write!(f, "down"),
        }
    }
}

/// A voter's standing relative to one record. Mutually exclusive states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoterState {
    None,
    Upvoted,
    Downvoted,
}

// --- Crime Record ---

/// A reported incident. Created once via submission, mutated only by votes,
/// never deleted. Wire format is camelCase to match the public JSON API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub crime_type: String,
    pub location: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub severity: Severity,
    pub details: Option<String>,
    pub upvotes: u32,
    pub downvotes: u32,
    /// Voter emails. A voter appears in at most one of the two lists;
    /// `upvotes == upvoted_by.len()` holds after every mutation.
    pub upvoted_by: Vec<String>,
    pub downvoted_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CrimeRecord {
    pub fn voter_state(&self, voter: &str) -> VoterState {
        if self.upvoted_by.iter().any(|v| v == voter) {
            VoterState::Upvoted
        } else if self.downvoted_by.iter().any(|v| v == voter) {
            VoterState::Downvoted
        } else {
            VoterState::None
        }
    }
}

/// Validate a submission payload before classification and persistence.
/// Returns the name of the first missing required field.
pub fn validate_submission(
    crime_type: &str,
    location: &str,
    address: &str,
) -> Result<(), &'static str> {
    if crime_type.trim().is_empty() {
        return Err("type");
    }
    if location.trim().is_empty() {
        return Err("location");
    }
    if address.trim().is_empty() {
        return Err("address");
    }
    Ok(())
}

// --- User Account ---

/// A registered account. The email doubles as the voter identifier.
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Salted hash, never exposed through the API.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record_with_votes(up: &[&str], down: &[&str]) -> CrimeRecord {
        CrimeRecord {
            id: Uuid::new_v4(),
            crime_type: "Theft".to_string(),
            location: "Elm Street".to_string(),
            address: "12 Elm Street".to_string(),
            latitude: 44.9778,
            longitude: -93.265,
            severity: Severity::Yellow,
            details: None,
            upvotes: up.len() as u32,
            downvotes: down.len() as u32,
            upvoted_by: up.iter().map(|s| s.to_string()).collect(),
            downvoted_by: down.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn voter_state_reflects_membership() {
        let r = record_with_votes(&["a@x.com"], &["b@x.com"]);
        assert_eq!(r.voter_state("a@x.com"), VoterState::Upvoted);
        assert_eq!(r.voter_state("b@x.com"), VoterState::Downvoted);
        assert_eq!(r.voter_state("c@x.com"), VoterState::None);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Red).unwrap(), "\"red\"");
        assert_eq!(
            serde_json::to_string(&Severity::Yellow).unwrap(),
            "\"yellow\""
        );
    }

    #[test]
    fn record_wire_format_is_camel_case() {
        let r = record_with_votes(&["a@x.com"], &[]);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("upvotedBy").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("crime_type").is_none());
    }

    #[test]
    fn validate_rejects_empty_required_fields() {
        assert_eq!(validate_submission("", "loc", "addr"), Err("type"));
        assert_eq!(validate_submission("Theft", "  ", "addr"), Err("location"));
        assert_eq!(validate_submission("Theft", "loc", ""), Err("address"));
        assert!(validate_submission("Theft", "loc", "addr").is_ok());
    }

    #[test]
    fn password_hash_not_serialized() {
        let u = UserAccount {
            id: Uuid::new_v4(),
            username: "sam".to_string(),
            email: "sam@x.com".to_string(),
            password_hash: "salt$deadbeef".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&u).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
