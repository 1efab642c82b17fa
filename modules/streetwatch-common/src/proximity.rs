//! Proximity policies over the full record set. Two distinct consumers:
//! nearest-record display ranks in kilometers, radius alerting thresholds
//! in meters (reference threshold 500 m). Both are pure functions of the
//! user position and the records; neither mutates its input.

use serde::Serialize;
use uuid::Uuid;

use crate::geo::{haversine_km, haversine_m};
use crate::types::{CrimeRecord, Severity};

/// Reference alert radius in meters.
pub const DEFAULT_ALERT_RADIUS_M: f64 = 500.0;

/// Distances closer than this (in km) are treated as a tie and resolved
/// by upvotes.
const TIE_EPSILON_KM: f64 = 0.001;

/// Renderable summary of the single most relevant nearby record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestCrime {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub crime_type: String,
    pub location: String,
    pub address: String,
    pub severity: Severity,
    /// Distance from the user, rounded to two decimals.
    pub distance_km: f64,
    pub details: Option<String>,
    pub upvotes: u32,
    pub downvotes: u32,
}

/// One alert for a record inside the alert radius.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityAlert {
    pub id: Uuid,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub crime_type: String,
    pub address: String,
    pub distance_m: f64,
}

/// Nearest-record display policy: pick the minimum-distance record; on a
/// distance tie prefer the one with more upvotes. `None` when no records
/// exist.
pub fn nearest_record(lat: f64, lng: f64, records: &[CrimeRecord]) -> Option<NearestCrime> {
    let mut best: Option<(&CrimeRecord, f64)> = None;

    for record in records {
        let dist = haversine_km(lat, lng, record.latitude, record.longitude);
        best = match best {
            None => Some((record, dist)),
            Some((cur, cur_dist)) => {
                if dist < cur_dist - TIE_EPSILON_KM {
                    Some((record, dist))
                } else if (dist - cur_dist).abs() <= TIE_EPSILON_KM && record.upvotes > cur.upvotes
                {
                    Some((record, dist))
                } else {
                    Some((cur, cur_dist))
                }
            }
        };
    }

    best.map(|(record, dist)| NearestCrime {
        id: record.id,
        crime_type: record.crime_type.clone(),
        location: record.location.clone(),
        address: record.address.clone(),
        severity: record.severity,
        distance_km: (dist * 100.0).round() / 100.0,
        details: record.details.clone(),
        upvotes: record.upvotes,
        downvotes: record.downvotes,
    })
}

/// Radius alert policy: one alert per record within `radius_m` meters of
/// the user. No single-best selection; simultaneous alerts are expected.
pub fn radius_alerts(
    lat: f64,
    lng: f64,
    records: &[CrimeRecord],
    radius_m: f64,
) -> Vec<ProximityAlert> {
    records
        .iter()
        .filter_map(|record| {
            let dist = haversine_m(lat, lng, record.latitude, record.longitude);
            if dist <= radius_m {
                Some(ProximityAlert {
                    id: record.id,
                    severity: record.severity,
                    crime_type: record.crime_type.clone(),
                    address: record.address.clone(),
                    distance_m: dist.round(),
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // One degree of latitude is ~111km; offsets below are chosen relative
    // to a user at the origin of this grid.
    const USER_LAT: f64 = 44.9778;
    const USER_LNG: f64 = -93.265;

    fn record_at(lat: f64, lng: f64, upvotes: u32) -> CrimeRecord {
        CrimeRecord {
            id: Uuid::new_v4(),
            crime_type: "Theft".to_string(),
            location: "Downtown".to_string(),
            address: "100 Main Street".to_string(),
            latitude: lat,
            longitude: lng,
            severity: Severity::Yellow,
            details: None,
            upvotes,
            downvotes: 0,
            upvoted_by: (0..upvotes).map(|n| format!("v{n}@x.com")).collect(),
            downvoted_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_record_set_yields_none() {
        assert!(nearest_record(USER_LAT, USER_LNG, &[]).is_none());
    }

    #[test]
    fn picks_minimum_distance_record() {
        let near = record_at(USER_LAT + 0.001, USER_LNG, 0); // ~111m
        let far = record_at(USER_LAT + 0.01, USER_LNG, 10); // ~1.1km
        let records = vec![far, near.clone()];

        let nearest = nearest_record(USER_LAT, USER_LNG, &records).unwrap();
        assert_eq!(nearest.id, near.id);
    }

    #[test]
    fn distance_tie_prefers_more_upvotes() {
        // Two records ~1km away in opposite directions: equal distance.
        let south = record_at(USER_LAT - 0.009, USER_LNG, 3);
        let north = record_at(USER_LAT + 0.009, USER_LNG, 5);
        let records = vec![south, north.clone()];

        let nearest = nearest_record(USER_LAT, USER_LNG, &records).unwrap();
        assert_eq!(nearest.id, north.id);
        assert_eq!(nearest.upvotes, 5);
    }

    #[test]
    fn reports_rounded_distance_and_vote_counts() {
        let r = record_at(USER_LAT + 0.01, USER_LNG, 7); // ~1.11km
        let nearest = nearest_record(USER_LAT, USER_LNG, &[r]).unwrap();

        assert!((nearest.distance_km - 1.11).abs() < 0.02);
        // Two-decimal rounding
        assert_eq!(
            nearest.distance_km,
            (nearest.distance_km * 100.0).round() / 100.0
        );
        assert_eq!(nearest.upvotes, 7);
        assert_eq!(nearest.downvotes, 0);
    }

    #[test]
    fn alert_fires_inside_radius_only() {
        let inside = record_at(USER_LAT + 0.003, USER_LNG, 0); // ~333m
        let outside = record_at(USER_LAT + 0.006, USER_LNG, 0); // ~667m
        let records = vec![inside.clone(), outside];

        let alerts = radius_alerts(USER_LAT, USER_LNG, &records, DEFAULT_ALERT_RADIUS_M);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, inside.id);
        assert!((alerts[0].distance_m - 333.0).abs() < 10.0);
    }

    #[test]
    fn multiple_simultaneous_alerts_are_possible() {
        let a = record_at(USER_LAT + 0.001, USER_LNG, 0);
        let b = record_at(USER_LAT - 0.002, USER_LNG, 0);
        let c = record_at(USER_LAT, USER_LNG + 0.003, 0);
        let records = vec![a, b, c];

        let alerts = radius_alerts(USER_LAT, USER_LNG, &records, DEFAULT_ALERT_RADIUS_M);
        assert_eq!(alerts.len(), 3);
    }

    #[test]
    fn alerts_do_not_mutate_records() {
        let records = vec![record_at(USER_LAT, USER_LNG, 2)];
        let before = serde_json::to_string(&records).unwrap();
        let _ = radius_alerts(USER_LAT, USER_LNG, &records, DEFAULT_ALERT_RADIUS_M);
        let _ = nearest_record(USER_LAT, USER_LNG, &records);
        let after = serde_json::to_string(&records).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn alert_carries_severity_type_and_address() {
        let mut r = record_at(USER_LAT, USER_LNG, 0);
        r.severity = Severity::Red;
        r.crime_type = "Robbery".to_string();

        let alerts = radius_alerts(USER_LAT, USER_LNG, &[r], DEFAULT_ALERT_RADIUS_M);
        assert_eq!(alerts[0].severity, Severity::Red);
        assert_eq!(alerts[0].crime_type, "Robbery");
        assert_eq!(alerts[0].address, "100 Main Street");
    }
}
