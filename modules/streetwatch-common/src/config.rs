use std::env;

use crate::proximity::DEFAULT_ALERT_RADIUS_M;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Neo4j
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    // Geocoding
    pub nominatim_url: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Proximity
    pub alert_radius_m: f64,

    // Severity table extensions (comma-separated category lists)
    pub extra_red_types: Vec<String>,
    pub extra_yellow_types: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            neo4j_uri: required_env("NEO4J_URI"),
            neo4j_user: required_env("NEO4J_USER"),
            neo4j_password: required_env("NEO4J_PASSWORD"),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            alert_radius_m: env::var("ALERT_RADIUS_M")
                .ok()
                .map(|v| v.parse().expect("ALERT_RADIUS_M must be a number"))
                .unwrap_or(DEFAULT_ALERT_RADIUS_M),
            extra_red_types: csv_env("SEVERITY_RED_TYPES"),
            extra_yellow_types: csv_env("SEVERITY_YELLOW_TYPES"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn csv_env(key: &str) -> Vec<String> {
    env::var(key)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
