pub mod error;

pub use error::{NominatimError, Result};

use std::time::Duration;

use serde::Deserialize;

/// Resolved coordinates for a free-text location query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One entry of a Nominatim /search JSON response. Coordinates arrive as
/// strings.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: &str) -> Self {
        // Nominatim's usage policy requires an identifying User-Agent.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("streetwatch/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a free-text location to coordinates via the /search endpoint.
    /// Returns the first match, or `NotFound` if the query resolves to
    /// nothing.
    pub async fn search(&self, query: &str) -> Result<GeoPoint> {
        let endpoint = format!("{}/search", self.base_url);

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(NominatimError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let results: Vec<SearchResult> = resp.json().await?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| NominatimError::NotFound(query.to_string()))?;

        let lat = first
            .lat
            .parse()
            .map_err(|_| NominatimError::Parse(format!("bad latitude: {}", first.lat)))?;
        let lng = first
            .lon
            .parse()
            .map_err(|_| NominatimError::Parse(format!("bad longitude: {}", first.lon)))?;

        tracing::debug!(query, lat, lng, "Geocoded location");
        Ok(GeoPoint { lat, lng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_parses_string_coordinates() {
        let json = r#"[{"lat": "44.9778", "lon": "-93.2650", "display_name": "Minneapolis"}]"#;
        let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat, "44.9778");
        assert_eq!(results[0].lon, "-93.2650");
    }

    #[test]
    fn empty_response_parses_to_no_results() {
        let results: Vec<SearchResult> = serde_json::from_str("[]").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = NominatimClient::new("https://nominatim.example.org/");
        assert_eq!(client.base_url, "https://nominatim.example.org");
    }
}
