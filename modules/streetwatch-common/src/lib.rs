pub mod types;
pub mod severity;
pub mod geo;
pub mod vote;
pub mod proximity;
pub mod config;
pub mod error;

pub use types::*;
pub use severity::SeverityTable;
pub use geo::{haversine_km, haversine_m};
pub use vote::{apply_vote, VoteOutcome};
pub use proximity::{nearest_record, radius_alerts, NearestCrime, ProximityAlert};
pub use config::Config;
pub use error::StreetWatchError;
