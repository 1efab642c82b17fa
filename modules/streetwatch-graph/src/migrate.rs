use neo4rs::query;
use tracing::{info, warn};

use crate::GraphClient;

/// Run idempotent schema migrations: constraints, indexes.
pub async fn migrate(client: &GraphClient) -> Result<(), neo4rs::Error> {
    let g = &client.graph;

    info!("Running schema migrations...");

    // --- Uniqueness constraints ---
    let constraints = [
        "CREATE CONSTRAINT crime_id IF NOT EXISTS FOR (c:Crime) REQUIRE c.id IS UNIQUE",
        "CREATE CONSTRAINT user_id IF NOT EXISTS FOR (u:User) REQUIRE u.id IS UNIQUE",
        "CREATE CONSTRAINT user_email IF NOT EXISTS FOR (u:User) REQUIRE u.email IS UNIQUE",
    ];

    for c in &constraints {
        run_ignoring_exists(g, c).await?;
    }
    info!("Uniqueness constraints created");

    // --- Property indexes (upvotes for the sorted feed, lat/lng for maps) ---
    let indexes = [
        "CREATE INDEX crime_upvotes IF NOT EXISTS FOR (c:Crime) ON (c.upvotes)",
        "CREATE INDEX crime_lat IF NOT EXISTS FOR (c:Crime) ON (c.lat)",
        "CREATE INDEX crime_lng IF NOT EXISTS FOR (c:Crime) ON (c.lng)",
    ];

    for idx in &indexes {
        run_ignoring_exists(g, idx).await?;
    }
    info!("Property indexes created");

    info!("Schema migration complete");
    Ok(())
}

/// Run a Cypher statement, ignoring errors that indicate the constraint/index
/// already exists (older servers without IF NOT EXISTS support).
async fn run_ignoring_exists(g: &neo4rs::Graph, cypher: &str) -> Result<(), neo4rs::Error> {
    match g.run(query(cypher)).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let msg = e.to_string().to_lowercase();
            if msg.contains("already exists") || msg.contains("equivalent") {
                warn!(
                    "Already exists (skipped): {}",
                    cypher.chars().take(80).collect::<String>()
                );
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}
