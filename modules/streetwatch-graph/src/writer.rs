use chrono::{DateTime, Utc};
use neo4rs::query;
use tracing::info;
use uuid::Uuid;

use streetwatch_common::{CrimeRecord, UserAccount, VoteDirection};

use crate::reader::row_to_crime;
use crate::GraphClient;

/// Result of an atomic vote update.
#[derive(Debug, Clone)]
pub struct VoteUpdate {
    pub record: CrimeRecord,
    /// False when the voter had already voted in this direction and the
    /// statement left the record untouched.
    pub applied: bool,
}

/// Write side of the store. Crime records are created once and mutated only
/// through `apply_vote`.
pub struct CrimeWriter {
    client: GraphClient,
}

impl CrimeWriter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Persist a new crime record. Returns the record's UUID.
    pub async fn create_crime(&self, record: &CrimeRecord) -> Result<Uuid, neo4rs::Error> {
        let q = query(
            "CREATE (c:Crime {
                id: $id,
                crime_type: $crime_type,
                location: $location,
                address: $address,
                lat: $lat,
                lng: $lng,
                severity: $severity,
                details: $details,
                upvotes: $upvotes,
                downvotes: $downvotes,
                upvoted_by: $upvoted_by,
                downvoted_by: $downvoted_by,
                created_at: $created_at
            }) RETURN c.id AS id",
        )
        .param("id", record.id.to_string())
        .param("crime_type", record.crime_type.as_str())
        .param("location", record.location.as_str())
        .param("address", record.address.as_str())
        .param("lat", record.latitude)
        .param("lng", record.longitude)
        .param("severity", record.severity.to_string())
        .param("details", record.details.as_deref().unwrap_or(""))
        .param("upvotes", record.upvotes as i64)
        .param("downvotes", record.downvotes as i64)
        .param("upvoted_by", record.upvoted_by.clone())
        .param("downvoted_by", record.downvoted_by.clone())
        .param("created_at", format_datetime(&record.created_at));

        let mut stream = self.client.graph.execute(q).await?;
        while stream.next().await?.is_some() {}

        info!(id = %record.id, severity = %record.severity, "Crime record created");
        Ok(record.id)
    }

    /// Apply one vote as a single conditional update keyed on voter-absence.
    /// The whole transition — including removal of an opposite vote — runs
    /// server-side in one statement, so concurrent voters cannot lose
    /// updates. Returns `None` when the id matches no record.
    pub async fn apply_vote(
        &self,
        id: Uuid,
        voter: &str,
        direction: VoteDirection,
    ) -> Result<Option<VoteUpdate>, neo4rs::Error> {
        // Same-direction membership makes the statement a no-op; an
        // opposite-direction vote is retracted in the same write.
        let (votes, list, other_votes, other_list) = match direction {
            VoteDirection::Up => ("upvotes", "upvoted_by", "downvotes", "downvoted_by"),
            VoteDirection::Down => ("downvotes", "downvoted_by", "upvotes", "upvoted_by"),
        };

        let cypher = format!(
            "MATCH (c:Crime {{id: $id}})
             WITH c,
                  $voter IN c.{list} AS already_voted,
                  $voter IN c.{other_list} AS had_opposite
             SET c.{votes} = CASE WHEN already_voted THEN c.{votes} ELSE c.{votes} + 1 END,
                 c.{list} = CASE WHEN already_voted THEN c.{list} ELSE c.{list} + $voter END,
                 c.{other_votes} = CASE WHEN had_opposite THEN c.{other_votes} - 1 ELSE c.{other_votes} END,
                 c.{other_list} = CASE WHEN had_opposite THEN [v IN c.{other_list} WHERE v <> $voter] ELSE c.{other_list} END
             RETURN c, already_voted"
        );

        let q = query(&cypher)
            .param("id", id.to_string())
            .param("voter", voter);

        let mut stream = self.client.graph.execute(q).await?;
        if let Some(row) = stream.next().await? {
            let already_voted: bool = row.get("already_voted").unwrap_or(false);
            if let Some(record) = row_to_crime(&row) {
                return Ok(Some(VoteUpdate {
                    record,
                    applied: !already_voted,
                }));
            }
        }

        Ok(None)
    }

    /// Create a user account, keyed on the unique email. Returns false when
    /// the email is already registered; the existing account is untouched.
    pub async fn create_user(&self, user: &UserAccount) -> Result<bool, neo4rs::Error> {
        let q = query(
            "MERGE (u:User {email: $email})
             ON CREATE SET u.id = $id,
                           u.username = $username,
                           u.password_hash = $password_hash,
                           u.created_at = $created_at,
                           u.newly_created = true
             ON MATCH SET u.newly_created = false
             WITH u, u.newly_created AS created
             REMOVE u.newly_created
             RETURN created",
        )
        .param("email", user.email.as_str())
        .param("id", user.id.to_string())
        .param("username", user.username.as_str())
        .param("password_hash", user.password_hash.as_str())
        .param("created_at", format_datetime(&user.created_at));

        let mut stream = self.client.graph.execute(q).await?;
        let mut created = false;
        if let Some(row) = stream.next().await? {
            created = row.get("created").unwrap_or(false);
        }
        while stream.next().await?.is_some() {}

        if created {
            info!(email = %user.email, "User registered");
        }
        Ok(created)
    }
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
