use chrono::{DateTime, NaiveDateTime, Utc};
use neo4rs::query;
use uuid::Uuid;

use streetwatch_common::{vote::sort_by_upvotes, CrimeRecord, Severity, UserAccount};

use crate::GraphClient;

/// Read side of the store.
pub struct CrimeReader {
    client: GraphClient,
}

impl CrimeReader {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// All crime records ordered by upvotes descending. The store retrieves;
    /// the record engine owns the sort order (ties keep creation order so
    /// the listing is deterministic per run).
    pub async fn list_by_upvotes(&self) -> Result<Vec<CrimeRecord>, neo4rs::Error> {
        let q = query("MATCH (c:Crime) RETURN c");

        let mut records = Vec::new();
        let mut stream = self.client.graph.execute(q).await?;
        while let Some(row) = stream.next().await? {
            if let Some(record) = row_to_crime(&row) {
                records.push(record);
            }
        }

        sort_by_upvotes(&mut records);
        Ok(records)
    }

    /// Fetch one record by id.
    pub async fn get_crime(&self, id: Uuid) -> Result<Option<CrimeRecord>, neo4rs::Error> {
        let q = query("MATCH (c:Crime {id: $id}) RETURN c").param("id", id.to_string());

        let mut stream = self.client.graph.execute(q).await?;
        if let Some(row) = stream.next().await? {
            return Ok(row_to_crime(&row));
        }

        Ok(None)
    }

    /// Look up an account by its unique email.
    pub async fn find_user(&self, email: &str) -> Result<Option<UserAccount>, neo4rs::Error> {
        let q = query("MATCH (u:User {email: $email}) RETURN u").param("email", email);

        let mut stream = self.client.graph.execute(q).await?;
        if let Some(row) = stream.next().await? {
            return Ok(row_to_user(&row));
        }

        Ok(None)
    }
}

/// Parse a neo4rs Row holding a `c:Crime` node into a CrimeRecord.
pub fn row_to_crime(row: &neo4rs::Row) -> Option<CrimeRecord> {
    let n: neo4rs::Node = row.get("c").ok()?;

    let id_str: String = n.get("id").ok()?;
    let id = Uuid::parse_str(&id_str).ok()?;

    let crime_type: String = n.get("crime_type").unwrap_or_default();
    let location: String = n.get("location").unwrap_or_default();
    let address: String = n.get("address").unwrap_or_default();
    let latitude: f64 = n.get("lat").unwrap_or(0.0);
    let longitude: f64 = n.get("lng").unwrap_or(0.0);
    let severity_str: String = n.get("severity").unwrap_or_default();
    let details: String = n.get("details").unwrap_or_default();
    let upvotes: i64 = n.get("upvotes").unwrap_or(0);
    let downvotes: i64 = n.get("downvotes").unwrap_or(0);
    let upvoted_by: Vec<String> = n.get("upvoted_by").unwrap_or_default();
    let downvoted_by: Vec<String> = n.get("downvoted_by").unwrap_or_default();
    let created_at = parse_datetime_prop(&n, "created_at");

    Some(CrimeRecord {
        id,
        crime_type,
        location,
        address,
        latitude,
        longitude,
        severity: Severity::from_str_loose(&severity_str),
        details: if details.is_empty() {
            None
        } else {
            Some(details)
        },
        upvotes: upvotes.max(0) as u32,
        downvotes: downvotes.max(0) as u32,
        upvoted_by,
        downvoted_by,
        created_at,
    })
}

/// Parse a neo4rs Row holding a `u:User` node into a UserAccount.
pub fn row_to_user(row: &neo4rs::Row) -> Option<UserAccount> {
    let n: neo4rs::Node = row.get("u").ok()?;

    let id_str: String = n.get("id").ok()?;
    let id = Uuid::parse_str(&id_str).ok()?;

    let username: String = n.get("username").unwrap_or_default();
    let email: String = n.get("email").unwrap_or_default();
    let password_hash: String = n.get("password_hash").unwrap_or_default();
    let created_at = parse_datetime_prop(&n, "created_at");

    Some(UserAccount {
        id,
        username,
        email,
        password_hash,
        created_at,
    })
}

fn parse_datetime_prop(n: &neo4rs::Node, prop: &str) -> DateTime<Utc> {
    let raw: String = n.get(prop).unwrap_or_default();
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .unwrap_or_else(Utc::now)
}
