//! Request handling for the Statboard HTTP service
//!
//! Transport-agnostic: bodies arrive as raw bytes and every failure is a
//! [`StatsError`] for the transport to map onto a status.

use crate::auth::Authorizer;
use bytes::Bytes;
use statboard::{Document, Result, StatsDB, StatsError};
use statboard_types::player::PlayerRecord;
use statboard_types::request::{LeaderboardRequest, UpdatePlayerRequest};
use std::sync::Arc;

/// Every request runs independently on the blocking pool; the store's
/// `replace_or_insert` is what keeps concurrent writes for one player apart.
#[derive(Clone)]
pub struct Handler {
    db: Arc<StatsDB>,
    auth: Authorizer,
}

impl Handler {
    pub fn new(db: Arc<StatsDB>, auth: Authorizer) -> Self {
        Self { db, auth }
    }

    pub fn db(&self) -> &Arc<StatsDB> {
        &self.db
    }

    /// Decode a leaderboard read and run it.
    pub async fn leaderboard(&self, body: Bytes) -> Result<Vec<Document>> {
        let request: LeaderboardRequest = serde_json::from_slice(&body)?;

        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.leaderboard(&request))
            .await
            .map_err(|e| StatsError::Other(format!("Read task failed: {}", e)))?
    }

    /// Authorize, decode and apply a player write.
    pub async fn update_player(
        &self,
        authorization: Option<&str>,
        body: Bytes,
    ) -> Result<PlayerRecord> {
        self.auth.check(authorization)?;
        let request: UpdatePlayerRequest = serde_json::from_slice(&body)?;

        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.upsert_player(request))
            .await
            .map_err(|e| StatsError::Other(format!("Write task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> Handler {
        Handler::new(
            Arc::new(StatsDB::memory()),
            Authorizer::new("secret").unwrap(),
        )
    }

    const WRITE: &str = r#"{
        "server": {"serverName": "s1", "season": 1},
        "uuid": "u1",
        "name": "Bob",
        "stats": {"custom": {"minecraft:deaths": 2}},
        "advancements": []
    }"#;

    #[tokio::test]
    async fn test_unauthorized_write_is_rejected_before_decoding() {
        let handler = handler();
        let result = handler
            .update_player(Some("Key wrong"), Bytes::from_static(b"not json"))
            .await;
        assert!(matches!(result, Err(StatsError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_decode_errors() {
        let handler = handler();

        let read = handler.leaderboard(Bytes::from_static(b"{")).await;
        assert!(matches!(read, Err(StatsError::Decode(_))));

        let write = handler
            .update_player(Some("Key secret"), Bytes::from_static(b"[]"))
            .await;
        assert!(matches!(write, Err(StatsError::Decode(_))));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let handler = handler();
        let record = handler
            .update_player(Some("Key secret"), Bytes::from_static(WRITE.as_bytes()))
            .await
            .unwrap();
        assert_eq!(record.name, "Bob");

        let rows = handler
            .leaderboard(Bytes::from_static(
                br#"{"server": {"serverName": "s1", "season": 1}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["uuid"], "u1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_run_independently() {
        let handler = handler();

        let writes = (0..32).map(|i| {
            let handler = handler.clone();
            let uuid = if i % 2 == 0 { "u1" } else { "u2" };
            let body = WRITE.replace("\"u1\"", &format!("\"{}\"", uuid));
            tokio::spawn(async move {
                handler
                    .update_player(Some("Key secret"), Bytes::from(body))
                    .await
            })
        });

        for write in futures::future::join_all(writes).await {
            assert!(write.unwrap().is_ok());
        }
        assert_eq!(handler.db().stats().unwrap().document_count, 2);
    }
}
