//! SQLite-backed preferences storage.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{
    ClockPort, PlayerSettings, PreferencesRepo, RepoError, SavedProgress, DEFAULT_PLAYER_NAME,
};

const API_KEY: &str = "claude_api_key";
const PLAYER_NAME: &str = "player_name";
const SAVED_AFFECTION: &str = "saved_affection";
const SAVED_MISSION: &str = "saved_mission";

/// SQLite key/value implementation of [`PreferencesRepo`].
pub struct SqlitePreferencesRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqlitePreferencesRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("preferences", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("preferences", e))?;

        Ok(Self { pool, clock })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RepoError> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("preferences", e))?;
        Ok(row.map(|row| row.get("value")))
    }

    async fn get_int(&self, key: &str) -> Result<i64, RepoError> {
        match self.get(key).await? {
            Some(raw) => raw
                .parse()
                .map_err(|e| RepoError::serialization(format!("{key}: {e}"))),
            None => Ok(0),
        }
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("preferences", e))?;

        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO preferences (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(value)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("preferences", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("preferences", e))
    }
}

#[async_trait]
impl PreferencesRepo for SqlitePreferencesRepo {
    async fn load_settings(&self) -> Result<PlayerSettings, RepoError> {
        Ok(PlayerSettings {
            api_key: self.get(API_KEY).await?.unwrap_or_default(),
            player_name: self
                .get(PLAYER_NAME)
                .await?
                .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()),
        })
    }

    async fn save_settings(&self, settings: &PlayerSettings) -> Result<(), RepoError> {
        self.set_many(&[
            (API_KEY, settings.api_key.clone()),
            (PLAYER_NAME, settings.player_name.clone()),
        ])
        .await
    }

    async fn load_progress(&self) -> Result<SavedProgress, RepoError> {
        let mission = self.get_int(SAVED_MISSION).await?;
        let affection = self.get_int(SAVED_AFFECTION).await?;
        Ok(SavedProgress {
            mission_index: usize::try_from(mission).unwrap_or(0),
            affection: i32::try_from(affection).unwrap_or(0),
        })
    }

    async fn save_progress(&self, progress: SavedProgress) -> Result<(), RepoError> {
        self.set_many(&[
            (SAVED_MISSION, progress.mission_index.to_string()),
            (SAVED_AFFECTION, progress.affection.to_string()),
        ])
        .await
    }

    async fn clear_progress(&self) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM preferences WHERE key IN (?, ?)")
            .bind(SAVED_MISSION)
            .bind(SAVED_AFFECTION)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("preferences", e))?;
        Ok(())
    }
}
