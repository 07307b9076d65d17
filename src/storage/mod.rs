//! Persistence layer: the [`StatStore`] trait plus its PostgreSQL and
//! in-memory implementations.
//!
//! Every write is an upsert keyed by the entity's external identifier;
//! the single exception is the prize set, which is replaced wholesale.
//! The pipeline wraps no transaction across stages; per-row atomicity
//! is the store's only guarantee, and concurrent runs for the same tag
//! are last-write-wins per row.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{
    BattleRecord, CardRecord, ChallengeRecord, ClanRecord, GameModeRecord, PlayerRecord,
    PrizeRecord,
};
use crate::error::IngestError;

/// Storage seam between the pipeline, the verification module, and the
/// concrete backends.
#[async_trait]
pub trait StatStore: Send + Sync + std::fmt::Debug {
    /// Inserts or updates a player row by tag.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn upsert_player(&self, player: &PlayerRecord) -> Result<(), IngestError>;

    /// Looks up a player by tag.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn get_player(&self, tag: &str) -> Result<Option<PlayerRecord>, IngestError>;

    /// Inserts or updates a clan row by tag.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn upsert_clan(&self, clan: &ClanRecord) -> Result<(), IngestError>;

    /// Creates a game mode if absent. An existing row's name is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn ensure_game_mode(&self, mode: &GameModeRecord) -> Result<(), IngestError>;

    /// Inserts or updates a challenge row by id.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn upsert_challenge(&self, challenge: &ChallengeRecord) -> Result<(), IngestError>;

    /// Looks up a challenge by id.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn get_challenge(&self, id: i64) -> Result<Option<ChallengeRecord>, IngestError>;

    /// Replaces the full prize set of a challenge: old rows deleted,
    /// new rows inserted, as one atomic unit where the backend supports
    /// transactions.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn replace_prizes(
        &self,
        challenge_id: i64,
        prizes: &[PrizeRecord],
    ) -> Result<(), IngestError>;

    /// Returns the current prize set of a challenge.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn prizes_for_challenge(&self, challenge_id: i64)
    -> Result<Vec<PrizeRecord>, IngestError>;

    /// Inserts or updates a battle row keyed by the derived battle id.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn upsert_battle(&self, battle: &BattleRecord) -> Result<(), IngestError>;

    /// Returns all stored battles for a player tag.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn battles_for_player(&self, tag: &str) -> Result<Vec<BattleRecord>, IngestError>;

    /// Inserts or updates a card row by id.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    async fn upsert_card(&self, card: &CardRecord) -> Result<(), IngestError>;
}
