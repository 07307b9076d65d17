//! In-memory [`StatStore`] backed by `tokio::sync::RwLock` maps.
//!
//! Used by the pipeline and verification tests, and handy for dry runs
//! without a database. Mirrors the upsert semantics of the Postgres
//! store exactly, including the get-or-create behavior of game modes
//! and wholesale prize replacement.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StatStore;
use crate::domain::{
    BattleRecord, CardRecord, ChallengeRecord, ClanRecord, GameModeRecord, PlayerRecord,
    PrizeRecord,
};
use crate::error::IngestError;

/// Hash-map store; every entity keyed by its external identifier.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<HashMap<String, PlayerRecord>>,
    clans: RwLock<HashMap<String, ClanRecord>>,
    game_modes: RwLock<HashMap<i64, GameModeRecord>>,
    challenges: RwLock<HashMap<i64, ChallengeRecord>>,
    prizes: RwLock<HashMap<i64, Vec<PrizeRecord>>>,
    battles: RwLock<HashMap<String, BattleRecord>>,
    cards: RwLock<HashMap<i64, CardRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored battles across all players.
    pub async fn battle_count(&self) -> usize {
        self.battles.read().await.len()
    }
}

#[async_trait]
impl StatStore for MemoryStore {
    async fn upsert_player(&self, player: &PlayerRecord) -> Result<(), IngestError> {
        self.players
            .write()
            .await
            .insert(player.tag.clone(), player.clone());
        Ok(())
    }

    async fn get_player(&self, tag: &str) -> Result<Option<PlayerRecord>, IngestError> {
        Ok(self.players.read().await.get(tag).cloned())
    }

    async fn upsert_clan(&self, clan: &ClanRecord) -> Result<(), IngestError> {
        self.clans
            .write()
            .await
            .insert(clan.tag.clone(), clan.clone());
        Ok(())
    }

    async fn ensure_game_mode(&self, mode: &GameModeRecord) -> Result<(), IngestError> {
        self.game_modes
            .write()
            .await
            .entry(mode.id)
            .or_insert_with(|| mode.clone());
        Ok(())
    }

    async fn upsert_challenge(&self, challenge: &ChallengeRecord) -> Result<(), IngestError> {
        self.challenges
            .write()
            .await
            .insert(challenge.id, challenge.clone());
        Ok(())
    }

    async fn get_challenge(&self, id: i64) -> Result<Option<ChallengeRecord>, IngestError> {
        Ok(self.challenges.read().await.get(&id).cloned())
    }

    async fn replace_prizes(
        &self,
        challenge_id: i64,
        prizes: &[PrizeRecord],
    ) -> Result<(), IngestError> {
        self.prizes
            .write()
            .await
            .insert(challenge_id, prizes.to_vec());
        Ok(())
    }

    async fn prizes_for_challenge(
        &self,
        challenge_id: i64,
    ) -> Result<Vec<PrizeRecord>, IngestError> {
        Ok(self
            .prizes
            .read()
            .await
            .get(&challenge_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_battle(&self, battle: &BattleRecord) -> Result<(), IngestError> {
        self.battles
            .write()
            .await
            .insert(battle.battle_id.clone(), battle.clone());
        Ok(())
    }

    async fn battles_for_player(&self, tag: &str) -> Result<Vec<BattleRecord>, IngestError> {
        let mut battles: Vec<BattleRecord> = self
            .battles
            .read()
            .await
            .values()
            .filter(|b| b.player_tag == tag)
            .cloned()
            .collect();
        battles.sort_by(|a, b| a.battle_time.cmp(&b.battle_time));
        Ok(battles)
    }

    async fn upsert_card(&self, card: &CardRecord) -> Result<(), IngestError> {
        self.cards.write().await.insert(card.id, card.clone());
        Ok(())
    }
}
