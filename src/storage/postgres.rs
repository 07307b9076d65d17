//! PostgreSQL implementation of [`StatStore`] using `sqlx::PgPool`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::StatStore;
use crate::config::AppConfig;
use crate::domain::{
    BattleRecord, CardRecord, ChallengeRecord, ClanRecord, GameModeRecord, PlayerRecord,
    PrizeRecord,
};
use crate::error::IngestError;

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store from an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the configured database and applies pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] if the pool cannot be created
    /// or a migration fails.
    pub async fn connect(config: &AppConfig) -> Result<Self, IngestError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;

        Ok(Self { pool })
    }
}

/// Narrows a stored `BIGINT` back to the domain's unsigned width.
/// Values outside range collapse to zero rather than faulting the read.
fn as_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

#[async_trait::async_trait]
impl StatStore for PgStore {
    async fn upsert_player(&self, player: &PlayerRecord) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO players (tag, name, level, trophies) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (tag) DO UPDATE SET \
             name = EXCLUDED.name, level = EXCLUDED.level, trophies = EXCLUDED.trophies",
        )
        .bind(&player.tag)
        .bind(&player.name)
        .bind(i64::from(player.level))
        .bind(i64::from(player.trophies))
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get_player(&self, tag: &str) -> Result<Option<PlayerRecord>, IngestError> {
        let row = sqlx::query_as::<_, (String, String, i64, i64)>(
            "SELECT tag, name, level, trophies FROM players WHERE tag = $1",
        )
        .bind(tag)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;

        Ok(row.map(|(tag, name, level, trophies)| PlayerRecord {
            tag,
            name,
            level: as_u32(level),
            trophies: as_u32(trophies),
        }))
    }

    async fn upsert_clan(&self, clan: &ClanRecord) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO clans (tag, name, description, badge_id, clan_score, members_count) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (tag) DO UPDATE SET \
             name = EXCLUDED.name, description = EXCLUDED.description, \
             badge_id = EXCLUDED.badge_id, clan_score = EXCLUDED.clan_score, \
             members_count = EXCLUDED.members_count",
        )
        .bind(&clan.tag)
        .bind(&clan.name)
        .bind(&clan.description)
        .bind(clan.badge_id)
        .bind(i64::from(clan.clan_score))
        .bind(i64::from(clan.members_count))
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn ensure_game_mode(&self, mode: &GameModeRecord) -> Result<(), IngestError> {
        // get-or-create: an existing name is never overwritten.
        sqlx::query("INSERT INTO game_modes (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(mode.id)
            .bind(&mode.name)
            .execute(&self.pool)
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn upsert_challenge(&self, challenge: &ChallengeRecord) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO challenges \
             (id, name, description, start_time, end_time, win_mode, casual, \
              max_losses, max_wins, icon_url, game_mode_id, parent_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (id) DO UPDATE SET \
             name = EXCLUDED.name, description = EXCLUDED.description, \
             start_time = EXCLUDED.start_time, end_time = EXCLUDED.end_time, \
             win_mode = EXCLUDED.win_mode, casual = EXCLUDED.casual, \
             max_losses = EXCLUDED.max_losses, max_wins = EXCLUDED.max_wins, \
             icon_url = EXCLUDED.icon_url, game_mode_id = EXCLUDED.game_mode_id, \
             parent_id = EXCLUDED.parent_id",
        )
        .bind(challenge.id)
        .bind(&challenge.name)
        .bind(&challenge.description)
        .bind(challenge.start_time)
        .bind(challenge.end_time)
        .bind(&challenge.win_mode)
        .bind(challenge.casual)
        .bind(i64::from(challenge.max_losses))
        .bind(i64::from(challenge.max_wins))
        .bind(&challenge.icon_url)
        .bind(challenge.game_mode_id)
        .bind(challenge.parent_id)
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get_challenge(&self, id: i64) -> Result<Option<ChallengeRecord>, IngestError> {
        type ChallengeRow = (
            i64,
            String,
            Option<String>,
            Option<DateTime<Utc>>,
            Option<DateTime<Utc>>,
            String,
            bool,
            i64,
            i64,
            String,
            i64,
            Option<i64>,
        );
        let row = sqlx::query_as::<_, ChallengeRow>(
            "SELECT id, name, description, start_time, end_time, win_mode, casual, \
             max_losses, max_wins, icon_url, game_mode_id, parent_id \
             FROM challenges WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;

        Ok(row.map(
            |(
                id,
                name,
                description,
                start_time,
                end_time,
                win_mode,
                casual,
                max_losses,
                max_wins,
                icon_url,
                game_mode_id,
                parent_id,
            )| {
                ChallengeRecord {
                    id,
                    name,
                    description,
                    start_time,
                    end_time,
                    win_mode,
                    casual,
                    max_losses: as_u32(max_losses),
                    max_wins: as_u32(max_wins),
                    icon_url,
                    game_mode_id,
                    parent_id,
                }
            },
        ))
    }

    async fn replace_prizes(
        &self,
        challenge_id: i64,
        prizes: &[PrizeRecord],
    ) -> Result<(), IngestError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;

        sqlx::query("DELETE FROM prizes WHERE challenge_id = $1")
            .bind(challenge_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;

        for prize in prizes {
            sqlx::query(
                "INSERT INTO prizes (challenge_id, prize_type, amount, consumable_name) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(challenge_id)
            .bind(&prize.prize_type)
            .bind(prize.amount.map(i64::from))
            .bind(&prize.consumable_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn prizes_for_challenge(
        &self,
        challenge_id: i64,
    ) -> Result<Vec<PrizeRecord>, IngestError> {
        let rows = sqlx::query_as::<_, (Option<String>, Option<i64>, Option<String>)>(
            "SELECT prize_type, amount, consumable_name FROM prizes \
             WHERE challenge_id = $1 ORDER BY id",
        )
        .bind(challenge_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(prize_type, amount, consumable_name)| PrizeRecord {
                prize_type,
                amount: amount.map(as_u32),
                consumable_name,
            })
            .collect())
    }

    async fn upsert_battle(&self, battle: &BattleRecord) -> Result<(), IngestError> {
        let princess_hp = serde_json::to_value(&battle.princess_tower_hp)
            .map_err(|e| IngestError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO battle_logs \
             (battle_id, battle_type, battle_time, arena, game_mode, player_tag, \
              player_name, starting_trophies, trophy_change, crowns, king_tower_hp, \
              princess_tower_hp) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (battle_id) DO UPDATE SET \
             battle_type = EXCLUDED.battle_type, battle_time = EXCLUDED.battle_time, \
             arena = EXCLUDED.arena, game_mode = EXCLUDED.game_mode, \
             player_tag = EXCLUDED.player_tag, player_name = EXCLUDED.player_name, \
             starting_trophies = EXCLUDED.starting_trophies, \
             trophy_change = EXCLUDED.trophy_change, crowns = EXCLUDED.crowns, \
             king_tower_hp = EXCLUDED.king_tower_hp, \
             princess_tower_hp = EXCLUDED.princess_tower_hp",
        )
        .bind(&battle.battle_id)
        .bind(&battle.battle_type)
        .bind(battle.battle_time)
        .bind(&battle.arena)
        .bind(&battle.game_mode)
        .bind(&battle.player_tag)
        .bind(&battle.player_name)
        .bind(i64::from(battle.starting_trophies))
        .bind(i64::from(battle.trophy_change))
        .bind(i64::from(battle.crowns))
        .bind(i64::from(battle.king_tower_hp))
        .bind(princess_hp)
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn battles_for_player(&self, tag: &str) -> Result<Vec<BattleRecord>, IngestError> {
        type BattleRow = (
            String,
            String,
            DateTime<Utc>,
            String,
            String,
            String,
            String,
            i64,
            i64,
            i64,
            i64,
            serde_json::Value,
        );
        let rows = sqlx::query_as::<_, BattleRow>(
            "SELECT battle_id, battle_type, battle_time, arena, game_mode, player_tag, \
             player_name, starting_trophies, trophy_change, crowns, king_tower_hp, \
             princess_tower_hp \
             FROM battle_logs WHERE player_tag = $1 ORDER BY battle_time",
        )
        .bind(tag)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    battle_id,
                    battle_type,
                    battle_time,
                    arena,
                    game_mode,
                    player_tag,
                    player_name,
                    starting_trophies,
                    trophy_change,
                    crowns,
                    king_tower_hp,
                    princess_hp,
                )| {
                    BattleRecord {
                        battle_id,
                        battle_type,
                        battle_time,
                        arena,
                        game_mode,
                        player_tag,
                        player_name,
                        starting_trophies: as_u32(starting_trophies),
                        trophy_change: i32::try_from(trophy_change).unwrap_or(0),
                        crowns: as_u32(crowns),
                        king_tower_hp: as_u32(king_tower_hp),
                        princess_tower_hp: serde_json::from_value(princess_hp).unwrap_or_default(),
                    }
                },
            )
            .collect())
    }

    async fn upsert_card(&self, card: &CardRecord) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO cards (id, name, max_level, icon_url, rarity, card_type, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET \
             name = EXCLUDED.name, max_level = EXCLUDED.max_level, \
             icon_url = EXCLUDED.icon_url, rarity = EXCLUDED.rarity, \
             card_type = EXCLUDED.card_type, description = EXCLUDED.description",
        )
        .bind(card.id)
        .bind(&card.name)
        .bind(i64::from(card.max_level))
        .bind(&card.icon_url)
        .bind(&card.rarity)
        .bind(&card.card_type)
        .bind(&card.description)
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Storage(e.to_string()))?;
        Ok(())
    }
}
