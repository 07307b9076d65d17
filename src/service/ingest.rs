//! The ingestion pipeline.
//!
//! `ingest_player` runs four sequential stages (player, clan,
//! challenges, battle log), each independently fault-tolerant. The tag
//! shape check happens before any network call. No error crosses the
//! pipeline boundary except the pre-network validation failure: every
//! later fault is folded into the returned [`IngestReport`], and
//! whatever stages completed before a fault keep their effects.

use std::sync::Arc;

use crate::domain::tag::encode_tag;
use crate::domain::{
    BattleRecord, CardRecord, ChallengeRecord, ClanRecord, GameModeRecord, Payload, PlayerRecord,
    PlayerTag, PrizeRecord,
};
use crate::error::IngestError;
use crate::gateway::ApiGateway;
use crate::storage::StatStore;

use super::report::{CardReport, IngestReport, StageOutcome};
use super::wire::{
    BattlePayload, CardPayload, ChallengeGroup, ChallengePayload, ClanPayload, PlayerPayload,
    parse_battle_time,
};

/// Battle-log entries considered per run: the first 50 in arrival
/// order, never resorted.
pub const BATTLE_LOG_CAP: usize = 50;

/// Orchestrates fetch-and-upsert for one player tag.
#[derive(Debug, Clone)]
pub struct IngestService {
    gateway: ApiGateway,
    store: Arc<dyn StatStore>,
}

impl IngestService {
    /// Creates a pipeline over the given gateway and store.
    #[must_use]
    pub fn new(gateway: ApiGateway, store: Arc<dyn StatStore>) -> Self {
        Self { gateway, store }
    }

    /// Runs the full pipeline for one player tag.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidTag`] if the tag fails the shape
    /// check; in that case no network call has been made. For a valid
    /// tag this never returns `Err`; all stage failures are reported
    /// inside the [`IngestReport`].
    pub async fn ingest_player(&self, raw_tag: &str) -> Result<IngestReport, IngestError> {
        let tag = PlayerTag::parse(raw_tag)?;
        let mut report = IngestReport::new(tag.as_str());

        // Stage 1: player. A failure here stops the run; the remaining
        // stages keep their initial "skipped" outcome.
        let clan_tag = match self.player_stage(&tag).await {
            Ok(clan_tag) => {
                report.player = StageOutcome::Completed;
                clan_tag
            }
            Err(err) => {
                tracing::warn!(tag = %tag, error = %err, "player stage failed, stopping run");
                report.player = StageOutcome::Failed(err.to_string());
                return Ok(report);
            }
        };

        // Stage 2: clan. Absence of a clan tag is a valid terminal
        // state; any failure is logged and the run continues.
        match clan_tag {
            Some(clan_tag) => match self.clan_stage(&clan_tag).await {
                Ok(()) => report.clan = StageOutcome::Completed,
                Err(err) => {
                    tracing::warn!(clan_tag = %clan_tag, error = %err, "clan stage failed");
                    report.clan = StageOutcome::Failed(err.to_string());
                }
            },
            None => {
                tracing::info!(tag = %tag, "player is not part of a clan");
                report.clan = StageOutcome::Skipped;
            }
        }

        // Stage 3: challenges.
        if let Err(err) = self.challenges_stage(&mut report).await {
            tracing::warn!(error = %err, "challenges stage failed");
            report.challenges = StageOutcome::Failed(err.to_string());
        }

        // Stage 4: battle log.
        if let Err(err) = self.battles_stage(&tag, &mut report).await {
            tracing::warn!(tag = %tag, error = %err, "battle-log stage failed");
            report.battles = StageOutcome::Failed(err.to_string());
        }

        Ok(report)
    }

    /// Fetches and upserts the card catalog from `/cards`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Upstream`] if the fetch fails or the body
    /// is not an item list. Per-card failures are logged and counted,
    /// not raised.
    pub async fn ingest_cards(&self) -> Result<CardReport, IngestError> {
        let payload = self.gateway.fetch("/cards", None).await?;
        let Payload::Items(items) = payload else {
            return Err(IngestError::Upstream(
                "cards data is not in the expected format".to_string(),
            ));
        };

        let mut report = CardReport::default();
        for value in items {
            match self.process_card(value).await {
                Ok(()) => report.stored += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "error processing card");
                    report.skipped += 1;
                }
            }
        }
        Ok(report)
    }

    /// Fetches the player and upserts the row. Returns the clan tag
    /// when the player belongs to one.
    async fn player_stage(&self, tag: &PlayerTag) -> Result<Option<String>, IngestError> {
        let path = format!("/players/{}", tag.encoded());
        let payload = self.gateway.fetch(&path, None).await?;

        let Payload::Object(map) = payload else {
            return Err(IngestError::NotFound(format!("no player data found for {tag}")));
        };
        if !map.contains_key("tag") {
            return Err(IngestError::NotFound(format!("no player data found for {tag}")));
        }

        let player: PlayerPayload = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| IngestError::Upstream(format!("malformed player payload: {e}")))?;

        self.store
            .upsert_player(&PlayerRecord {
                tag: player.tag,
                name: player.name,
                level: player.exp_level,
                trophies: player.trophies,
            })
            .await?;

        Ok(player.clan.and_then(|c| c.tag))
    }

    /// Fetches the clan and upserts the row.
    async fn clan_stage(&self, clan_tag: &str) -> Result<(), IngestError> {
        let path = format!("/clans/{}", encode_tag(clan_tag));
        let payload = self.gateway.fetch(&path, None).await?;

        let Payload::Object(map) = payload else {
            return Err(IngestError::NotFound(format!(
                "no clan data found for {clan_tag}"
            )));
        };
        if !map.contains_key("tag") {
            return Err(IngestError::NotFound(format!(
                "no clan data found for {clan_tag}"
            )));
        }

        let clan: ClanPayload = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| IngestError::Upstream(format!("malformed clan payload: {e}")))?;

        self.store
            .upsert_clan(&ClanRecord {
                tag: clan.tag,
                name: clan.name,
                description: clan.description,
                badge_id: clan.badge_id,
                clan_score: clan.clan_score,
                members_count: clan.members,
            })
            .await?;

        Ok(())
    }

    /// Fetches all challenge groups and upserts each challenge. One bad
    /// challenge is skipped and counted, never fatal to its siblings.
    async fn challenges_stage(&self, report: &mut IngestReport) -> Result<(), IngestError> {
        let payload = self.gateway.fetch("/challenges", None).await?;
        let Payload::Items(groups) = payload else {
            return Err(IngestError::Upstream(
                "challenges data is not in the expected format".to_string(),
            ));
        };

        for group in groups {
            let group: ChallengeGroup = match serde_json::from_value(group) {
                Ok(group) => group,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed challenge group");
                    report.challenges_skipped += 1;
                    continue;
                }
            };
            for value in group.challenges {
                match self.process_challenge(value).await {
                    Ok(name) => {
                        tracing::info!(challenge = %name, "challenge upserted");
                        report.challenges_upserted += 1;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "error processing challenge");
                        report.challenges_skipped += 1;
                    }
                }
            }
        }

        report.challenges = if report.challenges_skipped > 0 {
            StageOutcome::Partial
        } else {
            StageOutcome::Completed
        };
        Ok(())
    }

    /// Upserts one challenge: game mode, challenge row, prize set.
    async fn process_challenge(&self, value: serde_json::Value) -> Result<String, IngestError> {
        let challenge: ChallengePayload = serde_json::from_value(value)
            .map_err(|e| IngestError::Upstream(format!("malformed challenge: {e}")))?;

        let mode = challenge.game_mode.as_ref();
        let Some(mode_id) = mode.and_then(|m| m.id) else {
            return Err(IngestError::NotFound(format!(
                "challenge {} has no game-mode id",
                challenge.id
            )));
        };
        let mode_name = mode
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        self.store
            .ensure_game_mode(&GameModeRecord {
                id: mode_id,
                name: mode_name,
            })
            .await?;

        let record = ChallengeRecord {
            id: challenge.id,
            name: challenge.name,
            description: challenge.description,
            start_time: challenge.start_time.as_deref().and_then(parse_battle_time),
            end_time: challenge.end_time.as_deref().and_then(parse_battle_time),
            win_mode: challenge.win_mode,
            casual: challenge.casual,
            max_losses: challenge.max_losses,
            max_wins: challenge.max_wins,
            icon_url: challenge.icon_url,
            game_mode_id: mode_id,
            parent_id: None,
        };
        self.store.upsert_challenge(&record).await?;

        let prizes: Vec<PrizeRecord> = challenge
            .prizes
            .into_iter()
            .map(|p| PrizeRecord {
                prize_type: p.prize_type,
                amount: p.amount,
                consumable_name: p.consumable_name,
            })
            .collect();
        self.store.replace_prizes(record.id, &prizes).await?;

        Ok(record.name)
    }

    /// Fetches the battle log and upserts the first [`BATTLE_LOG_CAP`]
    /// entries in arrival order.
    async fn battles_stage(
        &self,
        tag: &PlayerTag,
        report: &mut IngestReport,
    ) -> Result<(), IngestError> {
        let path = format!("/players/{}/battlelog", tag.encoded());
        let payload = self.gateway.fetch(&path, None).await?;
        let Payload::Items(battles) = payload else {
            return Err(IngestError::Upstream(
                "no valid battle log data found".to_string(),
            ));
        };

        for value in battles.into_iter().take(BATTLE_LOG_CAP) {
            match self.process_battle(value).await {
                Ok(true) => report.battles_recorded += 1,
                Ok(false) => report.battles_skipped += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "error processing battle");
                    report.battles_skipped += 1;
                }
            }
        }

        report.battles = if report.battles_skipped > 0 {
            StageOutcome::Partial
        } else {
            StageOutcome::Completed
        };
        Ok(())
    }

    /// Upserts one battle. Returns `Ok(false)` for a battle with no
    /// team entries, which is skipped without being an error.
    async fn process_battle(&self, value: serde_json::Value) -> Result<bool, IngestError> {
        let battle: BattlePayload = serde_json::from_value(value)
            .map_err(|e| IngestError::Upstream(format!("malformed battle: {e}")))?;

        let Some(member) = battle.team.first().cloned() else {
            tracing::warn!(battle_time = %battle.battle_time, "no team data for battle");
            return Ok(false);
        };

        let Some(battle_time) = parse_battle_time(&battle.battle_time) else {
            return Err(IngestError::Upstream(format!(
                "battle has unparseable battleTime {:?}",
                battle.battle_time
            )));
        };

        self.store
            .upsert_battle(&BattleRecord {
                battle_id: battle.battle_time,
                battle_type: battle.battle_type,
                battle_time,
                arena: battle
                    .arena
                    .and_then(|a| a.name)
                    .unwrap_or_else(|| "Unknown Arena".to_string()),
                game_mode: battle
                    .game_mode
                    .and_then(|m| m.name)
                    .unwrap_or_else(|| "Unknown Mode".to_string()),
                player_tag: member.tag,
                player_name: member.name,
                starting_trophies: member.starting_trophies,
                trophy_change: member.trophy_change,
                crowns: member.crowns,
                king_tower_hp: member.king_tower_hit_points,
                princess_tower_hp: member.princess_towers_hit_points,
            })
            .await?;
        Ok(true)
    }

    /// Upserts one card from the catalog.
    async fn process_card(&self, value: serde_json::Value) -> Result<(), IngestError> {
        let card: CardPayload = serde_json::from_value(value)
            .map_err(|e| IngestError::Upstream(format!("malformed card: {e}")))?;
        self.store
            .upsert_card(&CardRecord {
                id: card.id,
                name: card.name,
                max_level: card.max_level,
                icon_url: card.icon_urls.medium,
                rarity: card.rarity,
                card_type: card.card_type,
                description: card.description,
            })
            .await?;
        Ok(())
    }
}
