//! Storage-row types for every persisted entity.
//!
//! These are storage-agnostic: the Postgres store maps them to table
//! rows, the in-memory store keeps them as-is. All trophy/score/count
//! fields are unsigned; `trophy_change` is the single signed exception.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player row, upserted by tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Stable external identifier, `#`-prefixed. Immutable once assigned
    /// by the upstream system.
    pub tag: String,
    /// Display name.
    pub name: String,
    /// Experience level.
    pub level: u32,
    /// Current trophy count.
    pub trophies: u32,
}

/// A clan row, upserted by tag. Exists only if some ingested player
/// belongs to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanRecord {
    /// Stable external identifier, `#`-prefixed.
    pub tag: String,
    /// Clan name.
    pub name: String,
    /// Optional clan description.
    pub description: Option<String>,
    /// Badge identifier.
    pub badge_id: i64,
    /// Clan score.
    pub clan_score: u32,
    /// Number of members.
    pub members_count: u32,
}

/// A game-mode row, created on first reference from a challenge and
/// never deleted. The name is not overwritten on later references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameModeRecord {
    /// Upstream game-mode identifier.
    pub id: i64,
    /// Game-mode name; `"Unknown"` when the upstream omits one.
    pub name: String,
}

/// A challenge row, upserted by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    /// Upstream challenge identifier.
    pub id: i64,
    /// Challenge name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Challenge start time, when reported.
    pub start_time: Option<DateTime<Utc>>,
    /// Challenge end time, when reported.
    pub end_time: Option<DateTime<Utc>>,
    /// Win condition.
    pub win_mode: String,
    /// Whether the challenge is casual.
    pub casual: bool,
    /// Maximum allowed losses.
    pub max_losses: u32,
    /// Maximum allowed wins.
    pub max_wins: u32,
    /// Icon URL.
    pub icon_url: String,
    /// Referenced game mode.
    pub game_mode_id: i64,
    /// Optional parent challenge for nested sub-challenges.
    pub parent_id: Option<i64>,
}

/// A prize row. Prizes have no identity across runs: the owning
/// challenge's prize set is replaced wholesale on every re-ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRecord {
    /// Prize type (e.g. `"consumable"`).
    pub prize_type: Option<String>,
    /// Prize amount.
    pub amount: Option<u32>,
    /// Name of the consumable prize, when applicable.
    pub consumable_name: Option<String>,
}

/// A battle-log row, upserted by the battle's raw timestamp string.
///
/// If the upstream ever reuses a timestamp across distinct battles, the
/// later ingestion overwrites the earlier row. There is deliberately no
/// secondary disambiguator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Battle identifier, derived from the raw `battleTime` string.
    pub battle_id: String,
    /// Battle type.
    pub battle_type: String,
    /// Parsed battle timestamp.
    pub battle_time: DateTime<Utc>,
    /// Arena name.
    pub arena: String,
    /// Game-mode name.
    pub game_mode: String,
    /// Tag of the player of record (first team member).
    pub player_tag: String,
    /// Name of the player of record.
    pub player_name: String,
    /// Trophies before the battle.
    pub starting_trophies: u32,
    /// Trophy change after the battle; negative on a loss.
    pub trophy_change: i32,
    /// Crowns earned.
    pub crowns: u32,
    /// King-tower remaining hit points.
    pub king_tower_hp: u32,
    /// Princess-tower remaining hit points, in tower order.
    pub princess_tower_hp: Vec<u32>,
}

/// A card row, upserted by id from the card catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Upstream card identifier.
    pub id: i64,
    /// Card name.
    pub name: String,
    /// Maximum upgrade level.
    pub max_level: u32,
    /// Medium icon URL.
    pub icon_url: String,
    /// Rarity string.
    pub rarity: String,
    /// Card type string.
    pub card_type: String,
    /// Card description.
    pub description: String,
}
