//! Serde views of the upstream API's JSON bodies.
//!
//! Field defaults mirror the upstream's lenient contract: identifiers
//! and names that drive upserts are required (a body without them is a
//! stage or item failure), everything else falls back to the documented
//! default values.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// `GET /players/{tag}` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    /// Player tag as reported by the upstream.
    pub tag: String,
    /// Display name.
    pub name: String,
    /// Experience level.
    #[serde(default)]
    pub exp_level: u32,
    /// Trophy count.
    #[serde(default)]
    pub trophies: u32,
    /// Clan membership, when the player is in one.
    #[serde(default)]
    pub clan: Option<ClanRef>,
}

/// Nested clan reference inside a player payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ClanRef {
    /// Clan tag; absence means the player has no clan.
    #[serde(default)]
    pub tag: Option<String>,
}

/// `GET /clans/{tag}` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanPayload {
    /// Clan tag.
    pub tag: String,
    /// Clan name.
    pub name: String,
    /// Clan description.
    #[serde(default)]
    pub description: Option<String>,
    /// Badge identifier.
    pub badge_id: i64,
    /// Clan score.
    pub clan_score: u32,
    /// Member count.
    pub members: u32,
}

/// One challenge group from `GET /challenges`.
///
/// Each member of `challenges` stays a raw value so a malformed entry
/// fails individually instead of poisoning the whole group.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeGroup {
    /// The group's challenges.
    #[serde(default)]
    pub challenges: Vec<serde_json::Value>,
}

/// A single challenge object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// Challenge identifier.
    pub id: i64,
    /// Challenge name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Start time in the upstream's compact format.
    #[serde(default)]
    pub start_time: Option<String>,
    /// End time in the upstream's compact format.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Win condition.
    #[serde(default)]
    pub win_mode: String,
    /// Casual flag.
    #[serde(default)]
    pub casual: bool,
    /// Maximum allowed losses.
    #[serde(default)]
    pub max_losses: u32,
    /// Maximum allowed wins.
    #[serde(default)]
    pub max_wins: u32,
    /// Icon URL.
    #[serde(default)]
    pub icon_url: String,
    /// Game-mode reference.
    #[serde(default)]
    pub game_mode: Option<GameModeRef>,
    /// Prize list; replaced wholesale on every ingestion.
    #[serde(default)]
    pub prizes: Vec<PrizePayload>,
}

/// Nested game-mode reference inside a challenge.
#[derive(Debug, Clone, Deserialize)]
pub struct GameModeRef {
    /// Game-mode identifier.
    #[serde(default)]
    pub id: Option<i64>,
    /// Game-mode name.
    #[serde(default)]
    pub name: Option<String>,
}

/// One prize inside a challenge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizePayload {
    /// Prize type.
    #[serde(default, rename = "type")]
    pub prize_type: Option<String>,
    /// Prize amount.
    #[serde(default)]
    pub amount: Option<u32>,
    /// Consumable name.
    #[serde(default)]
    pub consumable_name: Option<String>,
}

/// One battle from `GET /players/{tag}/battlelog`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattlePayload {
    /// Battle type.
    #[serde(default = "unknown", rename = "type")]
    pub battle_type: String,
    /// Raw battle timestamp; doubles as the battle identifier.
    #[serde(default)]
    pub battle_time: String,
    /// Arena reference.
    #[serde(default)]
    pub arena: Option<NamedRef>,
    /// Game-mode reference.
    #[serde(default)]
    pub game_mode: Option<NamedRef>,
    /// Team members; the first entry is the player of record.
    #[serde(default)]
    pub team: Vec<TeamMember>,
}

/// A name-only nested object (arena, battle game mode).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    /// The referenced name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A team entry inside a battle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Player tag.
    #[serde(default)]
    pub tag: String,
    /// Player name.
    #[serde(default = "unknown")]
    pub name: String,
    /// Trophies before the battle.
    #[serde(default)]
    pub starting_trophies: u32,
    /// Trophy change; negative on a loss.
    #[serde(default)]
    pub trophy_change: i32,
    /// Crowns earned.
    #[serde(default)]
    pub crowns: u32,
    /// King-tower remaining hit points.
    #[serde(default)]
    pub king_tower_hit_points: u32,
    /// Princess-tower remaining hit points.
    #[serde(default = "default_princess_towers")]
    pub princess_towers_hit_points: Vec<u32>,
}

/// One card from `GET /cards`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    /// Card identifier.
    pub id: i64,
    /// Card name.
    pub name: String,
    /// Maximum upgrade level.
    pub max_level: u32,
    /// Icon URL set.
    pub icon_urls: IconUrls,
    /// Rarity string.
    #[serde(default)]
    pub rarity: String,
    /// Card type string.
    #[serde(default, rename = "type")]
    pub card_type: String,
    /// Card description.
    #[serde(default)]
    pub description: String,
}

/// Icon URL set on a card.
#[derive(Debug, Clone, Deserialize)]
pub struct IconUrls {
    /// Medium-size icon URL.
    pub medium: String,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn default_princess_towers() -> Vec<u32> {
    vec![0, 0]
}

/// Parses the upstream's compact timestamp form, e.g.
/// `20240101T120000.000Z`.
#[must_use]
pub fn parse_battle_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S%.fZ")
        .ok()
        .map(|naive| naive.and_utc())
}
