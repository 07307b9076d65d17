//! Domain layer: validated identifiers, decoded payloads, and the
//! storage-row types shared by every store implementation.

pub mod payload;
pub mod records;
pub mod tag;

pub use payload::Payload;
pub use records::{
    BattleRecord, CardRecord, ChallengeRecord, ClanRecord, GameModeRecord, PlayerRecord,
    PrizeRecord,
};
pub use tag::PlayerTag;
