//! Service layer: the ingestion pipeline, its report types, and the
//! serde views of the upstream JSON.

pub mod ingest;
pub mod report;
pub mod wire;

pub use ingest::{BATTLE_LOG_CAP, IngestService};
pub use report::{CardReport, IngestReport, StageOutcome};
