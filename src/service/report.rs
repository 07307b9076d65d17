//! Structured result of an ingestion run.

use std::fmt;

use serde::Serialize;

/// Outcome of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StageOutcome {
    /// The stage ran and every item it touched succeeded.
    Completed,
    /// The stage ran but some items were skipped; see the report counts.
    Partial,
    /// The stage did not run: either a prerequisite was absent (a player
    /// with no clan) or an earlier stage stopped the run.
    Skipped,
    /// The stage failed outright.
    Failed(String),
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Partial => write!(f, "partial"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Per-stage outcomes and counts for one ingestion run.
///
/// Carries everything a caller needs to render a summary without
/// re-deriving it from storage.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// The tag the run was requested for.
    pub player_tag: String,
    /// Player stage outcome.
    pub player: StageOutcome,
    /// Clan stage outcome.
    pub clan: StageOutcome,
    /// Challenges stage outcome.
    pub challenges: StageOutcome,
    /// Battle-log stage outcome.
    pub battles: StageOutcome,
    /// Challenges upserted this run.
    pub challenges_upserted: usize,
    /// Challenges skipped due to per-item failures, including whole
    /// groups that failed to decode.
    pub challenges_skipped: usize,
    /// Battles recorded this run.
    pub battles_recorded: usize,
    /// Battles skipped (empty team or per-item failure).
    pub battles_skipped: usize,
}

impl IngestReport {
    /// Creates a report with every stage pending (marked skipped).
    #[must_use]
    pub fn new(player_tag: &str) -> Self {
        Self {
            player_tag: player_tag.to_string(),
            player: StageOutcome::Skipped,
            clan: StageOutcome::Skipped,
            challenges: StageOutcome::Skipped,
            battles: StageOutcome::Skipped,
            challenges_upserted: 0,
            challenges_skipped: 0,
            battles_recorded: 0,
            battles_skipped: 0,
        }
    }

    /// Returns `true` when no stage failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        ![&self.player, &self.clan, &self.challenges, &self.battles]
            .iter()
            .any(|s| matches!(s, StageOutcome::Failed(_)))
    }

    /// Renders a human-readable multi-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "ingestion for {}:\n  player:     {}\n  clan:       {}\n  challenges: {} ({} upserted, {} skipped)\n  battle log: {} ({} recorded, {} skipped)",
            self.player_tag,
            self.player,
            self.clan,
            self.challenges,
            self.challenges_upserted,
            self.challenges_skipped,
            self.battles,
            self.battles_recorded,
            self.battles_skipped,
        )
    }
}

/// Counts from a card-catalog ingestion run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CardReport {
    /// Cards upserted.
    pub stored: usize,
    /// Cards skipped due to per-item failures.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_report_counts_are_zero() {
        let report = IngestReport::new("#ABCDE123");
        assert_eq!(report.challenges_upserted, 0);
        assert_eq!(report.battles_recorded, 0);
        assert!(report.is_success());
    }

    #[test]
    fn failed_stage_marks_report_unsuccessful() {
        let mut report = IngestReport::new("#ABCDE123");
        report.clan = StageOutcome::Failed("HTTP 500".to_string());
        assert!(!report.is_success());
    }

    #[test]
    fn summary_mentions_every_stage() {
        let report = IngestReport::new("#ABCDE123");
        let summary = report.summary();
        for needle in ["player", "clan", "challenges", "battle log"] {
            assert!(summary.contains(needle), "missing {needle}");
        }
    }
}
