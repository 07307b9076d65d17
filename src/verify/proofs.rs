//! Proof generation over stored records.

use std::sync::Arc;

use serde::Serialize;

use super::commitment;
use crate::error::IngestError;
use crate::storage::StatStore;

/// Outcome of a proof generation request.
#[derive(Debug, Clone, Serialize)]
pub struct Proof {
    /// Whether the claimed fact holds for the stored data.
    pub proof: bool,
    /// Commitment digest. `None` when the underlying record is missing,
    /// or for a challenge proof whose completion check failed.
    pub commitment: Option<String>,
    /// Human-readable description of the outcome.
    pub message: String,
}

/// Generates commitments and threshold proofs from stored records.
#[derive(Debug, Clone)]
pub struct VerificationService {
    store: Arc<dyn StatStore>,
}

impl VerificationService {
    /// Creates a verification service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn StatStore>) -> Self {
        Self { store }
    }

    /// Proves that a player's stored trophy count is strictly above a
    /// threshold.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure. A missing
    /// player is not an error; it yields `proof: false` with no
    /// commitment.
    pub async fn generate_trophy_proof(
        &self,
        player_tag: &str,
        threshold: u32,
    ) -> Result<Proof, IngestError> {
        let Some(player) = self.store.get_player(player_tag).await? else {
            return Ok(Proof {
                proof: false,
                commitment: None,
                message: format!("Player not found: {player_tag}"),
            });
        };

        let above = player.trophies > threshold;
        Ok(Proof {
            proof: above,
            commitment: Some(commitment::commit_trophy_count(player.trophies)),
            message: format!(
                "Trophy count is {} {threshold}.",
                if above { "above" } else { "not above" }
            ),
        })
    }

    /// Proves that a player has completed a challenge.
    ///
    /// Completion is defined as: at least one stored battle row for the
    /// tag with a non-negative trophy change. This is a coarse proxy
    /// unrelated to the specific challenge id and is preserved as-is
    /// for compatibility.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    pub async fn generate_challenge_proof(
        &self,
        player_tag: &str,
        challenge_id: i64,
    ) -> Result<Proof, IngestError> {
        let challenge = self.store.get_challenge(challenge_id).await?;
        let player = self.store.get_player(player_tag).await?;
        let (Some(challenge), Some(_)) = (challenge, player) else {
            return Ok(Proof {
                proof: false,
                commitment: None,
                message: format!(
                    "Challenge or player data not found: challenge {challenge_id}, player {player_tag}"
                ),
            });
        };

        let completed = self
            .store
            .battles_for_player(player_tag)
            .await?
            .iter()
            .any(|b| b.trophy_change >= 0);

        if completed {
            Ok(Proof {
                proof: true,
                commitment: Some(commitment::commit_challenge_completion(
                    challenge_id,
                    player_tag,
                )),
                message: format!(
                    "Player {player_tag} has completed the challenge {}.",
                    challenge.name
                ),
            })
        } else {
            Ok(Proof {
                proof: false,
                commitment: None,
                message: format!(
                    "Player {player_tag} has not completed the challenge {}.",
                    challenge.name
                ),
            })
        }
    }

    /// Computes the win/loss ratio from stored battles.
    ///
    /// A battle counts as a win when `crowns > 0`. No stored battles
    /// yields `0.0`. With wins but zero losses the ratio is the raw win
    /// count, a discontinuous branch that issued commitments depend on.
    /// Otherwise it is `(wins / losses) * 100`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    pub async fn calculate_win_loss_ratio(&self, player_tag: &str) -> Result<f64, IngestError> {
        let battles = self.store.battles_for_player(player_tag).await?;
        if battles.is_empty() {
            return Ok(0.0);
        }
        let wins = battles.iter().filter(|b| b.crowns > 0).count();
        let losses = battles.len() - wins;
        if losses == 0 {
            #[allow(clippy::cast_precision_loss)]
            return Ok(wins as f64);
        }
        #[allow(clippy::cast_precision_loss)]
        Ok((wins as f64 / losses as f64) * 100.0)
    }

    /// Proves that a player's win/loss ratio is strictly above a
    /// threshold.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Storage`] on backend failure.
    pub async fn generate_win_loss_proof(
        &self,
        player_tag: &str,
        threshold: f64,
    ) -> Result<Proof, IngestError> {
        let ratio = self.calculate_win_loss_ratio(player_tag).await?;
        let above = ratio > threshold;
        Ok(Proof {
            proof: above,
            commitment: Some(commitment::commit_win_loss_ratio(ratio)),
            message: format!(
                "Win-loss ratio of {ratio:.2}% is {} the threshold of {threshold}%.",
                if above { "above" } else { "below" }
            ),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BattleRecord, ChallengeRecord, PlayerRecord};
    use crate::storage::memory::MemoryStore;
    use crate::verify::commitment::{commit_trophy_count, commit_win_loss_ratio};
    use chrono::Utc;

    fn make_service() -> (Arc<MemoryStore>, VerificationService) {
        let store = Arc::new(MemoryStore::new());
        let service = VerificationService::new(Arc::clone(&store) as Arc<dyn StatStore>);
        (store, service)
    }

    fn player(tag: &str, trophies: u32) -> PlayerRecord {
        PlayerRecord {
            tag: tag.to_string(),
            name: "Tester".to_string(),
            level: 12,
            trophies,
        }
    }

    fn battle(id: &str, tag: &str, crowns: u32, trophy_change: i32) -> BattleRecord {
        BattleRecord {
            battle_id: id.to_string(),
            battle_type: "PvP".to_string(),
            battle_time: Utc::now(),
            arena: "Arena".to_string(),
            game_mode: "Ladder".to_string(),
            player_tag: tag.to_string(),
            player_name: "Tester".to_string(),
            starting_trophies: 4000,
            trophy_change,
            crowns,
            king_tower_hp: 1000,
            princess_tower_hp: vec![500, 500],
        }
    }

    fn challenge(id: i64, name: &str) -> ChallengeRecord {
        ChallengeRecord {
            id,
            name: name.to_string(),
            description: None,
            start_time: None,
            end_time: None,
            win_mode: String::new(),
            casual: false,
            max_losses: 3,
            max_wins: 12,
            icon_url: String::new(),
            game_mode_id: 1,
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn trophy_proof_above_threshold() {
        let (store, service) = make_service();
        let _ = store.upsert_player(&player("#AAA11111", 4500)).await;

        let Ok(proof) = service.generate_trophy_proof("#AAA11111", 4000).await else {
            panic!("proof generation failed");
        };
        assert!(proof.proof);
        assert_eq!(proof.commitment, Some(commit_trophy_count(4500)));
        assert!(proof.message.contains("above 4000"));
    }

    #[tokio::test]
    async fn trophy_proof_is_strict_greater_than() {
        let (store, service) = make_service();
        let _ = store.upsert_player(&player("#AAA11111", 4000)).await;

        let Ok(proof) = service.generate_trophy_proof("#AAA11111", 4000).await else {
            panic!("proof generation failed");
        };
        assert!(!proof.proof);
        // Commitment is still issued for a stored player.
        assert!(proof.commitment.is_some());
        assert!(proof.message.contains("not above"));
    }

    #[tokio::test]
    async fn trophy_proof_missing_player() {
        let (_store, service) = make_service();
        let Ok(proof) = service.generate_trophy_proof("#MISSING1", 4000).await else {
            panic!("proof generation failed");
        };
        assert!(!proof.proof);
        assert!(proof.commitment.is_none());
        assert!(proof.message.contains("Player not found"));
    }

    #[tokio::test]
    async fn ratio_with_no_battles_is_zero() {
        let (_store, service) = make_service();
        let Ok(ratio) = service.calculate_win_loss_ratio("#AAA11111").await else {
            panic!("ratio failed");
        };
        assert_eq!(ratio, 0.0);
    }

    #[tokio::test]
    async fn ratio_with_only_wins_is_the_win_count() {
        let (store, service) = make_service();
        let _ = store.upsert_battle(&battle("t1", "#AAA11111", 2, 30)).await;

        let Ok(ratio) = service.calculate_win_loss_ratio("#AAA11111").await else {
            panic!("ratio failed");
        };
        // One win, zero losses: the ratio is the win count, not x100.
        assert_eq!(ratio, 1.0);
    }

    #[tokio::test]
    async fn ratio_two_wins_one_loss_is_two_hundred() {
        let (store, service) = make_service();
        let _ = store.upsert_battle(&battle("t1", "#AAA11111", 2, 30)).await;
        let _ = store.upsert_battle(&battle("t2", "#AAA11111", 1, 28)).await;
        let _ = store.upsert_battle(&battle("t3", "#AAA11111", 0, -25)).await;

        let Ok(ratio) = service.calculate_win_loss_ratio("#AAA11111").await else {
            panic!("ratio failed");
        };
        assert_eq!(ratio, 200.0);
    }

    #[tokio::test]
    async fn win_loss_proof_commits_to_the_ratio() {
        let (store, service) = make_service();
        let _ = store.upsert_battle(&battle("t1", "#AAA11111", 2, 30)).await;
        let _ = store.upsert_battle(&battle("t2", "#AAA11111", 0, -20)).await;

        let Ok(proof) = service.generate_win_loss_proof("#AAA11111", 60.0).await else {
            panic!("proof generation failed");
        };
        // 1 win / 1 loss = 100.0
        assert!(proof.proof);
        assert_eq!(proof.commitment, Some(commit_win_loss_ratio(100.0)));
    }

    #[tokio::test]
    async fn challenge_proof_requires_both_records() {
        let (store, service) = make_service();
        let _ = store.upsert_player(&player("#AAA11111", 4000)).await;

        let Ok(proof) = service.generate_challenge_proof("#AAA11111", 999).await else {
            panic!("proof generation failed");
        };
        assert!(!proof.proof);
        assert!(proof.message.contains("not found"));
    }

    #[tokio::test]
    async fn challenge_proof_uses_nonnegative_trophy_change_proxy() {
        let (store, service) = make_service();
        let _ = store.upsert_player(&player("#AAA11111", 4000)).await;
        let _ = store.upsert_challenge(&challenge(77, "Grand Challenge")).await;

        // Only a losing battle with negative change: not "completed".
        let _ = store.upsert_battle(&battle("t1", "#AAA11111", 0, -30)).await;
        let Ok(proof) = service.generate_challenge_proof("#AAA11111", 77).await else {
            panic!("proof generation failed");
        };
        assert!(!proof.proof);
        assert!(proof.commitment.is_none());

        // Any battle with non-negative change flips it, regardless of
        // which challenge is asked about.
        let _ = store.upsert_battle(&battle("t2", "#AAA11111", 0, 0)).await;
        let Ok(proof) = service.generate_challenge_proof("#AAA11111", 77).await else {
            panic!("proof generation failed");
        };
        assert!(proof.proof);
        assert!(proof.message.contains("Grand Challenge"));
    }
}
