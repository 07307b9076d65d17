//! One-way digests over stored facts.
//!
//! All commitments use SHA-256 and produce a lowercase hex string. The
//! exact input encodings are load-bearing: a trophy count commits over
//! its decimal form, a ratio over its two-decimal form, and challenge
//! completion over `"{id}-{tag}-completed"`. Commit and verify must
//! agree on these forever, or previously issued digests stop verifying.

use sha2::{Digest, Sha256};

/// SHA-256 of a UTF-8 string as lowercase hex.
fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// Commits to a trophy count via its decimal string form.
#[must_use]
pub fn commit_trophy_count(trophies: u32) -> String {
    sha256_hex(&trophies.to_string())
}

/// Verifies a trophy commitment by recomputation.
#[must_use]
pub fn verify_trophy_proof(commitment: &str, trophies: u32) -> bool {
    commitment == commit_trophy_count(trophies)
}

/// Commits to a challenge completion fact for a player.
#[must_use]
pub fn commit_challenge_completion(challenge_id: i64, player_tag: &str) -> String {
    sha256_hex(&format!("{challenge_id}-{player_tag}-completed"))
}

/// Verifies a challenge-completion commitment by recomputation.
#[must_use]
pub fn verify_challenge_proof(commitment: &str, challenge_id: i64, player_tag: &str) -> bool {
    commitment == commit_challenge_completion(challenge_id, player_tag)
}

/// Commits to a win/loss ratio formatted to exactly two decimal places.
#[must_use]
pub fn commit_win_loss_ratio(ratio: f64) -> String {
    sha256_hex(&format!("{ratio:.2}"))
}

/// Verifies a win/loss-ratio commitment by recomputation.
#[must_use]
pub fn verify_win_loss_proof(commitment: &str, ratio: f64) -> bool {
    commitment == commit_win_loss_ratio(ratio)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn trophy_commitment_matches_known_vector() {
        // sha256("4000")
        assert_eq!(
            commit_trophy_count(4000),
            "b090147020e033534635010c4f7eb6fc270d44e5df67ea9e744a8087df9ca106"
        );
    }

    #[test]
    fn trophy_round_trip_law() {
        for trophies in [0, 1, 4000, 9999, u32::MAX] {
            let digest = commit_trophy_count(trophies);
            assert!(verify_trophy_proof(&digest, trophies));
        }
    }

    #[test]
    fn trophy_commitments_differ_for_adjacent_counts() {
        assert_ne!(commit_trophy_count(4000), commit_trophy_count(4001));
        assert!(!verify_trophy_proof(&commit_trophy_count(4000), 4001));
    }

    #[test]
    fn challenge_commitment_matches_known_vector() {
        // sha256("998877-#ABCDE123-completed")
        assert_eq!(
            commit_challenge_completion(998_877, "#ABCDE123"),
            "03593ddd2e164deca102778a9cfaf0f6a977334a50abdfc0378f4d4da7293ecf"
        );
    }

    #[test]
    fn challenge_round_trip_law() {
        let digest = commit_challenge_completion(12345, "#2PP90QQ");
        assert!(verify_challenge_proof(&digest, 12345, "#2PP90QQ"));
        assert!(!verify_challenge_proof(&digest, 12346, "#2PP90QQ"));
        assert!(!verify_challenge_proof(&digest, 12345, "#OTHER99"));
    }

    #[test]
    fn ratio_commitment_uses_two_decimal_form() {
        // sha256("0.00") and sha256("200.00")
        assert_eq!(
            commit_win_loss_ratio(0.0),
            "561b2814d3c09e62a92442c946307918f7f63f833c84876c08bd4c406767e53b"
        );
        assert_eq!(
            commit_win_loss_ratio(200.0),
            "1472eb6753d7abde7196d73661dcb4427500bb340f10ddd34824506e9dd3266b"
        );
    }

    #[test]
    fn ratio_values_equal_after_rounding_commit_identically() {
        assert_eq!(commit_win_loss_ratio(66.666), commit_win_loss_ratio(66.670));
        assert!(verify_win_loss_proof(&commit_win_loss_ratio(66.666), 66.67));
    }
}
