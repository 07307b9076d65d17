//! Commitment and verification module.
//!
//! Three independent sub-protocols (trophy count, challenge completion,
//! win/loss ratio), each a `commit(value) -> digest` / `verify(digest,
//! value) -> bool` pair where `verify` recomputes the commit and
//! compares for equality. The digests are tamper-evidence checksums,
//! not a cryptographic proof system: there is no secrecy, no soundness
//! guarantee, and no need for constant-time comparison.
//!
//! Proof generators read already-stored rows through [`StatStore`] and
//! are independent of the live fetch.
//!
//! [`StatStore`]: crate::storage::StatStore

pub mod commitment;
pub mod proofs;

pub use commitment::{
    commit_challenge_completion, commit_trophy_count, commit_win_loss_ratio,
    verify_challenge_proof, verify_trophy_proof, verify_win_loss_proof,
};
pub use proofs::{Proof, VerificationService};
