//! # arena-ingest
//!
//! Fetches game statistics for a player from the upstream REST API,
//! persists them to PostgreSQL, and issues SHA-256 commitments over the
//! stored facts.
//!
//! A run is a four-stage pipeline (player, clan, challenges, battle
//! log) where each stage is fault-tolerant on its own: a mid-run
//! failure is recorded in the report and the remaining stages still
//! execute, except a player-stage failure, which stops the run.
//!
//! ## Architecture
//!
//! ```text
//! CLI (main)
//!     │
//!     ├── IngestService (service/)
//!     │       │
//!     │       ├── ApiGateway (gateway)
//!     │       └── serde views (service/wire)
//!     │
//!     ├── VerificationService (verify/)
//!     │
//!     ├── StatStore (storage/)
//!     │       ├── PgStore (storage/postgres)
//!     │       └── MemoryStore (storage/memory)
//!     │
//!     └── PostgreSQL
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod service;
pub mod storage;
pub mod verify;
