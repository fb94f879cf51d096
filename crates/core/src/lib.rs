//! Pure domain logic for the study-abroad counselling backend.
//!
//! Nothing in this crate performs I/O. Persistence lives in `pathway-db`,
//! text generation in `pathway-llm`, and HTTP in `pathway-api`; this crate
//! holds the rules those layers share.

pub mod counsellor;
pub mod documents;
pub mod error;
pub mod fit;
pub mod profile;
pub mod shortlist;
pub mod stage;
pub mod tasks;
pub mod types;
pub mod voice;
