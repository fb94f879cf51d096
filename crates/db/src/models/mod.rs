//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity matching the
//! table row, plus the input structs its repository accepts.

pub mod conversation;
pub mod document;
pub mod profile;
pub mod shortlist;
pub mod task;
pub mod university;
pub mod user;
