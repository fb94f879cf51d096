pub mod auth;
pub mod counsellor;
pub mod documents;
pub mod profile;
pub mod shortlist;
pub mod tasks;
pub mod universities;
