//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every user-owned query is
//! scoped by `user_id`.

pub mod conversation_repo;
pub mod document_repo;
pub mod profile_repo;
pub mod shortlist_repo;
pub mod task_repo;
pub mod university_repo;
pub mod user_repo;

pub use conversation_repo::ConversationRepo;
pub use document_repo::DocumentRepo;
pub use profile_repo::ProfileRepo;
pub use shortlist_repo::ShortlistRepo;
pub use task_repo::TaskRepo;
pub use university_repo::UniversityRepo;
pub use user_repo::UserRepo;
