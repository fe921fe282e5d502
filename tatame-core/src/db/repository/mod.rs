//! Repository Module
//!
//! Owned collections for each persisted section. Every mutation validates
//! first and only then touches state, so a failed call leaves the store as
//! it was.

// Students
pub mod student;

// Settings
pub mod app_settings;
pub mod graduation_policy;

// Re-exports
pub use app_settings::AppSettingsStore;
pub use graduation_policy::GraduationPolicyStore;
pub use student::StudentRepository;
