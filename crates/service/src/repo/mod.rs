//! Storage backends implementing the repository capabilities.

pub mod seaorm;

pub use seaorm::SeaOrmRepositories;
