//! Repository implementations for the Content domain

pub mod directory;

pub use directory::PgEntityDirectory;
