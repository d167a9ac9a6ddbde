/// Database configuration and connection management
pub mod database;

/// Demo-credential user list loaded from config.toml
pub mod users;
