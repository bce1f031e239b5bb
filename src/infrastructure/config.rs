use std::env;

use crate::modules::classification::DEFAULT_MIN_SEQUENCE_LEVEL;
use crate::services::ClassificationSettings;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    /// Leaves at or below this level get per-recipe sequence numbers
    pub sequence_min_level: u32,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());
        Self::for_profile(profile)
    }

    /// Same as [`Config::from_env`] with an explicit profile (`--profile`)
    pub fn for_profile(profile: String) -> Self {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://recipes.db?mode=rwc".to_string()
            } else {
                format!("sqlite://recipes_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            profile,
            sequence_min_level: env::var("SEQUENCE_MIN_LEVEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|level| *level >= 1)
                .unwrap_or(DEFAULT_MIN_SEQUENCE_LEVEL),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }

    pub fn classification_settings(&self) -> ClassificationSettings {
        ClassificationSettings {
            min_sequence_level: self.sequence_min_level,
        }
    }
}
