//! Runtime configuration for the arena server.

use crate::arena::scoring;
use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Elo K-factor applied to every battle result.
    pub k_factor: f64,
    /// Seconds a battle token stays redeemable after issue.
    pub battle_token_ttl: u64,
    /// Seconds between background sweeps of expired tokens.
    pub sweep_interval: u64,
}

impl Settings {
    fn from_env() -> Self {
        // Non-finite or non-positive K would corrupt every rating it
        // touches, so bad values fall back to the default here.
        let k_factor = env::var("K_FACTOR")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|k| k.is_finite() && *k > 0.0)
            .unwrap_or(scoring::DEFAULT_K);

        let battle_token_ttl = env::var("BATTLE_TOKEN_TTL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(120); // 2 min default

        let sweep_interval = env::var("SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Settings {
            k_factor,
            battle_token_ttl,
            sweep_interval,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
