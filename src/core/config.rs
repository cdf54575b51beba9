//! Match configuration.
//!
//! Built with `with_*` methods over `Default`, or loaded from JSON where
//! every field is optional:
//!
//! ```
//! use mahjong_match::core::MatchConfig;
//!
//! let config = MatchConfig::from_json(r#"{"bot_think_time_ms": 0}"#).unwrap();
//! assert_eq!(config.bot_think_time_ms, 0);
//! assert_eq!(config.bot_seats.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{ErrorKind, OpContext, Result};
use super::seat::Seat;
use crate::tiles::Variant;

/// Tunables shared by every match a server runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Variant used when `start_match` names none.
    pub default_variant: Variant,

    /// Seats played by the bot.
    pub bot_seats: Vec<Seat>,

    /// Delay before a scheduled bot move.
    pub bot_think_time_ms: u64,

    /// Reject `hu` claims on a discard that does not complete the hand.
    pub verify_hu_claims: bool,

    /// Buffer size of the match event channel.
    pub event_capacity: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            default_variant: Variant::Sixteen,
            bot_seats: [3, 4].into_iter().filter_map(Seat::new).collect(),
            bot_think_time_ms: 1000,
            verify_hu_claims: false,
            event_capacity: 256,
        }
    }
}

impl MatchConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let ctx = OpContext::detached("load_config");
        let config: Self =
            serde_json::from_str(json).map_err(|e| ctx.error(ErrorKind::InvalidConfig(e.to_string())))?;
        if config.event_capacity == 0 {
            return ctx.fail(ErrorKind::InvalidConfig(
                "event_capacity must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_default_variant(mut self, variant: Variant) -> Self {
        self.default_variant = variant;
        self
    }

    #[must_use]
    pub fn with_bot_seats(mut self, seats: impl IntoIterator<Item = Seat>) -> Self {
        self.bot_seats = seats.into_iter().collect();
        self.bot_seats.sort();
        self.bot_seats.dedup();
        self
    }

    /// Every seat played by the bot.
    #[must_use]
    pub fn all_bots(self) -> Self {
        self.with_bot_seats(Seat::all())
    }

    #[must_use]
    pub fn with_think_time_ms(mut self, ms: u64) -> Self {
        self.bot_think_time_ms = ms;
        self
    }

    #[must_use]
    pub fn with_hu_verification(mut self, verify: bool) -> Self {
        self.verify_hu_claims = verify;
        self
    }

    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.bot_think_time_ms)
    }
}
