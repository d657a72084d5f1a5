//! Cache Strategy Module
//!
//! Maps volatility classes to expiration durations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default lifetime of `Static` entries (24 hours)
pub const STATIC_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default lifetime of `Dynamic` entries (5 minutes)
pub const DYNAMIC_TTL: Duration = Duration::from_secs(5 * 60);

/// Longest lifetime a policy hands out (one year)
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// == Strategy ==
/// How often a piece of cached data changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Rarely changes; cached for a long time
    Static,
    /// Changes regularly; cached briefly
    #[default]
    Dynamic,
    /// Changes constantly; never cached
    Realtime,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Static => "static",
            Strategy::Dynamic => "dynamic",
            Strategy::Realtime => "realtime",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown cache strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Strategy::Static),
            "dynamic" => Ok(Strategy::Dynamic),
            "realtime" => Ok(Strategy::Realtime),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

// == Expiration Policy ==
/// Expiration table, fixed once constructed.
///
/// Lifetimes are capped at [`MAX_TTL`]. A zero lifetime means the strategy
/// is not stored, the same as `Realtime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    static_ttl: Duration,
    dynamic_ttl: Duration,
}

impl ExpirationPolicy {
    pub fn new(static_ttl: Duration, dynamic_ttl: Duration) -> Self {
        Self {
            static_ttl: static_ttl.min(MAX_TTL),
            dynamic_ttl: dynamic_ttl.min(MAX_TTL),
        }
    }

    /// Returns the lifetime for `strategy`, or `None` when it must not be stored.
    pub fn resolve(&self, strategy: Strategy) -> Option<Duration> {
        let ttl = match strategy {
            Strategy::Static => self.static_ttl,
            Strategy::Dynamic => self.dynamic_ttl,
            Strategy::Realtime => return None,
        };
        (!ttl.is_zero()).then_some(ttl)
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::new(STATIC_TTL, DYNAMIC_TTL)
    }
}
