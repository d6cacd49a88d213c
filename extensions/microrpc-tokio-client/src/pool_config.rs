use crate::PoolError;
use std::time::Duration;

/// Sizing and eviction settings for a [`ConnectionPool`](crate::ConnectionPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Connections dialed eagerly when the pool is created. Must not exceed `max_idle`.
    pub init_capacity: usize,

    /// Upper bound on live connections, idle ones included.
    pub max_active: usize,

    /// Upper bound on connections parked in the idle queue. A released
    /// connection that does not fit is closed.
    pub max_idle: usize,

    /// Idle connections older than this are closed instead of handed out.
    pub max_idle_time: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            init_capacity: 0,
            max_active: 16,
            max_idle: 8,
            max_idle_time: Duration::from_secs(60),
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.max_active == 0 {
            return Err(PoolError::InvalidConfig("max_active must be at least 1"));
        }
        if self.max_idle > self.max_active {
            return Err(PoolError::InvalidConfig(
                "max_idle must not exceed max_active",
            ));
        }
        if self.init_capacity > self.max_idle {
            return Err(PoolError::InvalidConfig(
                "init_capacity must not exceed max_idle",
            ));
        }
        Ok(())
    }
}
