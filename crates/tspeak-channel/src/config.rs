use std::time::Duration;

/// Default spacing between consecutive updates on one channel.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Controls how attached channels dispatch their updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, every attached channel gets its own update scheduler.
    pub use_timeout_mode: bool,
    /// Minimum gap between one update's completion and the next dispatch
    /// on the same channel.
    pub update_timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            use_timeout_mode: true,
            update_timeout: DEFAULT_UPDATE_TIMEOUT,
        }
    }
}
