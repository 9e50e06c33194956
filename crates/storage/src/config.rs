use std::time::Duration;

use memstore_common::DEFAULT_SWEEP_INTERVAL;

/// Configuração do store.
///
/// ```rust
/// use memstore_storage::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_sweep_interval(Duration::from_millis(250));
/// assert_eq!(config.sweep_interval, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Intervalo entre varreduras do worker de expiração (default: 1s).
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
