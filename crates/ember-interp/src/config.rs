// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Interpreter configuration.

use tracing::warn;

/// Live-object count above which an allocation triggers a collection.
pub const DEFAULT_GC_THRESHOLD: usize = 256;

/// Environment variable that overrides the collection threshold.
pub const GC_THRESHOLD_ENV: &str = "EMBER_GC_THRESHOLD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpConfig {
    pub gc_threshold: usize,
}

impl Default for InterpConfig {
    fn default() -> Self {
        Self { gc_threshold: DEFAULT_GC_THRESHOLD }
    }
}

impl InterpConfig {
    /// Defaults, overridden by `EMBER_GC_THRESHOLD` when it holds a valid count.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(GC_THRESHOLD_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) => config.gc_threshold = n,
                Err(_) => warn!(
                    value = %raw,
                    "ignoring {}: expected a non-negative integer", GC_THRESHOLD_ENV
                ),
            }
        }
        config
    }

    pub fn with_gc_threshold(mut self, gc_threshold: usize) -> Self {
        self.gc_threshold = gc_threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold() {
        assert_eq!(InterpConfig::default().gc_threshold, DEFAULT_GC_THRESHOLD);
    }

    #[test]
    fn env_overrides_threshold() {
        let config = InterpConfig::from_lookup(|key| {
            (key == GC_THRESHOLD_ENV).then(|| " 16 ".to_string())
        });
        assert_eq!(config.gc_threshold, 16);
    }

    #[test]
    fn invalid_env_value_is_ignored() {
        let config = InterpConfig::from_lookup(|_| Some("lots".to_string()));
        assert_eq!(config, InterpConfig::default());
    }

    #[test]
    fn builder_overrides() {
        assert_eq!(InterpConfig::default().with_gc_threshold(0).gc_threshold, 0);
    }
}
