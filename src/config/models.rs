//! Configuration data models
//!
//! This module defines the data structures used for application configuration.

use crate::jumplist::{DEFAULT_ENUMERATION_COUNT, DEFAULT_PINNED_LOOKUP_LIMIT};
use crate::thumbnail::{DEFAULT_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE, MIN_THUMBNAIL_SIZE};
use serde::{Deserialize, Serialize};

/// Smallest accepted per-list limit
pub const MIN_LIMIT: u32 = 1;

/// Largest accepted per-list limit
pub const MAX_LIMIT: u32 = 1000;

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-list enumeration limits
    pub limits: EnumerationLimits,
    /// Logical thumbnail size in pixels (16-256)
    pub thumbnail_size: u32,
    /// Whether the full view includes the Frequent group
    pub include_frequent: bool,
}

/// How many items each enumeration fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationLimits {
    /// Pinned list (1-1000)
    pub pinned: u32,
    /// Recent list (1-1000)
    pub recent: u32,
    /// Frequent list (1-1000)
    pub frequent: u32,
    /// Each custom category (1-1000)
    pub custom: u32,
    /// Tasks category (1-1000)
    pub tasks: u32,
    /// Pinned objects cached to answer pinned-state lookups (1-1000)
    pub pinned_lookup: u32,
}

impl EnumerationLimits {
    /// Copy with every limit clamped to the accepted range
    #[must_use]
    pub fn clamped(&self) -> Self {
        let clamp = |value: u32| value.clamp(MIN_LIMIT, MAX_LIMIT);
        Self {
            pinned: clamp(self.pinned),
            recent: clamp(self.recent),
            frequent: clamp(self.frequent),
            custom: clamp(self.custom),
            tasks: clamp(self.tasks),
            pinned_lookup: clamp(self.pinned_lookup),
        }
    }
}

impl AppConfig {
    /// Thumbnail size clamped to the supported range
    pub fn effective_thumbnail_size(&self) -> u32 {
        self.thumbnail_size
            .clamp(MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            limits: EnumerationLimits::default(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            include_frequent: false,
        }
    }
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            pinned: DEFAULT_ENUMERATION_COUNT,
            recent: DEFAULT_ENUMERATION_COUNT,
            frequent: DEFAULT_ENUMERATION_COUNT,
            custom: DEFAULT_ENUMERATION_COUNT,
            tasks: DEFAULT_ENUMERATION_COUNT,
            pinned_lookup: DEFAULT_PINNED_LOOKUP_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.limits.recent, 20);
        assert_eq!(config.limits.pinned_lookup, 100);
        assert_eq!(config.thumbnail_size, 32);
        assert!(!config.include_frequent);
    }

    #[test]
    fn test_serialization() {
        let config = AppConfig {
            include_frequent: true,
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"limits":{"recent":5},"thumbnail_size":48}"#).unwrap();
        assert_eq!(config.limits.recent, 5);
        assert_eq!(config.limits.pinned, 20);
        assert_eq!(config.thumbnail_size, 48);
        assert!(!config.include_frequent);
    }

    #[test]
    fn test_thumbnail_size_is_clamped() {
        let mut config = AppConfig {
            thumbnail_size: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.effective_thumbnail_size(), 16);
        config.thumbnail_size = 4096;
        assert_eq!(config.effective_thumbnail_size(), 256);
    }

    proptest! {
        #[test]
        fn test_clamped_limits_in_range(
            pinned in any::<u32>(),
            recent in any::<u32>(),
            lookup in any::<u32>(),
        ) {
            let limits = EnumerationLimits {
                pinned,
                recent,
                pinned_lookup: lookup,
                ..EnumerationLimits::default()
            }
            .clamped();
            for value in [limits.pinned, limits.recent, limits.pinned_lookup] {
                prop_assert!((MIN_LIMIT..=MAX_LIMIT).contains(&value));
            }
        }
    }
}
