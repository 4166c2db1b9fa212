use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::scroll::EasingType;

/// Engine configuration
///
/// Created once at startup and replaced wholesale via `set_config`, or merged
/// field-wise from [`GlideOptions`]. Offsets are kept in their declared unit
/// and re-resolved to pixels on every use, since the viewport height may change
/// between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlideConfig {
    /// Marker a hash must carry right after `#` to opt into animated scrolling.
    /// Empty (the default) means every in-page anchor qualifies.
    #[serde(default)]
    pub action_prefix: String,
    /// Additional marker required after the action prefix
    #[serde(default)]
    pub hash_prefix: String,
    /// Visual margin kept between a scrolled-to element and the viewport top
    #[serde(default)]
    pub clip_offset: OffsetSpec,
    /// Distance from the target at which a load-time glide starts after the
    /// instant hop
    #[serde(default = "default_hop_offset")]
    pub hop_offset: OffsetSpec,
    /// Glide duration in milliseconds; 0 disables animation entirely
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
    /// Skip animation when restoring positions on back/forward navigation
    #[serde(default)]
    pub disable_popstate_animation: bool,
    /// Curve for full-distance glides
    #[serde(default = "default_easing")]
    pub easing: EasingType,
    /// Curve for the shortened glide after a hop
    #[serde(default = "default_hop_easing")]
    pub hop_easing: EasingType,
}

impl Default for GlideConfig {
    fn default() -> Self {
        Self {
            action_prefix: String::new(),
            hash_prefix: String::new(),
            clip_offset: OffsetSpec::default(),
            hop_offset: default_hop_offset(),
            animation_duration_ms: default_animation_duration_ms(),
            disable_popstate_animation: false,
            easing: default_easing(),
            hop_easing: default_hop_easing(),
        }
    }
}

impl GlideConfig {
    /// Get animation duration as Duration
    #[inline]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Check if glides are animated at all
    #[inline]
    pub fn is_animated(&self) -> bool {
        self.animation_duration_ms > 0
    }

    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/glidemark/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("glidemark")
            .join("config.toml")
    }
}

/// Partial configuration merged into the current [`GlideConfig`]
///
/// Every field is optional; absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlideOptions {
    #[serde(default)]
    pub action_prefix: Option<String>,
    #[serde(default)]
    pub hash_prefix: Option<String>,
    #[serde(default)]
    pub clip_offset: Option<OffsetSpec>,
    #[serde(default)]
    pub hop_offset: Option<OffsetSpec>,
    #[serde(default)]
    pub animation_duration_ms: Option<u64>,
    #[serde(default)]
    pub disable_popstate_animation: Option<bool>,
    #[serde(default)]
    pub easing: Option<EasingType>,
    #[serde(default)]
    pub hop_easing: Option<EasingType>,
}

impl GlideOptions {
    /// Merge these options into an existing configuration
    pub fn apply(self, config: &mut GlideConfig) {
        if let Some(v) = self.action_prefix {
            config.action_prefix = v;
        }
        if let Some(v) = self.hash_prefix {
            config.hash_prefix = v;
        }
        if let Some(v) = self.clip_offset {
            config.clip_offset = v;
        }
        if let Some(v) = self.hop_offset {
            config.hop_offset = v;
        }
        if let Some(v) = self.animation_duration_ms {
            config.animation_duration_ms = v;
        }
        if let Some(v) = self.disable_popstate_animation {
            config.disable_popstate_animation = v;
        }
        if let Some(v) = self.easing {
            config.easing = v;
        }
        if let Some(v) = self.hop_easing {
            config.hop_easing = v;
        }
    }
}

/// Unit of an [`OffsetSpec`] magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetUnit {
    /// Literal pixels
    Px,
    /// Percent of the current viewport height
    Percent,
}

/// A distance that resolves to pixels against the current viewport height
///
/// Can be specified as a bare number (pixels) or a string (`"150"`, `"150px"`,
/// `"15%"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetSpec {
    pub value: f64,
    pub unit: OffsetUnit,
}

impl OffsetSpec {
    pub const fn px(value: f64) -> Self {
        Self {
            value,
            unit: OffsetUnit::Px,
        }
    }

    pub const fn percent(value: f64) -> Self {
        Self {
            value,
            unit: OffsetUnit::Percent,
        }
    }

    /// Resolve to pixels against the current viewport height
    #[inline]
    pub fn to_px(&self, viewport_height: f64) -> f64 {
        match self.unit {
            OffsetUnit::Px => self.value,
            OffsetUnit::Percent => self.value * viewport_height / 100.0,
        }
    }
}

impl Default for OffsetSpec {
    fn default() -> Self {
        Self::px(0.0)
    }
}

impl FromStr for OffsetSpec {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        let (raw, unit) = if let Some(pct) = s.strip_suffix('%') {
            (pct, OffsetUnit::Percent)
        } else {
            (s.strip_suffix("px").unwrap_or(s), OffsetUnit::Px)
        };
        raw.trim()
            .parse::<f64>()
            .map(|value| Self { value, unit })
            .map_err(|_| crate::Error::Config(format!("invalid offset: '{}'", s)))
    }
}

impl Serialize for OffsetSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.unit {
            OffsetUnit::Px => serializer.serialize_f64(self.value),
            OffsetUnit::Percent => serializer.serialize_str(&format!("{}%", self.value)),
        }
    }
}

// Custom deserializer to accept either a bare number or a suffixed string
impl<'de> Deserialize<'de> for OffsetSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct OffsetSpecVisitor;

        impl<'de> Visitor<'de> for OffsetSpecVisitor {
            type Value = OffsetSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number (pixels) or a string like \"15%\" or \"150px\"")
            }

            fn visit_f64<E>(self, value: f64) -> Result<OffsetSpec, E>
            where
                E: de::Error,
            {
                Ok(OffsetSpec::px(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<OffsetSpec, E>
            where
                E: de::Error,
            {
                Ok(OffsetSpec::px(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<OffsetSpec, E>
            where
                E: de::Error,
            {
                Ok(OffsetSpec::px(value as f64))
            }

            fn visit_str<E>(self, value: &str) -> Result<OffsetSpec, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(OffsetSpecVisitor)
    }
}

fn default_hop_offset() -> OffsetSpec {
    // One viewport height: the visible part of a load-time glide is at most
    // one screen long.
    OffsetSpec::percent(100.0)
}

fn default_animation_duration_ms() -> u64 {
    500
}

fn default_easing() -> EasingType {
    EasingType::QuadInOut
}

fn default_hop_easing() -> EasingType {
    EasingType::QuadOut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GlideConfig::default();
        assert!(config.action_prefix.is_empty());
        assert!(config.hash_prefix.is_empty());
        assert_eq!(config.clip_offset, OffsetSpec::px(0.0));
        assert_eq!(config.hop_offset, OffsetSpec::percent(100.0));
        assert_eq!(config.animation_duration_ms, 500);
        assert!(!config.disable_popstate_animation);
        assert_eq!(config.easing, EasingType::QuadInOut);
        assert_eq!(config.hop_easing, EasingType::QuadOut);
        assert!(config.is_animated());
    }

    #[test]
    fn test_animation_duration() {
        let config = GlideConfig {
            animation_duration_ms: 200,
            ..Default::default()
        };
        assert_eq!(config.animation_duration(), Duration::from_millis(200));

        let config = GlideConfig {
            animation_duration_ms: 0,
            ..Default::default()
        };
        assert!(!config.is_animated());
    }

    #[test]
    fn test_offset_spec_parse() {
        assert_eq!("15%".parse::<OffsetSpec>().unwrap(), OffsetSpec::percent(15.0));
        assert_eq!("150".parse::<OffsetSpec>().unwrap(), OffsetSpec::px(150.0));
        assert_eq!("150px".parse::<OffsetSpec>().unwrap(), OffsetSpec::px(150.0));
        assert_eq!("-40".parse::<OffsetSpec>().unwrap(), OffsetSpec::px(-40.0));
        assert_eq!(" 25 % ".parse::<OffsetSpec>().unwrap(), OffsetSpec::percent(25.0));
        assert!("abc".parse::<OffsetSpec>().is_err());
        assert!("%".parse::<OffsetSpec>().is_err());
    }

    #[test]
    fn test_offset_spec_to_px() {
        assert_eq!(OffsetSpec::px(150.0).to_px(1000.0), 150.0);
        assert_eq!(OffsetSpec::percent(15.0).to_px(1000.0), 150.0);
        // Re-resolved against whatever height is current
        assert_eq!(OffsetSpec::percent(15.0).to_px(500.0), 75.0);
    }

    #[test]
    fn test_offset_spec_serde() {
        let spec: OffsetSpec = serde_json::from_str("150").unwrap();
        assert_eq!(spec, OffsetSpec::px(150.0));

        let spec: OffsetSpec = serde_json::from_str("\"15%\"").unwrap();
        assert_eq!(spec, OffsetSpec::percent(15.0));

        assert_eq!(serde_json::to_string(&OffsetSpec::percent(15.0)).unwrap(), "\"15%\"");
        assert_eq!(serde_json::to_string(&OffsetSpec::px(150.0)).unwrap(), "150.0");

        assert!(serde_json::from_str::<OffsetSpec>("true").is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = GlideConfig {
            action_prefix: "!jump:".to_string(),
            clip_offset: OffsetSpec::percent(15.0),
            hop_offset: OffsetSpec::px(400.0),
            animation_duration_ms: 750,
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: GlideConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_options_merge() {
        let mut config = GlideConfig::default();
        let options = GlideOptions {
            action_prefix: Some("!jump:".to_string()),
            animation_duration_ms: Some(750),
            ..Default::default()
        };
        options.apply(&mut config);

        assert_eq!(config.action_prefix, "!jump:");
        assert_eq!(config.animation_duration_ms, 750);
        // Untouched fields keep their values
        assert_eq!(config.hop_offset, OffsetSpec::percent(100.0));
        assert_eq!(config.easing, EasingType::QuadInOut);
    }

    #[test]
    fn test_options_from_json() {
        let options: GlideOptions = serde_json::from_str(
            r#"{"action_prefix": "!jump:", "clip_offset": "15%", "hop_offset": "25%", "animation_duration_ms": 750}"#,
        )
        .unwrap();
        assert_eq!(options.action_prefix.as_deref(), Some("!jump:"));
        assert_eq!(options.clip_offset, Some(OffsetSpec::percent(15.0)));
        assert_eq!(options.hop_offset, Some(OffsetSpec::percent(25.0)));
        assert_eq!(options.animation_duration_ms, Some(750));
        assert_eq!(options.easing, None);
    }
}
