//! Validation settings from environment, mission file and command line.

use deconflict_core::ValidationConfig;
use std::env;

/// One layer of optional overrides for [`ValidationConfig`].
///
/// Layers are applied in order default, environment, mission file, flags; each
/// `Some` replaces the value beneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Config {
    pub safety_buffer: Option<f64>,
    pub sample_resolution: Option<f64>,
    pub parallel: Option<bool>,
}

impl Config {
    /// Read `DECONFLICT_BUFFER`, `DECONFLICT_RESOLUTION` and `DECONFLICT_PARALLEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    /// Unparseable values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            safety_buffer: lookup("DECONFLICT_BUFFER").and_then(|s| s.trim().parse().ok()),
            sample_resolution: lookup("DECONFLICT_RESOLUTION")
                .and_then(|s| s.trim().parse().ok()),
            parallel: lookup("DECONFLICT_PARALLEL").and_then(|s| parse_flag(&s)),
        }
    }

    /// Apply this layer's overrides on top of `base`.
    pub fn apply_to(&self, base: ValidationConfig) -> ValidationConfig {
        ValidationConfig {
            safety_buffer: self.safety_buffer.unwrap_or(base.safety_buffer),
            sample_resolution: self.sample_resolution.unwrap_or(base.sample_resolution),
            parallel: self.parallel.unwrap_or(base.parallel),
        }
    }

    /// Fold layers from lowest to highest precedence over the defaults.
    pub fn resolve(layers: &[Config]) -> ValidationConfig {
        layers
            .iter()
            .fold(ValidationConfig::default(), |config, layer| layer.apply_to(config))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_parses_values() {
        let config = Config::from_lookup(lookup(&[
            ("DECONFLICT_BUFFER", "12.5"),
            ("DECONFLICT_RESOLUTION", " 0.25 "),
            ("DECONFLICT_PARALLEL", "yes"),
        ]));
        assert_eq!(config.safety_buffer, Some(12.5));
        assert_eq!(config.sample_resolution, Some(0.25));
        assert_eq!(config.parallel, Some(true));
    }

    #[test]
    fn test_unparseable_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[
            ("DECONFLICT_BUFFER", "wide"),
            ("DECONFLICT_PARALLEL", "maybe"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_later_layers_win() {
        let env = Config {
            safety_buffer: Some(8.0),
            sample_resolution: Some(1.0),
            parallel: Some(true),
        };
        let mission = Config {
            safety_buffer: Some(10.0),
            ..Config::default()
        };
        let flags = Config {
            sample_resolution: Some(0.1),
            ..Config::default()
        };

        let resolved = Config::resolve(&[env, mission, flags]);
        assert_eq!(resolved.safety_buffer, 10.0);
        assert_eq!(resolved.sample_resolution, 0.1);
        assert!(resolved.parallel);
    }

    #[test]
    fn test_no_layers_gives_defaults() {
        assert_eq!(Config::resolve(&[]), ValidationConfig::default());
    }
}
