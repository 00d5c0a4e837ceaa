use std::collections::BTreeMap;

use crate::error::StyleError;

use super::profile::{EditingStyleProfile, StyleConfig};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const FAST_PACED: &str = "Fast-paced";
pub const STANDARD: &str = "Standard";
pub const RELAXED: &str = "Relaxed";

/// Named editing styles plus the profile used for unrecognised names.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    profiles: BTreeMap<String, EditingStyleProfile>,
    fallback: EditingStyleProfile,
}

impl StyleRegistry {
    /// Built-in styles.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            FAST_PACED.to_string(),
            builtin_profile(&[2, 4, 8], &[0.2, 0.4, 0.4]),
        );
        profiles.insert(
            STANDARD.to_string(),
            builtin_profile(&[2, 4, 8, 16], &[0.1, 0.4, 0.4, 0.1]),
        );
        profiles.insert(
            RELAXED.to_string(),
            builtin_profile(&[4, 8, 16], &[0.2, 0.4, 0.4]),
        );

        Self {
            profiles,
            fallback: builtin_profile(&[2, 4, 8, 16], &[0.1, 0.3, 0.3, 0.3]),
        }
    }

    /// Built-ins overlaid with custom definitions; a custom entry replaces a
    /// built-in of the same name.
    pub fn with_custom(custom: &BTreeMap<String, StyleConfig>) -> Result<Self, StyleError> {
        let mut registry = Self::builtin();
        for (name, config) in custom {
            let profile = EditingStyleProfile::try_from(config.clone())?;
            registry.insert(name.clone(), profile);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, profile: EditingStyleProfile) {
        self.profiles.insert(name.into(), profile);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Look up a style, falling back to the default profile.
    pub fn get(&self, name: &str) -> &EditingStyleProfile {
        match self.profiles.get(name) {
            Some(profile) => profile,
            None => {
                log_warn!("unknown editing style '{}', using default profile", name);
                &self.fallback
            }
        }
    }

    pub fn fallback(&self) -> &EditingStyleProfile {
        &self.fallback
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_profile(multipliers: &[u32], weights: &[f64]) -> EditingStyleProfile {
    EditingStyleProfile::from_table(multipliers, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_styles_are_registered() {
        let registry = StyleRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec![FAST_PACED, RELAXED, STANDARD]);
        assert_eq!(registry.get(RELAXED).multipliers(), &[4, 8, 16]);
    }

    #[test]
    fn unknown_style_uses_fallback() {
        let registry = StyleRegistry::builtin();
        let profile = registry.get("Cinematic");
        assert_eq!(profile, registry.fallback());
        assert_eq!(profile.multipliers(), &[2, 4, 8, 16]);
    }

    #[test]
    fn custom_styles_override_builtins() {
        let mut custom = BTreeMap::new();
        custom.insert(
            STANDARD.to_string(),
            StyleConfig {
                multipliers: vec![1, 2],
                weights: None,
            },
        );
        custom.insert(
            "Montage".to_string(),
            StyleConfig {
                multipliers: vec![1],
                weights: Some(vec![1.0]),
            },
        );

        let registry = StyleRegistry::with_custom(&custom).unwrap();
        assert_eq!(registry.get(STANDARD).multipliers(), &[1, 2]);
        assert!(registry.contains("Montage"));
    }

    #[test]
    fn invalid_custom_style_is_rejected() {
        let mut custom = BTreeMap::new();
        custom.insert(
            "Broken".to_string(),
            StyleConfig {
                multipliers: vec![],
                weights: None,
            },
        );
        assert!(StyleRegistry::with_custom(&custom).is_err());
    }
}
