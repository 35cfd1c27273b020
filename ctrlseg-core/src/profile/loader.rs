//! Embedded profile loader

use super::config::ProfileConfig;
use crate::error::{CoreError, Result};
use std::collections::BTreeMap;
use std::sync::OnceLock;

static PROFILE_CONFIGS: OnceLock<BTreeMap<String, ProfileConfig>> = OnceLock::new();

macro_rules! embed_profile_config {
    ($code:expr, $path:expr) => {
        ($code, include_str!($path))
    };
}

/// Raw TOML of the embedded profiles
pub(crate) const EMBEDDED: [(&str, &str); 2] = [
    embed_profile_config!("pci-dss", "../../configs/profiles/pci-dss.toml"),
    embed_profile_config!("generic", "../../configs/profiles/generic.toml"),
];

fn load_embedded_configs() -> Result<BTreeMap<String, ProfileConfig>> {
    let mut configs = BTreeMap::new();

    for (code, toml_content) in EMBEDDED {
        let config: ProfileConfig = toml::from_str(toml_content)
            .map_err(|e| CoreError::ProfileParse(format!("Failed to parse {code} profile: {e}")))?;

        if config.metadata.code != code {
            return Err(CoreError::ProfileParse(format!(
                "Profile code mismatch: expected {}, got {}",
                code, config.metadata.code
            )));
        }

        configs.insert(code.to_string(), config);
    }

    Ok(configs)
}

fn configs() -> &'static BTreeMap<String, ProfileConfig> {
    PROFILE_CONFIGS.get_or_init(|| match load_embedded_configs() {
        Ok(configs) => configs,
        Err(e) => {
            // Embedded files are covered by tests; an empty map turns into UnknownProfile.
            tracing::error!("failed to load embedded profiles: {e}");
            BTreeMap::new()
        }
    })
}

/// Embedded profile configuration by code
pub fn get_profile_config(code: &str) -> Result<&'static ProfileConfig> {
    configs()
        .get(code)
        .ok_or_else(|| CoreError::UnknownProfile(code.to_string()))
}

/// Codes of all embedded profiles, sorted
pub fn list_available_profiles() -> Vec<&'static str> {
    configs().keys().map(|s| s.as_str()).collect()
}

/// Raw TOML of an embedded profile, used as a template
pub fn embedded_profile_source(code: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, source)| *source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_profile_config_unsupported() {
        match get_profile_config("nonexistent") {
            Err(CoreError::UnknownProfile(code)) => assert_eq!(code, "nonexistent"),
            _ => panic!("Expected UnknownProfile error"),
        }
    }

    #[test]
    fn test_embedded_profiles_parse_and_validate() {
        for code in ["pci-dss", "generic"] {
            let config = get_profile_config(code).expect("embedded profile should exist");
            assert_eq!(config.metadata.code, code);
            config.validate().expect("embedded profile should validate");
        }
    }

    #[test]
    fn test_list_available_profiles() {
        assert_eq!(list_available_profiles(), vec!["generic", "pci-dss"]);
    }

    #[test]
    fn test_embedded_source_available() {
        assert!(embedded_profile_source("pci-dss").unwrap().contains("[metadata]"));
        assert!(embedded_profile_source("iso").is_none());
    }
}
