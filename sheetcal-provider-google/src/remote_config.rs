//! Google-specific remote configuration.
//!
//! The `[provider]` table of the sheetcal config reaches the provider as a
//! flattened JSON map; this gives it a type.

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleRemoteConfig {
    pub google_account: String,
}

impl TryFrom<&serde_json::Map<String, serde_json::Value>> for GoogleRemoteConfig {
    type Error = anyhow::Error;

    fn try_from(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let google_account = map
            .get("google_account")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing required field: google_account"))?
            .to_string();

        Ok(Self { google_account })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_account() {
        let mut map = serde_json::Map::new();
        assert!(GoogleRemoteConfig::try_from(&map).is_err());

        map.insert("google_account".into(), "ops@example.com".into());
        let config = GoogleRemoteConfig::try_from(&map).unwrap();
        assert_eq!(config.google_account, "ops@example.com");
    }
}
