use anyhow::{Context as _, Result};
use std::collections::HashMap;

use crate::models::ModelDefaults;

/// Key in the defaults file that replaces the built-in fallback
const FALLBACK_KEY: &str = "default";

/// CredentialDefaults supplies per-model TACACS secrets and license keys,
/// used only when a device record leaves them empty
#[derive(Debug, Clone)]
pub struct CredentialDefaults {
    by_model: HashMap<String, ModelDefaults>,
    fallback: ModelDefaults,
}

impl Default for CredentialDefaults {
    fn default() -> Self {
        Self {
            by_model: HashMap::new(),
            fallback: ModelDefaults {
                tacacs_secret: "vault://ciena/default/tacacs".to_string(),
                license_keys: vec!["<LICENSE-PLACEHOLDER-1>".to_string()],
            },
        }
    }
}

impl CredentialDefaults {
    /// Parse a JSON object of `model -> {tacacs_secret, license_keys}`.
    /// A `"default"` entry overrides the built-in fallback.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut by_model: HashMap<String, ModelDefaults> =
            serde_json::from_str(json).context("parsing model defaults")?;
        let fallback = by_model
            .remove(FALLBACK_KEY)
            .unwrap_or_else(|| Self::default().fallback);
        Ok(Self { by_model, fallback })
    }

    /// Load from a file; an empty path means built-in defaults only
    pub async fn load(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Ok(Self::default());
        }
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading model defaults from {}", path))?;
        let defaults = Self::from_json(&json)?;
        tracing::info!("Loaded credential defaults for {} models from {}", defaults.by_model.len(), path);
        Ok(defaults)
    }

    pub fn lookup(&self, model: &str) -> &ModelDefaults {
        self.by_model.get(model.trim()).unwrap_or(&self.fallback)
    }
}
