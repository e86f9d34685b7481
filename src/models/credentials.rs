use serde::{Deserialize, Serialize};

/// ModelDefaults holds the fallback secret and license keys for a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefaults {
    pub tacacs_secret: String,
    #[serde(default)]
    pub license_keys: Vec<String>,
}
