use serde::{Deserialize, Serialize};

/// TemplateEntry is one file found in the template catalog
#[derive(Debug, Clone, Serialize)]
pub struct TemplateEntry {
    pub name: String,
    pub size_bytes: u64,
}

/// TemplateSelectQuery carries the attributes the selector matches on
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSelectQuery {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub backhaul: String,
    #[serde(default)]
    pub software: String,
    #[serde(default)]
    pub role: String,
}

/// TemplateSelectResponse reports the chosen template and whether the
/// catalog actually contains it
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSelectResponse {
    pub template: String,
    pub exists: bool,
}

/// LinkIdQuery for previewing a synthesized link identifier
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkIdQuery {
    #[serde(default)]
    pub local: String,
    #[serde(default)]
    pub remote: String,
}

/// LinkIdResponse shows the link id and the tokens it was built from
#[derive(Debug, Clone, Serialize)]
pub struct LinkIdResponse {
    pub link_id: String,
    pub local_site: String,
    pub local_convention: String,
    pub remote_site: String,
    pub remote_convention: String,
    pub remote_model: String,
}

/// RenderedConfig is the outcome of rendering one device.
///
/// A failed render still produces content: an error marker line followed by
/// the message, with the message also in `error`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedConfig {
    pub hostname: String,
    pub filename: String,
    pub template: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderedConfig {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
