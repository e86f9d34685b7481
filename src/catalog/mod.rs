use anyhow::{bail, Context as _, Result};
use std::path::{Path, PathBuf};

use crate::models::TemplateEntry;
use crate::utils::is_plain_file_name;

/// File extension of catalog templates
const TEMPLATE_EXTENSION: &str = "j2";

/// TemplateCatalog enumerates the templates available in a directory
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
}

impl TemplateCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List `*.j2` files sorted by name. A missing directory is an empty catalog.
    pub async fn list(&self) -> Result<Vec<TemplateEntry>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Template directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.dir.display()));
            }
        };

        let mut templates = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                templates.push(TemplateEntry {
                    name: name.to_string(),
                    size_bytes: metadata.len(),
                });
            }
        }
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    /// Template identifiers only, in catalog order
    pub async fn names(&self) -> Result<Vec<String>> {
        Ok(self.list().await?.into_iter().map(|t| t.name).collect())
    }

    /// Read a template's source by identifier
    pub async fn load(&self, name: &str) -> Result<String> {
        if !is_plain_file_name(name) {
            bail!("invalid template name {:?}", name);
        }
        let path = self.dir.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("template {} not found in {}", name, self.dir.display()))
    }
}
