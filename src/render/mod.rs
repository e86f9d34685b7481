use anyhow::{anyhow, Context as _, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::catalog::TemplateCatalog;
use crate::defaults::CredentialDefaults;
use crate::interfaces::derive_interfaces;
use crate::models::{find_model, non_empty, DeviceRecord, Interface, RenderedConfig};
use crate::selector::select_template;
use crate::utils::output_filename;

/// First characters of the content of a failed render
pub const RENDER_ERROR_MARKER: &str = "!! RENDER ERROR:";

/// Fill in what the operator left out, on a copy of the record:
/// credential defaults, the 3903 gateway and loopback rules.
pub fn prepare_device(device: &DeviceRecord, defaults: &CredentialDefaults) -> DeviceRecord {
    let mut dev = device.clone();
    let model_defaults = defaults.lookup(&dev.model);

    if non_empty(dev.tacacs_secret.as_deref()).is_none() {
        dev.tacacs_secret = Some(model_defaults.tacacs_secret.clone());
    }
    if dev.license_keys.iter().all(|k| k.trim().is_empty()) {
        dev.license_keys = model_defaults.license_keys.clone();
    }

    if let Some(hw) = find_model(&dev.model) {
        if hw.gateway_from_neighbor() && non_empty(dev.gateway.as_deref()).is_none() {
            dev.gateway = non_empty(dev.single_neighbor_ip.as_deref()).map(str::to_string);
        }
        if !hw.supports_loopback() {
            dev.loopback_ip = None;
        }
    }
    dev
}

/// Template context: every record field, plus `interfaces` and `generated_at`
pub fn build_context(
    device: &DeviceRecord,
    interfaces: &[Interface],
    generated_at: DateTime<Utc>,
) -> Result<Context> {
    let mut context = Context::from_serialize(device)
        .map_err(|e| anyhow!("Failed to build template context: {}", describe(&e)))?;
    context.insert("interfaces", interfaces);
    context.insert("generated_at", &generated_at.to_rfc3339());
    Ok(context)
}

/// Render template source with Tera
pub fn render_source(name: &str, source: &str, context: &Context) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(name, source)
        .map_err(|e| anyhow!("Invalid template {}: {}", name, describe(&e)))?;
    tera.render(name, context)
        .map_err(|e| anyhow!("Template rendering failed: {}", describe(&e)))
}

/// Tera keeps the useful detail in the error's source chain
fn describe(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Renderer turns device records into config text using a template catalog
#[derive(Debug, Clone)]
pub struct Renderer {
    catalog: TemplateCatalog,
    defaults: CredentialDefaults,
    append_timestamp: bool,
}

impl Renderer {
    pub fn new(catalog: TemplateCatalog, defaults: CredentialDefaults, append_timestamp: bool) -> Self {
        Self {
            catalog,
            defaults,
            append_timestamp,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &CredentialDefaults {
        &self.defaults
    }

    async fn available(&self) -> Vec<String> {
        match self.catalog.names().await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Failed to list templates: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Render one device against the current catalog
    pub async fn render(&self, device: &DeviceRecord) -> RenderedConfig {
        let available = self.available().await;
        self.render_at(device, &available, Utc::now()).await
    }

    /// Render several devices; each succeeds or fails on its own
    pub async fn render_batch(&self, devices: &[DeviceRecord]) -> Vec<RenderedConfig> {
        let available = self.available().await;
        let now = Utc::now();
        let mut results = Vec::with_capacity(devices.len());
        for device in devices {
            results.push(self.render_at(device, &available, now).await);
        }
        results
    }

    /// Render with an explicit catalog listing and clock.
    /// Never fails: errors come back as marker content.
    pub async fn render_at(
        &self,
        device: &DeviceRecord,
        available: &[String],
        now: DateTime<Utc>,
    ) -> RenderedConfig {
        let dev = prepare_device(device, &self.defaults);
        let interfaces = derive_interfaces(&dev);
        let template = select_template(
            &dev.model,
            dev.backhaul.as_str(),
            &dev.software_version,
            dev.role.as_deref().unwrap_or_default(),
            available,
        );
        let filename = output_filename(&dev.hostname, self.append_timestamp.then_some(now));

        let rendered = match self.catalog.load(&template).await {
            Ok(source) => build_context(&dev, &interfaces, now)
                .and_then(|context| render_source(&template, &source, &context)),
            Err(e) => Err(e),
        };

        match rendered {
            Ok(content) => {
                tracing::info!("Rendered {} with {}", dev.hostname, template);
                RenderedConfig {
                    hostname: dev.hostname,
                    filename,
                    template,
                    content,
                    error: None,
                }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!("Render failed for {}: {}", dev.hostname, message);
                RenderedConfig {
                    hostname: dev.hostname,
                    filename,
                    template,
                    content: format!("{} {}\n", RENDER_ERROR_MARKER, message),
                    error: Some(message),
                }
            }
        }
    }
}

/// Write a rendered config into `dir`, creating it if needed
pub async fn save(dir: &Path, rendered: &RenderedConfig) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(&rendered.filename);
    tokio::fs::write(&path, &rendered.content)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const GENERIC: &str = "hostname {{ hostname }}\n\
{% for iface in interfaces %}interface {{ iface.name }} port {{ iface.port }}\n{% endfor %}\
secret {{ tacacs_secret }}\n";

    fn device(value: serde_json::Value) -> DeviceRecord {
        serde_json::from_value(value).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn renderer_with(templates: &[(&str, &str)]) -> (tempfile::TempDir, Renderer) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in templates {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let renderer = Renderer::new(
            TemplateCatalog::new(dir.path()),
            CredentialDefaults::default(),
            false,
        );
        (dir, renderer)
    }

    #[test]
    fn test_prepare_fills_defaults() {
        let dev = device(json!({"model": "3916", "tacacs_secret": "", "license_keys": [" "]}));
        let prepared = prepare_device(&dev, &CredentialDefaults::default());
        assert_eq!(prepared.tacacs_secret.as_deref(), Some("vault://ciena/default/tacacs"));
        assert_eq!(prepared.license_keys, vec!["<LICENSE-PLACEHOLDER-1>"]);
        // Caller's record is untouched
        assert_eq!(dev.tacacs_secret.as_deref(), Some(""));
    }

    #[test]
    fn test_prepare_keeps_operator_values() {
        let dev = device(json!({"model": "3916", "tacacs_secret": "mine", "license_keys": ["K"]}));
        let prepared = prepare_device(&dev, &CredentialDefaults::default());
        assert_eq!(prepared.tacacs_secret.as_deref(), Some("mine"));
        assert_eq!(prepared.license_keys, vec!["K"]);
    }

    #[test]
    fn test_prepare_compact_model_rules() {
        let dev = device(json!({
            "model": "3903",
            "single_neighbor_ip": "10.0.0.1",
            "loopback_ip": "172.20.38.240",
        }));
        let prepared = prepare_device(&dev, &CredentialDefaults::default());
        assert_eq!(prepared.gateway.as_deref(), Some("10.0.0.1"));
        assert_eq!(prepared.loopback_ip, None);

        let dev = device(json!({"model": "5142", "loopback_ip": "172.20.38.240"}));
        let prepared = prepare_device(&dev, &CredentialDefaults::default());
        assert_eq!(prepared.loopback_ip.as_deref(), Some("172.20.38.240"));
        assert_eq!(prepared.gateway, None);
    }

    #[tokio::test]
    async fn test_render_selected_template() {
        let (_dir, renderer) = renderer_with(&[
            ("ciena_generic.cfg.j2", "generic {{ hostname }}"),
            ("ciena_3916_saos6_dual.cfg.j2", GENERIC),
        ]);
        let dev = device(json!({
            "hostname": "NGA-AJO-CNA5130-01",
            "model": "3916",
            "software_version": "saos6",
            "backhaul": "dual",
            "primary_port": "1",
            "primary_neighbor_name": "NGA-IKJ-CNA8114-01",
            "secondary_port": "2",
            "other_interfaces": [{"name": "MGMT", "port": "6"}],
        }));
        let available = renderer.catalog().names().await.unwrap();
        let out = renderer.render_at(&dev, &available, fixed_now()).await;

        assert!(!out.is_error(), "{:?}", out.error);
        assert_eq!(out.template, "ciena_3916_saos6_dual.cfg.j2");
        assert_eq!(out.filename, "NGA-AJO-CNA5130-01.txt");
        assert_eq!(
            out.content,
            "hostname NGA-AJO-CNA5130-01\n\
interface AJO-IKJ8114 port 1\n\
interface Port_2 port 2\n\
interface MGMT port 6\n\
secret vault://ciena/default/tacacs\n"
        );
    }

    #[tokio::test]
    async fn test_missing_template_is_marker_content() {
        let (_dir, renderer) = renderer_with(&[]);
        let dev = device(json!({"hostname": "h", "model": "9999", "backhaul": "single"}));
        let out = renderer.render_at(&dev, &[], fixed_now()).await;
        assert_eq!(out.template, "ciena_generic.cfg.j2");
        assert!(out.is_error());
        assert!(out.content.starts_with(RENDER_ERROR_MARKER));
    }

    #[tokio::test]
    async fn test_broken_template_is_marker_content() {
        let (_dir, renderer) = renderer_with(&[("ciena_generic.cfg.j2", "{% for x in %}")]);
        let dev = device(json!({"hostname": "h"}));
        let out = renderer.render(&dev).await;
        assert!(out.is_error());
        assert!(out.content.starts_with(RENDER_ERROR_MARKER));
        assert!(out.error.unwrap().contains("ciena_generic.cfg.j2"));
    }

    #[tokio::test]
    async fn test_batch_renders_independently() {
        let (_dir, renderer) = renderer_with(&[
            ("ciena_generic.cfg.j2", "generic {{ hostname }}"),
            ("ciena_5142.cfg.j2", "{{ missing_variable }}"),
        ]);
        let devices = vec![
            device(json!({"hostname": "ok-1", "model": "3916"})),
            device(json!({"hostname": "bad", "model": "5142"})),
            device(json!({"hostname": "ok-2", "model": "8110"})),
        ];
        let results = renderer.render_batch(&devices).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].content, "generic ok-1");
        assert!(results[1].is_error());
        assert_eq!(results[2].content, "generic ok-2");
    }

    #[tokio::test]
    async fn test_timestamped_filename() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(TemplateCatalog::new(dir.path()), CredentialDefaults::default(), true);
        let out = renderer
            .render_at(&device(json!({"hostname": "CIENA 01"})), &[], fixed_now())
            .await;
        assert_eq!(out.filename, "CIENA_01_20260102T030405Z.txt");
    }

    #[tokio::test]
    async fn test_generated_at_in_context() {
        let (_dir, renderer) = renderer_with(&[("ciena_generic.cfg.j2", "{{ generated_at }}")]);
        let out = renderer
            .render_at(&device(json!({"hostname": "h"})), &["ciena_generic.cfg.j2".to_string()], fixed_now())
            .await;
        assert_eq!(out.content, "2026-01-02T03:04:05+00:00");
    }

    #[tokio::test]
    async fn test_shipped_templates() {
        let renderer = Renderer::new(
            TemplateCatalog::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")),
            CredentialDefaults::default(),
            false,
        );

        let compact = device(json!({
            "hostname": "NGA-AJO-CNA3903-01",
            "model": "3903",
            "backhaul": "single",
            "single_port": "1",
            "single_ip": "10.0.0.2/30",
            "single_vlan": "100",
            "single_neighbor_name": "NGA-IKJ-CNA8114-01",
            "single_neighbor_ip": "10.0.0.1",
            "tacacs_servers": ["10.1.1.1"],
        }));
        let out = renderer.render(&compact).await;
        assert!(!out.is_error(), "{:?}", out.error);
        assert_eq!(out.template, "ciena_3903_single.cfg.j2");
        assert!(out.content.contains("interface create ip-interface AJO-IKJ8114 ip 10.0.0.2/30 vlan 100"));
        assert!(out.content.contains("ip route add default gateway 10.0.0.1"));
        assert!(out.content.contains("secret vault://ciena/default/tacacs"));

        let generic = device(json!({
            "hostname": "NGA-AJO-CNA5142-01",
            "model": "5142",
            "backhaul": "dual",
            "primary_port": "1",
            "secondary_port": "2",
            "loopback_ip": "172.20.38.240",
            "other_interfaces": [{"name": "MGMT"}, {"port": "6"}],
            "syslog_collectors": [{"addr": "172.20.0.249", "severity": "error,warning"}],
        }));
        let out = renderer.render(&generic).await;
        assert!(!out.is_error(), "{:?}", out.error);
        assert_eq!(out.template, "ciena_generic.cfg.j2");
        assert!(out.content.contains("interface create ip-interface Port_1"));
        assert!(out.content.contains("interface create ip-interface Port_2"));
        assert!(out.content.contains("! pre-built interface MGMT"));
        assert!(out.content.contains("LOOPBACK ip 172.20.38.240/32"));
        assert!(out.content.contains("syslog add collector 172.20.0.249 severity error,warning"));

        let saos10 = device(json!({
            "hostname": "NGA-AJO-CNA5142-02",
            "model": "5142",
            "software_version": "saos10",
            "backhaul": "single",
            "single_port": "3",
            "single_vlan": 200,
            "ntp_servers": ["10.2.2.2"],
            "syslog_collectors": [{"addr": "172.20.0.249"}],
        }));
        let out = renderer.render(&saos10).await;
        assert!(!out.is_error(), "{:?}", out.error);
        assert_eq!(out.template, "ciena_saos10.cfg.j2");
        assert!(out.content.contains("classifiers Port_3-vlan200"));
        assert!(out.content.contains("ntp server 10.2.2.2"));
        assert!(out.content.contains("logging remote-server 172.20.0.249\n"));
    }

    #[tokio::test]
    async fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let rendered = RenderedConfig {
            hostname: "h".into(),
            filename: "h.txt".into(),
            template: "ciena_generic.cfg.j2".into(),
            content: "body".into(),
            error: None,
        };
        let out_dir = dir.path().join("output");
        let path = save(&out_dir, &rendered).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "body");
    }
}
