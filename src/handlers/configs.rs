use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::*;
use crate::render::{self, RENDER_ERROR_MARKER};
use crate::utils::{is_plain_file_name, output_filename};
use crate::AppState;

use super::devices::validate_device;
use super::ApiError;

/// Persist a successful render to the output directory
async fn store(state: &AppState, rendered: &RenderedConfig) -> anyhow::Result<()> {
    if rendered.is_error() {
        return Ok(());
    }
    let path = render::save(std::path::Path::new(&state.config.output_dir), rendered).await?;
    tracing::info!("Wrote {} ({})", path.display(), rendered.template);
    Ok(())
}

/// Render the config for one device.
///
/// A template failure is still a 200: the content carries the error marker.
pub async fn render_config(
    State(state): State<Arc<AppState>>,
    Json(device): Json<DeviceRecord>,
) -> Result<Json<RenderedConfig>, ApiError> {
    validate_device(&device)?;
    let rendered = state.renderer.render(&device).await;
    store(&state, &rendered).await?;
    Ok(Json(rendered))
}

/// Render configs for several devices. Invalid devices, failed renders and
/// failed writes produce error entries without affecting the others.
///
/// The whole batch shares one timestamp, so a hostname that maps to an output
/// file already claimed earlier in the batch is rejected.
pub async fn render_batch(
    State(state): State<Arc<AppState>>,
    Json(devices): Json<Vec<DeviceRecord>>,
) -> Result<Json<Vec<RenderedConfig>>, ApiError> {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    let mut claimed = HashSet::new();
    for (idx, device) in devices.into_iter().enumerate() {
        if let Err(e) = validate_device(&device) {
            rejected.push((idx, invalid_entry(&device, e.message())));
            continue;
        }
        if !claimed.insert(output_filename(&device.hostname, None)) {
            rejected.push((idx, invalid_entry(&device, "duplicate hostname in batch")));
            continue;
        }
        valid.push((idx, device));
    }

    let records: Vec<DeviceRecord> = valid.iter().map(|(_, d)| d.clone()).collect();
    let rendered = state.renderer.render_batch(&records).await;

    let mut results: Vec<(usize, RenderedConfig)> = valid
        .into_iter()
        .map(|(idx, _)| idx)
        .zip(rendered)
        .collect();
    for (_, entry) in results.iter_mut() {
        if let Err(e) = store(&state, entry).await {
            let message = format!("{:#}", e);
            tracing::warn!("Failed to store {}: {}", entry.filename, message);
            mark_failed(entry, message);
        }
    }
    results.extend(rejected);
    results.sort_by_key(|(idx, _)| *idx);

    Ok(Json(results.into_iter().map(|(_, r)| r).collect()))
}

fn mark_failed(entry: &mut RenderedConfig, message: String) {
    entry.content = format!("{} {}\n", RENDER_ERROR_MARKER, message);
    entry.error = Some(message);
}

fn invalid_entry(device: &DeviceRecord, message: &str) -> RenderedConfig {
    let mut entry = RenderedConfig {
        hostname: device.hostname.clone(),
        filename: output_filename(&device.hostname, None),
        template: String::new(),
        content: String::new(),
        error: None,
    };
    mark_failed(&mut entry, format!("invalid device: {}", message));
    entry
}

/// Serve a rendered configuration file from the output directory
pub async fn serve_config(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    if !is_plain_file_name(&filename) {
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let config_path = std::path::Path::new(&state.config.output_dir).join(&filename);

    match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Config not found").into_response(),
    }
}
