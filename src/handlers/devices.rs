use axum::{extract::Query, Json};

use crate::interfaces::{derive_interfaces, derive_link_id, extract_model_token, SiteToken};
use crate::models::*;

use super::ApiError;

/// Check the fields a render depends on.
/// The core tolerates anything; this is where bad input gets rejected.
pub fn validate_device(device: &DeviceRecord) -> Result<(), ApiError> {
    if device.hostname.trim().is_empty() {
        return Err(ApiError::bad_request("hostname is required"));
    }
    let model = find_model(&device.model)
        .ok_or_else(|| ApiError::bad_request(format!("unknown model {:?}", device.model)))?;
    if !software_family::is_valid(device.software_version.trim()) {
        return Err(ApiError::bad_request(format!(
            "unknown software version {:?}",
            device.software_version
        )));
    }
    if device.backhaul == Backhaul::Dual && !model.supports_dual_backhaul() {
        return Err(ApiError::bad_request(format!(
            "model {} does not support dual backhaul",
            model.id
        )));
    }
    if device.aggregation_enabled && !model.supports_aggregation() {
        return Err(ApiError::bad_request(format!(
            "model {} does not support aggregation",
            model.id
        )));
    }
    Ok(())
}

/// Derive the interface list for a device without rendering
pub async fn preview_interfaces(
    Json(device): Json<DeviceRecord>,
) -> Result<Json<Vec<Interface>>, ApiError> {
    Ok(Json(derive_interfaces(&device)))
}

/// Preview the link identifier for a hostname pair
pub async fn preview_link_id(Query(query): Query<LinkIdQuery>) -> Json<LinkIdResponse> {
    let local = SiteToken::parse(query.local.trim());
    let remote = SiteToken::parse(query.remote.trim());
    Json(LinkIdResponse {
        link_id: derive_link_id(&query.local, &query.remote),
        local_site: local.as_str().to_string(),
        local_convention: local.convention().to_string(),
        remote_site: remote.as_str().to_string(),
        remote_convention: remote.convention().to_string(),
        remote_model: extract_model_token(&query.remote),
    })
}
