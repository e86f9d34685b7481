use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::models::*;
use crate::AppState;

use super::ApiError;

/// List the device model catalog and software families
pub async fn list_models() -> Json<ModelCatalogResponse> {
    Json(ModelCatalogResponse {
        models: HARDWARE_MODELS.iter().map(ModelInfo::from).collect(),
        software_families: software_family::ALL.iter().map(|s| s.to_string()).collect(),
    })
}

/// Get the credential defaults a model falls back to
pub async fn get_model_defaults(
    State(state): State<Arc<AppState>>,
    Path(model): Path<String>,
) -> Result<Json<ModelDefaults>, ApiError> {
    let hw = find_model(&model).ok_or_else(|| ApiError::not_found("model"))?;
    Ok(Json(state.renderer.defaults().lookup(hw.id).clone()))
}
