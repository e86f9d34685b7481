use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::models::*;
use crate::selector;
use crate::AppState;

use super::ApiError;

/// List all templates in the catalog
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemplateEntry>>, ApiError> {
    let templates = state.renderer.catalog().list().await?;
    Ok(Json(templates))
}

/// Show which template a device with the given attributes would use
pub async fn preview_selection(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TemplateSelectQuery>,
) -> Result<Json<TemplateSelectResponse>, ApiError> {
    let available = state.renderer.catalog().names().await?;
    let template = selector::select_template(
        &query.model,
        &query.backhaul,
        &query.software,
        &query.role,
        &available,
    );
    let exists = available.contains(&template);
    Ok(Json(TemplateSelectResponse { template, exists }))
}
