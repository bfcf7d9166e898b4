use axum::{extract::Path, Json};

use crate::errors::AppError;
use crate::template::presets::{self, TemplateSummary};
use crate::template::TemplateConfig;

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateSummary>> {
    Json(presets::summaries())
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(Path(id): Path<String>) -> Result<Json<TemplateConfig>, AppError> {
    presets::find(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template '{id}' not found")))
}
