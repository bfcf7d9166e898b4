use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::cv::validation::{validate, ValidationReport};
use crate::errors::AppError;
use crate::render::docx::DOCX_CONTENT_TYPE;
use crate::render::generate_cv;
use crate::state::AppState;
use crate::template::{presets, TemplateConfig};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Untyped CV payload; validated before anything is rendered.
    pub cv: Value,
    #[serde(default)]
    pub template: Option<String>,
    /// Inline brand, used instead of a built-in preset.
    #[serde(default)]
    pub template_config: Option<TemplateConfig>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// POST /api/v1/cv/validate
pub async fn handle_validate(Json(input): Json<Value>) -> Json<ValidationReport> {
    Json(ValidationReport::from(validate(&input)))
}

/// POST /api/v1/cv/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    let cv = validate(&req.cv).map_err(AppError::InvalidCv)?;

    let template = match req.template_config {
        Some(config) => config,
        None => {
            let id = req
                .template
                .unwrap_or_else(|| state.config.default_template.clone());
            presets::find(&id)
                .ok_or_else(|| AppError::NotFound(format!("Template '{id}' not found")))?
        }
    };

    let logo_path = req.logo.or_else(|| state.config.default_logo_path.clone());
    let document = generate_cv(
        &cv,
        &template,
        logo_path.as_deref(),
        state.logo_loader.as_ref(),
    )
    .await?;

    let filename = download_name(&cv.header.titre);
    info!(
        "Serving {filename} ({} page break(s), template '{}')",
        document.page_break_count(),
        template.id
    );

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        document.into_bytes(),
    )
        .into_response())
}

/// `CV_<slug>.docx`, where the slug is the ASCII-folded job title.
pub fn download_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "CV.docx".to_string()
    } else {
        format!("CV_{slug}.docx")
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'á' => 'a',
        'À' | 'Â' | 'Ä' | 'Á' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'î' | 'ï' | 'í' => 'i',
        'Î' | 'Ï' | 'Í' => 'I',
        'ô' | 'ö' | 'ó' => 'o',
        'Ô' | 'Ö' | 'Ó' => 'O',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'Ù' | 'Û' | 'Ü' | 'Ú' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}
