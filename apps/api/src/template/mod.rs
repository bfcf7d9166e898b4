//! Template configuration: every brand-specific styling decision as data.
//!
//! A [`TemplateConfig`] is selected per generation call and never mutated.
//! Rendering code never reads it directly: [`TemplateConfig::resolve`] applies
//! all defaults once and hands the helpers a [`RenderStyle`].
//!
//! Units follow WordprocessingML: font sizes in half-points, spacing and
//! margins in twips (1/20 pt), logo box in pixels.

pub mod handlers;
pub mod presets;

use serde::{Deserialize, Serialize};

use crate::cv::schema::SectionId;
use crate::render::docx::{A4_HEIGHT, A4_WIDTH};
use crate::render::GenerationError;

const DEFAULT_DIPLOME_SEPARATOR: &str = " - ";

// ────────────────────────────────────────────────────────────────────────────
// Declarative record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub id: String,
    pub name: String,
    pub colors: Palette,
    pub fonts: Fonts,
    pub spacing: Spacing,
    pub margins: Margins,
    pub logo: LogoBox,
    pub header: HeaderStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_section_style: Option<SubSectionStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_style: Option<ExperienceStyle>,
    /// Sections dropped entirely from the rendered document.
    #[serde(default)]
    pub skip_sections: Vec<SectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diplome_style: Option<DiplomeStyle>,
    #[serde(default)]
    pub footer: FooterConfig,
}

/// Hex colours, without the leading `#`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    /// `None` switches section titles from a filled banner to an underline.
    pub section_bg: Option<String>,
    pub border: String,
    pub period: String,
    pub text: String,
    pub white: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fonts {
    pub family: String,
    pub sizes: FontSizes,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSizes {
    pub title: u32,
    pub subtitle: u32,
    pub section: u32,
    pub subsection: u32,
    pub body: u32,
    pub small: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub section: u32,
    pub subsection: u32,
    pub paragraph: u32,
    pub bullet: u32,
    pub experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_after: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection_after: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Logo box in pixels. Offsets only apply to the floating (centered) header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoBox {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub offset_x: u32,
    #[serde(default)]
    pub offset_y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLayout {
    /// Floating logo top-left, centered title block.
    Centered,
    /// Borderless two-column table: title left, logo right.
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderStyle {
    pub layout: HeaderLayout,
    #[serde(default)]
    pub title_bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubSectionStyle {
    pub border_bottom: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceStyle {
    pub title_bold: Option<bool>,
    pub title_italic: Option<bool>,
    pub border_bottom: Option<bool>,
    /// Line spacing for the mission title, in 240ths of a line.
    pub title_line_spacing: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomeStyle {
    pub separator: Option<String>,
    pub compact: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterConfig {
    pub enabled: Option<bool>,
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Resolved style
// ────────────────────────────────────────────────────────────────────────────

/// A template with every optional field resolved. Built once per render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub colors: Palette,
    pub fonts: Fonts,
    pub spacing: Spacing,
    pub margins: Margins,
    pub logo: LogoBox,
    pub header_layout: HeaderLayout,
    pub header_title_bold: bool,
    /// Colour of the centered header title and the footer.
    pub accent: String,
    pub section_title_after: u32,
    pub subsection_title_after: u32,
    pub subsection_border: bool,
    pub exp_title_bold: bool,
    pub exp_title_italic: bool,
    pub exp_title_border: bool,
    pub exp_title_line_spacing: Option<u32>,
    pub diplome_separator: String,
    pub diplome_compact: bool,
    /// `Some((line1, line2))` when the footer is rendered.
    pub footer: Option<(String, String)>,
    pub skip_sections: Vec<SectionId>,
}

impl RenderStyle {
    pub fn skips(&self, id: SectionId) -> bool {
        self.skip_sections.contains(&id)
    }
}

impl TemplateConfig {
    /// Applies every default in one place.
    pub fn resolve(&self) -> RenderStyle {
        let sub = self.sub_section_style.unwrap_or_default();
        let exp = self.experience_style.unwrap_or_default();
        let diplome = self.diplome_style.clone().unwrap_or_default();

        RenderStyle {
            colors: self.colors.clone(),
            fonts: self.fonts.clone(),
            spacing: self.spacing,
            margins: self.margins,
            logo: self.logo,
            header_layout: self.header.layout,
            header_title_bold: self.header.title_bold,
            accent: self
                .colors
                .section_bg
                .clone()
                .unwrap_or_else(|| self.colors.primary.clone()),
            section_title_after: self.spacing.section_after.unwrap_or(self.spacing.subsection),
            subsection_title_after: self
                .spacing
                .subsection_after
                .unwrap_or(self.spacing.paragraph),
            subsection_border: sub.border_bottom.unwrap_or(true),
            exp_title_bold: exp.title_bold.unwrap_or(false),
            exp_title_italic: exp.title_italic.unwrap_or(true),
            exp_title_border: exp.border_bottom.unwrap_or(true),
            exp_title_line_spacing: exp.title_line_spacing,
            diplome_separator: diplome
                .separator
                .unwrap_or_else(|| DEFAULT_DIPLOME_SEPARATOR.to_string()),
            diplome_compact: diplome.compact.unwrap_or(false),
            footer: self
                .footer
                .enabled
                .unwrap_or(true)
                .then(|| (self.footer.line1.clone(), self.footer.line2.clone())),
            skip_sections: self.skip_sections.clone(),
        }
    }

    /// Rejects configurations the renderer cannot turn into a valid document.
    pub fn check(&self) -> Result<(), GenerationError> {
        let colors = [
            ("colors.primary", Some(&self.colors.primary)),
            ("colors.sectionBg", self.colors.section_bg.as_ref()),
            ("colors.border", Some(&self.colors.border)),
            ("colors.period", Some(&self.colors.period)),
            ("colors.text", Some(&self.colors.text)),
            ("colors.white", Some(&self.colors.white)),
        ];
        for (field, value) in colors {
            if let Some(hex) = value {
                if !is_hex_color(hex) {
                    return Err(GenerationError::Template(format!(
                        "{field} must be a 6-digit hex colour, got '{hex}'"
                    )));
                }
            }
        }

        if self.fonts.family.trim().is_empty() {
            return Err(GenerationError::Template(
                "fonts.family must not be empty".to_string(),
            ));
        }

        let s = &self.fonts.sizes;
        let sizes = [
            ("title", s.title),
            ("subtitle", s.subtitle),
            ("section", s.section),
            ("subsection", s.subsection),
            ("body", s.body),
            ("small", s.small),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, size)| *size == 0) {
            return Err(GenerationError::Template(format!(
                "fonts.sizes.{name} must be greater than zero"
            )));
        }

        if self.logo.width == 0 || self.logo.height == 0 {
            return Err(GenerationError::Template(
                "logo dimensions must be greater than zero".to_string(),
            ));
        }

        let m = &self.margins;
        let horizontal = u64::from(m.left) + u64::from(m.right);
        let vertical = u64::from(m.top) + u64::from(m.bottom);
        if horizontal >= u64::from(A4_WIDTH) || vertical >= u64::from(A4_HEIGHT) {
            return Err(GenerationError::Template(format!(
                "margins leave no printable area on an A4 page ({A4_WIDTH}x{A4_HEIGHT} twips)"
            )));
        }

        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit())
}
