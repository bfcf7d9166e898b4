//! Built-in CV brands.

use serde::Serialize;

use crate::template::{
    DiplomeStyle, ExperienceStyle, FontSizes, Fonts, FooterConfig, HeaderLayout, HeaderStyle,
    LogoBox, Margins, Palette, Spacing, SubSectionStyle, TemplateConfig,
};

/// Listing entry for `GET /api/v1/templates`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
}

/// Filled section banners, centered header with floating logo, two-line footer.
pub fn classic() -> TemplateConfig {
    TemplateConfig {
        id: "classic".to_string(),
        name: "Classique".to_string(),
        colors: Palette {
            primary: "1F3864".to_string(),
            section_bg: Some("1F3864".to_string()),
            border: "1F3864".to_string(),
            period: "7F7F7F".to_string(),
            text: "262626".to_string(),
            white: "FFFFFF".to_string(),
        },
        fonts: Fonts {
            family: "Calibri".to_string(),
            sizes: FontSizes {
                title: 36,
                subtitle: 26,
                section: 24,
                subsection: 22,
                body: 20,
                small: 16,
            },
        },
        spacing: Spacing {
            section: 320,
            subsection: 160,
            paragraph: 80,
            bullet: 40,
            experience: 240,
            section_after: Some(200),
            subsection_after: None,
        },
        margins: Margins {
            top: 1440,
            right: 1080,
            bottom: 1200,
            left: 1080,
        },
        logo: LogoBox {
            width: 140,
            height: 60,
            offset_x: 40,
            offset_y: 30,
        },
        header: HeaderStyle {
            layout: HeaderLayout::Centered,
            title_bold: true,
        },
        sub_section_style: None,
        experience_style: None,
        skip_sections: vec![],
        diplome_style: None,
        footer: FooterConfig {
            enabled: Some(true),
            line1: "Dossier de compétences".to_string(),
            line2: "Document confidentiel - reproduction interdite".to_string(),
        },
    }
}

/// Underlined section titles, title/logo side-by-side table header, no footer.
pub fn modern() -> TemplateConfig {
    TemplateConfig {
        id: "modern".to_string(),
        name: "Moderne".to_string(),
        colors: Palette {
            primary: "C0392B".to_string(),
            section_bg: None,
            border: "C0392B".to_string(),
            period: "8C8C8C".to_string(),
            text: "333333".to_string(),
            white: "FFFFFF".to_string(),
        },
        fonts: Fonts {
            family: "Arial".to_string(),
            sizes: FontSizes {
                title: 32,
                subtitle: 24,
                section: 26,
                subsection: 22,
                body: 19,
                small: 16,
            },
        },
        spacing: Spacing {
            section: 280,
            subsection: 140,
            paragraph: 60,
            bullet: 30,
            experience: 200,
            section_after: None,
            subsection_after: Some(60),
        },
        margins: Margins {
            top: 1200,
            right: 1000,
            bottom: 1000,
            left: 1000,
        },
        logo: LogoBox {
            width: 160,
            height: 56,
            offset_x: 0,
            offset_y: 0,
        },
        header: HeaderStyle {
            layout: HeaderLayout::Table,
            title_bold: true,
        },
        sub_section_style: Some(SubSectionStyle {
            border_bottom: Some(false),
        }),
        experience_style: Some(ExperienceStyle {
            title_bold: Some(true),
            title_italic: Some(false),
            border_bottom: Some(false),
            title_line_spacing: Some(276),
        }),
        skip_sections: vec![],
        diplome_style: Some(DiplomeStyle {
            separator: Some(" | ".to_string()),
            compact: Some(true),
        }),
        footer: FooterConfig {
            enabled: Some(false),
            line1: String::new(),
            line2: String::new(),
        },
    }
}

pub fn all() -> Vec<TemplateConfig> {
    vec![classic(), modern()]
}

pub fn find(id: &str) -> Option<TemplateConfig> {
    all().into_iter().find(|t| t.id == id)
}

pub fn summaries() -> Vec<TemplateSummary> {
    all()
        .into_iter()
        .map(|t| TemplateSummary {
            id: t.id,
            name: t.name,
        })
        .collect()
}
