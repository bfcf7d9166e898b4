//! Rendering helpers: one pure function per content-node kind.
//!
//! Every styling decision comes from the [`RenderStyle`]; nothing here knows
//! which brand it is rendering.

use crate::cv::schema::{
    Bullet, Competence, ContentItem, CvHeader, Diplome, Experience, ExperienceItem, TextBlock,
};
use crate::render::logo::Logo;
use crate::render::model::{
    Alignment, Block, ImagePlacement, ImageRun, Paragraph, Run, Table, TableCell, TableRow,
};
use crate::template::{HeaderLayout, RenderStyle};

const BULLET_GLYPHS: [&str; 3] = ["\u{2022}", "\u{25CB}", "\u{25AA}"];
const BULLET_BASE_INDENT: u32 = 400;
const BULLET_LEVEL_INDENT: u32 = 400;
const BULLET_HANGING: u32 = 200;

/// Border widths in eighths of a point.
const SECTION_BORDER_SIZE: u32 = 12;
const RULE_BORDER_SIZE: u32 = 6;

/// Spacing used between diploma lines in compact mode.
const COMPACT_SPACING: u32 = 20;

const HEADER_TITLE_PCT: u32 = 60;
const HEADER_LOGO_PCT: u32 = 40;

fn body_run(text: impl Into<String>, style: &RenderStyle) -> Run {
    Run::new(text)
        .size(style.fonts.sizes.body)
        .color(&style.colors.text)
}

// ────────────────────────────────────────────────────────────────────────────
// Titles
// ────────────────────────────────────────────────────────────────────────────

/// Section title: a filled banner when the palette has a section background,
/// otherwise coloured text over a bottom rule.
pub fn section_title(title: &str, style: &RenderStyle) -> Paragraph {
    let base = Paragraph::new()
        .spacing(style.spacing.section, style.section_title_after)
        .keep_next();

    match &style.colors.section_bg {
        Some(fill) => base.align(Alignment::Center).shading(fill).run(
            Run::new(title.to_uppercase())
                .bold(true)
                .size(style.fonts.sizes.section)
                .color(&style.colors.white),
        ),
        None => base
            .align(Alignment::Left)
            .border_bottom(&style.colors.border, SECTION_BORDER_SIZE)
            .run(
                Run::new(title.to_uppercase())
                    .bold(true)
                    .size(style.fonts.sizes.section)
                    .color(&style.colors.primary),
            ),
    }
}

pub fn subsection_title(title: &str, style: &RenderStyle) -> Paragraph {
    let paragraph = Paragraph::new()
        .spacing(style.spacing.subsection, style.subsection_title_after)
        .keep_next()
        .run(
            Run::new(title)
                .bold(true)
                .size(style.fonts.sizes.subsection)
                .color(&style.colors.primary),
        );

    if style.subsection_border {
        paragraph.border_bottom(&style.colors.border, RULE_BORDER_SIZE)
    } else {
        paragraph
    }
}

/// Blank paragraph separating consecutive subsections.
pub fn spacer(style: &RenderStyle) -> Paragraph {
    Paragraph::new().spacing(0, style.spacing.paragraph)
}

// ────────────────────────────────────────────────────────────────────────────
// Leaf content
// ────────────────────────────────────────────────────────────────────────────

pub fn bullet(item: &Bullet, style: &RenderStyle) -> Paragraph {
    let level = item.level.min(2);
    let glyph = BULLET_GLYPHS[level as usize];
    Paragraph::new()
        .spacing(0, style.spacing.bullet)
        .indent(
            BULLET_BASE_INDENT + u32::from(level) * BULLET_LEVEL_INDENT,
            BULLET_HANGING,
        )
        .run(body_run(format!("{glyph}  "), style))
        .run(body_run(&item.text, style))
}

pub fn text_block(item: &TextBlock, style: &RenderStyle) -> Paragraph {
    Paragraph::new()
        .spacing(0, style.spacing.paragraph)
        .run(body_run(&item.text, style).bold(item.bold))
}

pub fn competence(item: &Competence, style: &RenderStyle) -> Paragraph {
    Paragraph::new()
        .spacing(0, style.spacing.bullet)
        .run(body_run(&item.categorie, style).bold(true))
        .run(body_run(format!(" : {}", item.valeurs), style))
}

/// "date + separator + title", then the institution.
pub fn diplome(item: &Diplome, style: &RenderStyle) -> Vec<Paragraph> {
    let (first_before, first_after, second_after) = if style.diplome_compact {
        (0, 0, COMPACT_SPACING)
    } else {
        (style.spacing.paragraph, 0, style.spacing.paragraph)
    };

    vec![
        Paragraph::new()
            .spacing(first_before, first_after)
            .keep_next()
            .run(body_run(&item.date, style).bold(true))
            .run(body_run(
                format!("{}{}", style.diplome_separator, item.titre),
                style,
            )),
        Paragraph::new().spacing(0, second_after).run(
            Run::new(&item.etablissement)
                .italic(true)
                .size(style.fonts.sizes.body)
                .color(&style.colors.period),
        ),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// "client | period" line followed by the mission title.
pub fn exp_header(item: &Experience, style: &RenderStyle) -> Vec<Paragraph> {
    let client_line = Paragraph::new()
        .spacing(style.spacing.experience, 0)
        .keep_next()
        .run(
            Run::new(&item.client)
                .bold(true)
                .size(style.fonts.sizes.subsection)
                .color(&style.colors.primary),
        )
        .run(body_run(" | ", style))
        .run(
            Run::new(&item.periode)
                .size(style.fonts.sizes.body)
                .color(&style.colors.period),
        );

    let mut title_line = Paragraph::new()
        .spacing(0, style.spacing.paragraph)
        .line_spacing(style.exp_title_line_spacing)
        .keep_next()
        .run(
            body_run(&item.titre, style)
                .bold(style.exp_title_bold)
                .italic(style.exp_title_italic),
        );
    if style.exp_title_border {
        title_line = title_line.border_bottom(&style.colors.border, RULE_BORDER_SIZE);
    }

    vec![client_line, title_line]
}

pub fn experience(item: &Experience, style: &RenderStyle) -> Vec<Paragraph> {
    let mut paragraphs = exp_header(item, style);

    if let Some(description) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
        paragraphs.push(
            Paragraph::new()
                .spacing(0, style.spacing.paragraph)
                .run(body_run(description, style)),
        );
    }

    for child in &item.content {
        paragraphs.push(match child {
            ExperienceItem::Bullet(b) => bullet(b, style),
            ExperienceItem::Text(t) => text_block(t, style),
            ExperienceItem::Competence(c) => competence(c, style),
        });
    }

    if let Some(environment) = item.environnement.as_deref().filter(|e| !e.trim().is_empty()) {
        paragraphs.push(
            Paragraph::new()
                .spacing(style.spacing.paragraph, style.spacing.paragraph)
                .run(body_run("Environnement : ", style).bold(true))
                .run(body_run(environment, style)),
        );
    }

    paragraphs
}

/// Dispatches a subsection child to its helper.
pub fn content_item(item: &ContentItem, style: &RenderStyle) -> Vec<Paragraph> {
    match item {
        ContentItem::Bullet(b) => vec![bullet(b, style)],
        ContentItem::Text(t) => vec![text_block(t, style)],
        ContentItem::Competence(c) => vec![competence(c, style)],
        ContentItem::Diplome(d) => diplome(d, style),
        ContentItem::Experience(e) => experience(e, style),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page header / footer
// ────────────────────────────────────────────────────────────────────────────

fn logo_image(style: &RenderStyle, placement: ImagePlacement) -> ImageRun {
    ImageRun {
        width_px: style.logo.width,
        height_px: style.logo.height,
        placement,
    }
}

/// Page header in one of two layouts.
///
/// `Table` wraps the title block and the logo in a borderless two-column
/// table; `Centered` floats the logo top-left and centers the title below.
pub fn header(cv_header: &CvHeader, style: &RenderStyle, logo: Option<&Logo>) -> Vec<Block> {
    match style.header_layout {
        HeaderLayout::Table => {
            let title = Paragraph::new().run(
                Run::new(&cv_header.titre)
                    .bold(style.header_title_bold)
                    .size(style.fonts.sizes.title)
                    .color(&style.colors.primary),
            );
            let subtitle = Paragraph::new().spacing(0, style.spacing.paragraph).run(
                Run::new(&cv_header.experience)
                    .size(style.fonts.sizes.subtitle)
                    .color(&style.colors.text),
            );

            let mut logo_cell = Paragraph::new().align(Alignment::Right);
            if logo.is_some() {
                logo_cell = logo_cell.image(logo_image(style, ImagePlacement::Inline));
            }

            vec![Block::Table(Table {
                rows: vec![TableRow {
                    cells: vec![
                        TableCell {
                            width_pct: HEADER_TITLE_PCT,
                            paragraphs: vec![title, subtitle],
                        },
                        TableCell {
                            width_pct: HEADER_LOGO_PCT,
                            paragraphs: vec![logo_cell],
                        },
                    ],
                }],
                borderless: true,
            })]
        }
        HeaderLayout::Centered => {
            let mut title = Paragraph::new().align(Alignment::Center);
            if logo.is_some() {
                title = title.image(logo_image(
                    style,
                    ImagePlacement::Floating {
                        offset_x: style.logo.offset_x,
                        offset_y: style.logo.offset_y,
                    },
                ));
            }
            let title = title.run(
                Run::new(&cv_header.titre)
                    .bold(style.header_title_bold)
                    .size(style.fonts.sizes.title)
                    .color(&style.accent),
            );
            let subtitle = Paragraph::new()
                .align(Alignment::Center)
                .spacing(0, style.spacing.paragraph)
                .run(
                    Run::new(&cv_header.experience)
                        .size(style.fonts.sizes.subtitle)
                        .color(&style.colors.text),
                );

            vec![title.into(), subtitle.into()]
        }
    }
}

/// Two centered lines, or `None` when the template disables the footer.
pub fn footer(style: &RenderStyle) -> Option<Vec<Block>> {
    let (line1, line2) = style.footer.as_ref()?;
    Some(vec![
        Paragraph::new()
            .align(Alignment::Center)
            .run(
                Run::new(line1)
                    .bold(true)
                    .size(style.fonts.sizes.small)
                    .color(&style.accent),
            )
            .into(),
        Paragraph::new()
            .align(Alignment::Center)
            .run(
                Run::new(line2)
                    .size(style.fonts.sizes.small)
                    .color(&style.accent),
            )
            .into(),
    ])
}
