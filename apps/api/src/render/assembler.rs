//! Document assembler. Walks a validated CV and produces the page tree.
//!
//! Flow: load logo (best effort) → check + resolve template → header/footer →
//! sections in canonical order → package as DOCX on the blocking pool.
//!
//! Page-break rules:
//! - inside the `experiences` section, a break follows every experience item but the last;
//! - a break always follows the `certifications` section, whatever it contains.

use bytes::Bytes;
use tracing::{debug, info};

use crate::cv::schema::{CvDocument, Section, SectionId, SectionNode};
use crate::render::logo::{load_logo, Logo, LogoLoader};
use crate::render::model::Block;
use crate::render::{docx, helpers, GenerationError};
use crate::template::{Margins, RenderStyle, TemplateConfig};

/// Document-wide run defaults written to the style sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocDefaults {
    pub font_family: String,
    /// Half-points.
    pub font_size: u32,
    pub color: String,
}

/// The full page tree of one rendered CV.
#[derive(Debug, Clone)]
pub struct CvLayout {
    pub header: Vec<Block>,
    pub footer: Option<Vec<Block>>,
    pub body: Vec<Block>,
    pub margins: Margins,
    pub defaults: DocDefaults,
    pub logo: Option<Logo>,
}

impl CvLayout {
    pub fn page_break_count(&self) -> usize {
        self.body.iter().filter(|b| b.is_page_break()).count()
    }
}

/// A packaged CV. The caller owns it; the generator keeps no reference.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub layout: CvLayout,
    pub bytes: Bytes,
}

impl RenderedDocument {
    pub fn page_break_count(&self) -> usize {
        self.layout.page_break_count()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Renders `cv` with `template` into a DOCX document.
///
/// A logo that cannot be loaded is dropped silently; every other failure is fatal.
pub async fn generate_cv(
    cv: &CvDocument,
    template: &TemplateConfig,
    logo_path: Option<&str>,
    loader: &dyn LogoLoader,
) -> Result<RenderedDocument, GenerationError> {
    let logo = match logo_path {
        Some(path) => load_logo(loader, path).await,
        None => None,
    };

    let layout = layout_cv(cv, template, logo.as_ref())?;

    // XML + deflate is CPU-bound; run it on the blocking pool.
    let (layout, bytes) = tokio::task::spawn_blocking(move || {
        let bytes = docx::package(&layout)?;
        Ok::<_, GenerationError>((layout, bytes))
    })
    .await
    .map_err(|e| GenerationError::Task(e.to_string()))??;

    info!(
        "Generated CV '{}' with template '{}': {} body blocks, {} page breaks, {} bytes",
        cv.header.titre,
        template.id,
        layout.body.len(),
        layout.page_break_count(),
        bytes.len()
    );

    Ok(RenderedDocument { layout, bytes })
}

/// Builds the page tree synchronously. Deterministic for a given input.
pub fn layout_cv(
    cv: &CvDocument,
    template: &TemplateConfig,
    logo: Option<&Logo>,
) -> Result<CvLayout, GenerationError> {
    template.check()?;
    let style = template.resolve();

    let header = helpers::header(&cv.header, &style, logo);
    let footer = helpers::footer(&style);

    let mut body = Vec::new();
    for section in &cv.sections {
        if style.skips(section.id) {
            debug!("Skipping section '{}' per template", section.id.as_str());
            continue;
        }

        body.push(helpers::section_title(&section.title, &style).into());
        render_section(section, &style, &mut body);

        if section.id == SectionId::Certifications {
            body.push(Block::PageBreak);
        }
    }

    Ok(CvLayout {
        header,
        footer,
        body,
        margins: style.margins,
        defaults: DocDefaults {
            font_family: style.fonts.family.clone(),
            font_size: style.fonts.sizes.body,
            color: style.colors.text.clone(),
        },
        logo: logo.cloned(),
    })
}

fn render_section(section: &Section, style: &RenderStyle, body: &mut Vec<Block>) {
    let breaks_between_experiences = section.id == SectionId::Experiences;
    let experience_total = section
        .content
        .iter()
        .filter(|node| matches!(node, SectionNode::Experience(_)))
        .count();
    let mut experiences_seen = 0;
    let mut previous_was_subsection = false;

    for node in &section.content {
        let paragraphs = match node {
            SectionNode::Bullet(b) => vec![helpers::bullet(b, style)],
            SectionNode::Text(t) => vec![helpers::text_block(t, style)],
            SectionNode::Competence(c) => vec![helpers::competence(c, style)],
            SectionNode::Diplome(d) => helpers::diplome(d, style),
            SectionNode::Experience(e) => helpers::experience(e, style),
            SectionNode::SubSection(sub) => {
                let mut paragraphs = Vec::new();
                if previous_was_subsection {
                    paragraphs.push(helpers::spacer(style));
                }
                paragraphs.push(helpers::subsection_title(&sub.title, style));
                for item in &sub.content {
                    paragraphs.extend(helpers::content_item(item, style));
                }
                paragraphs
            }
        };
        body.extend(paragraphs.into_iter().map(Block::from));

        if let SectionNode::Experience(_) = node {
            experiences_seen += 1;
            if breaks_between_experiences && experiences_seen < experience_total {
                body.push(Block::PageBreak);
            }
        }
        previous_was_subsection = matches!(node, SectionNode::SubSection(_));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::validation::validate;
    use crate::render::logo::{FsLogoLoader, ImageFormat};
    use crate::render::model::Paragraph;
    use crate::template::presets;
    use serde_json::json;

    fn two_experience_cv() -> CvDocument {
        validate(&json!({
            "header": { "titre": "Développeur", "experience": "5 ans" },
            "sections": [{
                "type": "section", "id": "experiences", "title": "Expériences",
                "content": [
                    {
                        "type": "experience", "client": "Acme", "periode": "2020-2022",
                        "titre": "Lead Dev",
                        "content": [{ "type": "bullet", "text": "Built X", "level": 0 }]
                    },
                    { "type": "experience", "client": "Beta", "periode": "2022-2023",
                      "titre": "Dev", "content": [] }
                ]
            }]
        }))
        .unwrap()
    }

    fn experience(client: &str) -> serde_json::Value {
        json!({ "type": "experience", "client": client, "periode": "2021",
                "titre": "Consultant", "content": [] })
    }

    fn full_cv(experience_count: usize) -> CvDocument {
        let experiences: Vec<_> = (0..experience_count)
            .map(|i| experience(&format!("Client {i}")))
            .collect();
        validate(&json!({
            "header": { "titre": "Architecte", "experience": "12 ans" },
            "sections": [
                { "type": "section", "id": "experiences", "title": "Expériences", "content": experiences },
                { "type": "section", "id": "certifications", "title": "Certifications",
                  "content": [{ "type": "bullet", "text": "AWS Solutions Architect" }] },
                { "type": "section", "id": "competences", "title": "Compétences clés",
                  "content": [
                      { "type": "subsection", "title": "Back-end", "content": [
                          { "type": "competence", "categorie": "Langages", "valeurs": "Rust, Java" }
                      ]},
                      { "type": "subsection", "title": "Cloud", "content": [
                          { "type": "competence", "categorie": "Plateformes", "valeurs": "AWS, GCP" }
                      ]}
                  ]},
                { "type": "section", "id": "profil", "title": "Profil",
                  "content": [{ "type": "text", "text": "Architecte passionné", "bold": true }] }
            ]
        }))
        .unwrap()
    }

    fn no_skip(mut template: TemplateConfig) -> TemplateConfig {
        template.skip_sections = vec![];
        template
    }

    fn body_text(layout: &CvLayout) -> String {
        layout
            .body
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_two_experiences_yield_one_page_break() {
        let cv = two_experience_cv();
        assert_eq!(cv.sections.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let loader = FsLogoLoader::new(dir.path());
        let doc = generate_cv(&cv, &no_skip(presets::classic()), None, &loader)
            .await
            .unwrap();

        assert_eq!(doc.page_break_count(), 1);
        assert!(!doc.layout.body.last().unwrap().is_page_break());
        assert!(!doc.bytes.is_empty());
    }

    #[test]
    fn test_experience_breaks_plus_certifications_break() {
        for n in 2..=5 {
            let layout = layout_cv(&full_cv(n), &no_skip(presets::modern()), None).unwrap();
            assert_eq!(layout.page_break_count(), (n - 1) + 1, "n = {n}");
        }
    }

    #[test]
    fn test_certifications_break_sits_right_after_its_content() {
        let layout = layout_cv(&full_cv(2), &presets::classic(), None).unwrap();
        let cert_item = layout
            .body
            .iter()
            .position(|b| b.text().contains("AWS Solutions Architect"))
            .unwrap();
        assert!(layout.body[cert_item + 1].is_page_break());
        // The experiences section follows on a fresh page.
        assert!(layout.body[cert_item + 2].text().contains("EXPÉRIENCES"));
    }

    #[test]
    fn test_empty_certifications_still_breaks() {
        let cv = validate(&json!({
            "header": { "titre": "Dev", "experience": "1 an" },
            "sections": [{ "type": "section", "id": "certifications", "title": "Certifications", "content": [] }]
        }))
        .unwrap();
        let layout = layout_cv(&cv, &presets::classic(), None).unwrap();
        assert_eq!(layout.page_break_count(), 1);
        assert!(layout.body.last().unwrap().is_page_break());
    }

    #[test]
    fn test_sections_follow_canonical_order() {
        let layout = layout_cv(&full_cv(2), &presets::classic(), None).unwrap();
        let titles: Vec<String> = layout
            .body
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) if p.shading.is_some() => Some(p.text()),
                _ => None,
            })
            .collect();
        assert_eq!(
            titles,
            vec!["PROFIL", "COMPÉTENCES CLÉS", "CERTIFICATIONS", "EXPÉRIENCES"]
        );
    }

    #[test]
    fn test_skipped_section_leaves_no_trace() {
        let mut template = presets::classic();
        template.skip_sections = vec![SectionId::Skills];

        let layout = layout_cv(&full_cv(2), &template, None).unwrap();
        let text = body_text(&layout);
        for fragment in ["COMPÉTENCES CLÉS", "Back-end", "Cloud", "Langages", "Plateformes"] {
            assert!(!text.contains(fragment), "found '{fragment}'");
        }
        assert!(text.contains("PROFIL"));
    }

    #[test]
    fn test_consecutive_subsections_get_one_spacer() {
        let layout = layout_cv(&full_cv(2), &presets::classic(), None).unwrap();
        let cloud = layout
            .body
            .iter()
            .position(|b| b.text() == "Cloud")
            .unwrap();
        assert_eq!(layout.body[cloud - 1], Block::from(Paragraph::new().spacing(0, 80)));

        let back_end = layout
            .body
            .iter()
            .position(|b| b.text() == "Back-end")
            .unwrap();
        assert!(layout.body[back_end - 1].text().contains("COMPÉTENCES"));
    }

    #[test]
    fn test_experiences_outside_their_section_do_not_break() {
        let cv = validate(&json!({
            "header": { "titre": "Dev", "experience": "3 ans" },
            "sections": [{
                "type": "section", "id": "profil", "title": "Profil",
                "content": [experience("A"), experience("B"), experience("C")]
            }]
        }))
        .unwrap();
        let layout = layout_cv(&cv, &presets::classic(), None).unwrap();
        assert_eq!(layout.page_break_count(), 0);
    }

    #[test]
    fn test_footer_follows_template() {
        let classic = layout_cv(&full_cv(1), &presets::classic(), None).unwrap();
        assert!(classic.footer.is_some());
        let modern = layout_cv(&full_cv(1), &presets::modern(), None).unwrap();
        assert!(modern.footer.is_none());
    }

    #[test]
    fn test_margins_are_taken_verbatim() {
        let template = presets::modern();
        let layout = layout_cv(&full_cv(1), &template, None).unwrap();
        assert_eq!(layout.margins, template.margins);
    }

    #[test]
    fn test_malformed_template_is_fatal() {
        let mut template = presets::classic();
        template.colors.text = "not-a-colour".to_string();
        let err = layout_cv(&full_cv(1), &template, None).unwrap_err();
        assert!(matches!(err, GenerationError::Template(_)));
    }

    #[tokio::test]
    async fn test_missing_logo_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsLogoLoader::new(dir.path());

        let doc = generate_cv(
            &full_cv(2),
            &presets::classic(),
            Some("does/not/exist.png"),
            &loader,
        )
        .await
        .unwrap();

        assert!(doc.layout.logo.is_none());
        let images = doc
            .layout
            .header
            .iter()
            .flat_map(|b| b.paragraphs())
            .flat_map(|p| p.images())
            .count();
        assert_eq!(images, 0);
        assert!(!doc.into_bytes().is_empty());
    }

    #[tokio::test]
    async fn test_logo_is_carried_into_layout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("logo.png"),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3],
        )
        .unwrap();
        let loader = FsLogoLoader::new(dir.path());

        let doc = generate_cv(&full_cv(1), &presets::modern(), Some("logo.png"), &loader)
            .await
            .unwrap();
        assert_eq!(doc.layout.logo.as_ref().map(|l| l.format), Some(ImageFormat::Png));
        assert!(matches!(doc.layout.header[0], Block::Table(_)));
    }
}
