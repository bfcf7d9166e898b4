//! WordprocessingML packaging.
//!
//! Serialises a [`CvLayout`] into the minimal set of OOXML parts Word needs
//! and zips them. Page size is A4 portrait.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use bytes::Bytes;
use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::render::assembler::{CvLayout, DocDefaults};
use crate::render::logo::ImageFormat;
use crate::render::model::{
    Alignment, Block, ImagePlacement, ImageRun, Inline, Paragraph, Run, Table,
};
use crate::render::GenerationError;
use crate::template::Margins;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A4 portrait, in twips.
pub const A4_WIDTH: u32 = 11906;
pub const A4_HEIGHT: u32 = 16838;
const HEADER_DISTANCE: u32 = 567;
const FOOTER_DISTANCE: u32 = 567;
const EMU_PER_PIXEL: u64 = 9525;
/// Table widths are expressed in fiftieths of a percent.
const PCT_UNIT: u32 = 50;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const LOGO_REL_ID: &str = "rIdLogo";

/// Zips the layout into a `.docx` byte buffer.
pub fn package(layout: &CvLayout) -> Result<Bytes, GenerationError> {
    let logo_format = layout.logo.as_ref().map(|l| l.format);
    let has_footer = layout.footer.is_some();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    write_part(
        &mut zip,
        "[Content_Types].xml",
        content_types(has_footer, logo_format).as_bytes(),
    )?;
    write_part(&mut zip, "_rels/.rels", root_rels().as_bytes())?;
    write_part(&mut zip, "word/document.xml", document_xml(layout).as_bytes())?;
    write_part(
        &mut zip,
        "word/_rels/document.xml.rels",
        document_rels(has_footer).as_bytes(),
    )?;
    write_part(&mut zip, "word/styles.xml", styles_xml(&layout.defaults).as_bytes())?;
    write_part(
        &mut zip,
        "word/header1.xml",
        part_xml("hdr", &layout.header, text_width(&layout.margins)).as_bytes(),
    )?;

    if let Some(logo) = &layout.logo {
        write_part(
            &mut zip,
            "word/_rels/header1.xml.rels",
            header_rels(logo.format).as_bytes(),
        )?;
        write_part(
            &mut zip,
            &format!("word/media/logo.{}", logo.format.extension()),
            &logo.bytes,
        )?;
    }

    if let Some(footer) = &layout.footer {
        write_part(
            &mut zip,
            "word/footer1.xml",
            part_xml("ftr", footer, text_width(&layout.margins)).as_bytes(),
        )?;
    }

    let cursor = zip.finish()?;
    Ok(Bytes::from(cursor.into_inner()))
}

fn write_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    data: &[u8],
) -> Result<(), GenerationError> {
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, options)?;
    zip.write_all(data)?;
    Ok(())
}

/// Escapes markup and drops characters XML 1.0 does not allow
/// (C0 controls other than tab, LF and CR, and U+FFFE/U+FFFF).
fn xml_text(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(is_xml_char) {
        escape(raw)
    } else {
        let cleaned: String = raw.chars().filter(|c| is_xml_char(*c)).collect();
        Cow::Owned(escape(cleaned.as_str()).into_owned())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

fn text_width(margins: &Margins) -> u32 {
    A4_WIDTH.saturating_sub(margins.left.saturating_add(margins.right))
}

// ────────────────────────────────────────────────────────────────────────────
// Package plumbing
// ────────────────────────────────────────────────────────────────────────────

fn content_types(has_footer: bool, logo: Option<ImageFormat>) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#
    );
    if let Some(format) = logo {
        xml.push_str(&format!(
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            format.extension(),
            format.content_type()
        ));
    }
    xml.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#);
    if has_footer {
        xml.push_str(r#"<Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#);
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="word/document.xml"/></Relationships>"#
    )
}

fn document_rels(has_footer: bool) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rIdStyles" Type="{REL_BASE}/styles" Target="styles.xml"/><Relationship Id="rIdHeader" Type="{REL_BASE}/header" Target="header1.xml"/>"#
    );
    if has_footer {
        xml.push_str(&format!(
            r#"<Relationship Id="rIdFooter" Type="{REL_BASE}/footer" Target="footer1.xml"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn header_rels(format: ImageFormat) -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="{LOGO_REL_ID}" Type="{REL_BASE}/image" Target="media/logo.{}"/></Relationships>"#,
        format.extension()
    )
}

fn styles_xml(defaults: &DocDefaults) -> String {
    let font = xml_text(defaults.font_family.as_str());
    format!(
        r#"{XML_DECL}<w:styles xmlns:w="{NS_W}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/><w:color w:val="{color}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/><w:lang w:val="fr-FR"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style></w:styles>"#,
        color = xml_text(defaults.color.as_str()),
        size = defaults.font_size,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Parts
// ────────────────────────────────────────────────────────────────────────────

fn namespaces() -> String {
    format!(
        r#"xmlns:w="{NS_W}" xmlns:r="{NS_R}" xmlns:wp="{NS_WP}" xmlns:a="{NS_A}" xmlns:pic="{NS_PIC}""#
    )
}

fn document_xml(layout: &CvLayout) -> String {
    let width = text_width(&layout.margins);
    let mut xml = format!(r#"{XML_DECL}<w:document {}><w:body>"#, namespaces());
    for block in &layout.body {
        write_block(&mut xml, block, width);
    }

    let m = &layout.margins;
    xml.push_str(r#"<w:sectPr><w:headerReference w:type="default" r:id="rIdHeader"/>"#);
    if layout.footer.is_some() {
        xml.push_str(r#"<w:footerReference w:type="default" r:id="rIdFooter"/>"#);
    }
    xml.push_str(&format!(
        r#"<w:pgSz w:w="{A4_WIDTH}" w:h="{A4_HEIGHT}"/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{HEADER_DISTANCE}" w:footer="{FOOTER_DISTANCE}" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        m.top, m.right, m.bottom, m.left
    ));
    xml
}

/// Header (`hdr`) or footer (`ftr`) part.
fn part_xml(root: &str, blocks: &[Block], width: u32) -> String {
    let mut xml = format!(r#"{XML_DECL}<w:{root} {}>"#, namespaces());
    for block in blocks {
        write_block(&mut xml, block, width);
    }
    // A part must end with a paragraph.
    if !matches!(blocks.last(), Some(Block::Paragraph(_))) {
        xml.push_str("<w:p/>");
    }
    xml.push_str(&format!("</w:{root}>"));
    xml
}

fn write_block(xml: &mut String, block: &Block, width: u32) {
    match block {
        Block::Paragraph(p) => write_paragraph(xml, p),
        Block::Table(t) => write_table(xml, t, width),
        Block::PageBreak => xml.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#),
    }
}

fn write_paragraph(xml: &mut String, p: &Paragraph) {
    xml.push_str("<w:p><w:pPr>");
    if p.keep_next {
        xml.push_str("<w:keepNext/>");
    }
    if let Some(border) = &p.border_bottom {
        xml.push_str(&format!(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="{}" w:space="{}" w:color="{}"/></w:pBdr>"#,
            border.size,
            border.space,
            xml_text(border.color.as_str())
        ));
    }
    if let Some(fill) = &p.shading {
        xml.push_str(&format!(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
            xml_text(fill.as_str())
        ));
    }
    xml.push_str(&format!(
        r#"<w:spacing w:before="{}" w:after="{}""#,
        p.spacing.before, p.spacing.after
    ));
    if let Some(line) = p.spacing.line {
        xml.push_str(&format!(r#" w:line="{line}" w:lineRule="auto""#));
    }
    xml.push_str("/>");
    if let Some(indent) = &p.indent {
        xml.push_str(&format!(
            r#"<w:ind w:left="{}" w:hanging="{}"/>"#,
            indent.left, indent.hanging
        ));
    }
    let jc = match p.alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    };
    xml.push_str(&format!(r#"<w:jc w:val="{jc}"/></w:pPr>"#));

    for (index, inline) in p.inlines.iter().enumerate() {
        match inline {
            Inline::Text(run) => write_run(xml, run),
            Inline::Image(image) => write_image(xml, image, index),
        }
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r><w:rPr>");
    if run.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    if run.italic {
        xml.push_str("<w:i/><w:iCs/>");
    }
    if let Some(color) = &run.color {
        xml.push_str(&format!(r#"<w:color w:val="{}"/>"#, xml_text(color.as_str())));
    }
    if let Some(size) = run.size {
        xml.push_str(&format!(r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#));
    }
    xml.push_str(&format!(
        r#"</w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        xml_text(run.text.as_str())
    ));
}

fn write_image(xml: &mut String, image: &ImageRun, index: usize) {
    let cx = u64::from(image.width_px) * EMU_PER_PIXEL;
    let cy = u64::from(image.height_px) * EMU_PER_PIXEL;
    let id = index + 1;
    let graphic = format!(
        r#"<wp:docPr id="{id}" name="Logo {id}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="{NS_PIC}"><pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="logo"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{LOGO_REL_ID}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic>"#
    );

    xml.push_str("<w:r><w:drawing>");
    match image.placement {
        ImagePlacement::Inline => xml.push_str(&format!(
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/>{graphic}</wp:inline>"#
        )),
        ImagePlacement::Floating { offset_x, offset_y } => {
            let x = u64::from(offset_x) * EMU_PER_PIXEL;
            let y = u64::from(offset_y) * EMU_PER_PIXEL;
            xml.push_str(&format!(
                r#"<wp:anchor distT="0" distB="0" distL="114300" distR="114300" simplePos="0" relativeHeight="251658240" behindDoc="0" locked="0" layoutInCell="1" allowOverlap="1"><wp:simplePos x="0" y="0"/><wp:positionH relativeFrom="page"><wp:posOffset>{x}</wp:posOffset></wp:positionH><wp:positionV relativeFrom="page"><wp:posOffset>{y}</wp:posOffset></wp:positionV><wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:wrapSquare wrapText="bothSides"/>{graphic}</wp:anchor>"#
            ));
        }
    }
    xml.push_str("</w:drawing></w:r>");
}

fn write_table(xml: &mut String, table: &Table, width: u32) {
    xml.push_str(r#"<w:tbl><w:tblPr><w:tblW w:w="5000" w:type="pct"/>"#);
    if table.borderless {
        xml.push_str("<w:tblBorders>");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            xml.push_str(&format!(r#"<w:{edge} w:val="nil"/>"#));
        }
        xml.push_str("</w:tblBorders>");
    }
    xml.push_str(r#"<w:tblLayout w:type="fixed"/></w:tblPr><w:tblGrid>"#);
    if let Some(first) = table.rows.first() {
        for cell in &first.cells {
            xml.push_str(&format!(
                r#"<w:gridCol w:w="{}"/>"#,
                width * cell.width_pct / 100
            ));
        }
    }
    xml.push_str("</w:tblGrid>");

    for row in &table.rows {
        xml.push_str("<w:tr>");
        for cell in &row.cells {
            xml.push_str(&format!(
                r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="pct"/><w:vAlign w:val="center"/></w:tcPr>"#,
                cell.width_pct * PCT_UNIT
            ));
            if cell.paragraphs.is_empty() {
                xml.push_str("<w:p/>");
            }
            for p in &cell.paragraphs {
                write_paragraph(xml, p);
            }
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::validation::validate;
    use crate::render::assembler::layout_cv;
    use crate::render::logo::Logo;
    use crate::template::presets;
    use serde_json::json;
    use std::io::Read;

    fn sample_layout(template: &crate::template::TemplateConfig, logo: Option<&Logo>) -> CvLayout {
        let cv = validate(&json!({
            "header": { "titre": "Data & IA <Lead>", "experience": "10 ans" },
            "sections": [
                { "type": "section", "id": "certifications", "title": "Certifications",
                  "content": [{ "type": "bullet", "text": "PMP" }] },
                { "type": "section", "id": "experiences", "title": "Expériences", "content": [
                    { "type": "experience", "client": "A", "periode": "2020", "titre": "Dev", "content": [] },
                    { "type": "experience", "client": "B", "periode": "2021", "titre": "Dev", "content": [] },
                    { "type": "experience", "client": "C", "periode": "2022", "titre": "Dev", "content": [] }
                ]}
            ]
        }))
        .unwrap();
        layout_cv(&cv, template, logo).unwrap()
    }

    fn read_entry(bytes: &Bytes, name: &str) -> Option<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut file = archive.by_name(name).ok()?;
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        Some(out)
    }

    #[test]
    fn test_package_contains_core_parts() {
        let bytes = package(&sample_layout(&presets::classic(), None)).unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "word/header1.xml",
            "word/footer1.xml",
        ] {
            assert!(read_entry(&bytes, part).is_some(), "missing {part}");
        }
        assert!(read_entry(&bytes, "word/_rels/header1.xml.rels").is_none());
    }

    #[test]
    fn test_document_xml_page_breaks_and_margins() {
        let template = presets::classic();
        let bytes = package(&sample_layout(&template, None)).unwrap();
        let document = read_entry(&bytes, "word/document.xml").unwrap();
        // 2 between three experiences + 1 after certifications.
        assert_eq!(document.matches(r#"<w:br w:type="page"/>"#).count(), 3);
        assert!(document.contains(&format!(r#"w:top="{}""#, template.margins.top)));
        assert!(document.contains("rIdFooter"));
    }

    #[test]
    fn test_text_is_escaped() {
        let bytes = package(&sample_layout(&presets::classic(), None)).unwrap();
        let header = read_entry(&bytes, "word/header1.xml").unwrap();
        assert!(header.contains("Data &amp; IA &lt;Lead&gt;"));
    }

    #[test]
    fn test_banner_and_underline_are_distinct_in_xml() {
        let banner = package(&sample_layout(&presets::classic(), None)).unwrap();
        let underline = package(&sample_layout(&presets::modern(), None)).unwrap();
        let banner_doc = read_entry(&banner, "word/document.xml").unwrap();
        let underline_doc = read_entry(&underline, "word/document.xml").unwrap();
        assert!(banner_doc.contains("<w:shd "));
        assert!(!underline_doc.contains("<w:shd "));
        assert!(underline_doc.contains("<w:pBdr>"));
    }

    #[test]
    fn test_footer_omitted_when_disabled() {
        let bytes = package(&sample_layout(&presets::modern(), None)).unwrap();
        assert!(read_entry(&bytes, "word/footer1.xml").is_none());
        let document = read_entry(&bytes, "word/document.xml").unwrap();
        assert!(!document.contains("rIdFooter"));
        let types = read_entry(&bytes, "[Content_Types].xml").unwrap();
        assert!(!types.contains("footer1.xml"));
    }

    #[test]
    fn test_logo_is_embedded_in_header() {
        let logo = Logo {
            bytes: Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 7]),
            format: ImageFormat::Png,
        };
        let bytes = package(&sample_layout(&presets::modern(), Some(&logo))).unwrap();

        let header = read_entry(&bytes, "word/header1.xml").unwrap();
        assert!(header.contains("<w:tbl>"));
        assert!(header.contains("<wp:inline"));
        assert!(header.contains(LOGO_REL_ID));

        let rels = read_entry(&bytes, "word/_rels/header1.xml.rels").unwrap();
        assert!(rels.contains("media/logo.png"));
        let types = read_entry(&bytes, "[Content_Types].xml").unwrap();
        assert!(types.contains(r#"Extension="png""#));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut media = archive.by_name("word/media/logo.png").unwrap();
        let mut data = Vec::new();
        media.read_to_end(&mut data).unwrap();
        assert_eq!(data, logo.bytes.to_vec());
    }

    #[test]
    fn test_centered_header_anchors_logo() {
        let logo = Logo {
            bytes: Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0]),
            format: ImageFormat::Jpeg,
        };
        let bytes = package(&sample_layout(&presets::classic(), Some(&logo))).unwrap();
        let header = read_entry(&bytes, "word/header1.xml").unwrap();
        assert!(header.contains("<wp:anchor"));
        assert!(header.contains("<wp:wrapSquare"));
        assert!(!header.contains("<w:tbl>"));
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        assert!(archive.by_name("word/media/logo.jpeg").is_ok());
    }

    #[test]
    fn test_control_characters_are_dropped_from_xml() {
        let cv = validate(&json!({
            "header": { "titre": "Lead\u{0001} Dev", "experience": "10 ans" },
            "sections": [{
                "type": "section", "id": "profil", "title": "Profil",
                "content": [
                    { "type": "text", "text": "page1\u{000C}page2 \u{0001}" },
                    { "type": "competence", "categorie": "Outils", "valeurs": "Git\u{0008}, Tab\there" }
                ]
            }]
        }))
        .unwrap();
        let layout = layout_cv(&cv, &presets::classic(), None).unwrap();
        let bytes = package(&layout).unwrap();

        for part in ["word/document.xml", "word/header1.xml"] {
            let xml = read_entry(&bytes, part).unwrap();
            assert!(xml.chars().all(is_xml_char), "forbidden character in {part}");

            let mut reader = quick_xml::Reader::from_str(&xml);
            let mut texts = Vec::new();
            loop {
                match reader.read_event() {
                    Ok(quick_xml::events::Event::Text(t)) => {
                        texts.push(t.unescape().unwrap().into_owned())
                    }
                    Ok(quick_xml::events::Event::Eof) => break,
                    Ok(_) => {}
                    Err(e) => panic!("{part} does not parse: {e}"),
                }
            }
            let joined = texts.concat();
            if part == "word/document.xml" {
                assert!(joined.contains("page1page2 "));
                assert!(joined.contains("Git, Tab\there"));
            } else {
                assert!(joined.contains("Lead Dev"));
            }
        }
    }

    #[test]
    fn test_text_width_saturates_on_huge_margins() {
        let margins = Margins {
            top: 0,
            right: 10,
            bottom: 0,
            left: u32::MAX,
        };
        assert_eq!(text_width(&margins), 0);
    }
}
