//! CV schema validation.
//!
//! Walks an untyped JSON value once, building the typed [`CvDocument`] while
//! collecting every shape violation with its dot-joined path. Nothing is
//! returned unless the whole tree is valid; on success sections are put in
//! canonical order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cv::schema::{
    Bullet, Competence, ContentItem, CvDocument, CvHeader, Diplome, Experience, ExperienceItem,
    Section, SectionId, SectionNode, SubSection, TextBlock,
};

const MAX_BULLET_LEVEL: u64 = 2;

const NODE_TYPES: &str = "bullet, text, competence, diplome, experience, subsection";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

/// Wire form of a validation outcome: `{valid: true, data}` or `{valid: false, errors}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CvDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
}

impl From<Result<CvDocument, Vec<ValidationIssue>>> for ValidationReport {
    fn from(result: Result<CvDocument, Vec<ValidationIssue>>) -> Self {
        match result {
            Ok(data) => ValidationReport {
                valid: true,
                data: Some(data),
                errors: vec![],
            },
            Err(errors) => ValidationReport {
                valid: false,
                data: None,
                errors,
            },
        }
    }
}

/// Validates `input` against the CV schema.
pub fn validate(input: &Value) -> Result<CvDocument, Vec<ValidationIssue>> {
    let mut walker = Walker::default();
    let document = walker.document(input);

    match document {
        Some(mut doc) if walker.issues.is_empty() => {
            canonical_order(&mut doc.sections);
            Ok(doc)
        }
        _ => Err(walker.issues),
    }
}

/// Stable reorder into profil, competences, formations, certifications, experiences.
pub fn canonical_order(sections: &mut [Section]) {
    sections.sort_by_key(|s| s.id.rank());
}

// ────────────────────────────────────────────────────────────────────────────
// Tree walker
// ────────────────────────────────────────────────────────────────────────────

fn join(path: &str, key: impl std::fmt::Display) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Integral value of `n`, accepting floats with no fractional part (`1.0`).
fn whole_number(n: &serde_json::Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
            .map(|f| f as u64)
    })
}

#[derive(Default)]
struct Walker {
    issues: Vec<ValidationIssue>,
}

impl Walker {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.fail(path, format!("Expected object, received {}", json_kind(other)));
                None
            }
        }
    }

    fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Vec<Value>> {
        let field_path = join(path, key);
        match obj.get(key) {
            Some(Value::Array(items)) => Some(items),
            None | Some(Value::Null) => {
                self.fail(&field_path, "Required");
                None
            }
            Some(other) => {
                self.fail(
                    &field_path,
                    format!("Expected array, received {}", json_kind(other)),
                );
                None
            }
        }
    }

    fn string(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
        let field_path = join(path, key);
        match obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            None | Some(Value::Null) => {
                self.fail(&field_path, "Required");
                None
            }
            Some(other) => {
                self.fail(
                    &field_path,
                    format!("Expected string, received {}", json_kind(other)),
                );
                None
            }
        }
    }

    fn non_empty_string(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<String> {
        let value = self.string(obj, key, path)?;
        if value.trim().is_empty() {
            self.fail(&join(path, key), "Must not be empty");
            return None;
        }
        Some(value)
    }

    /// Absent or null is `Ok(None)`; the outer `Option` is `None` on a type error.
    fn optional_string(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<Option<String>> {
        match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(other) => {
                self.fail(
                    &join(path, key),
                    format!("Expected string, received {}", json_kind(other)),
                );
                None
            }
        }
    }

    fn bool_or(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        default: bool,
        path: &str,
    ) -> Option<bool> {
        match obj.get(key) {
            None | Some(Value::Null) => Some(default),
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                self.fail(
                    &join(path, key),
                    format!("Expected boolean, received {}", json_kind(other)),
                );
                None
            }
        }
    }

    fn level(&mut self, obj: &Map<String, Value>, path: &str) -> Option<u8> {
        let field_path = join(path, "level");
        match obj.get("level") {
            None | Some(Value::Null) => Some(0),
            Some(Value::Number(n)) => match whole_number(n) {
                Some(level) if level <= MAX_BULLET_LEVEL => Some(level as u8),
                _ => {
                    self.fail(
                        &field_path,
                        format!("Level must be an integer between 0 and {MAX_BULLET_LEVEL}, received {n}"),
                    );
                    None
                }
            },
            Some(other) => {
                self.fail(
                    &field_path,
                    format!("Expected number, received {}", json_kind(other)),
                );
                None
            }
        }
    }

    /// Reads the `type` discriminator of a content node.
    fn discriminator<'v>(&mut self, obj: &'v Map<String, Value>, path: &str) -> Option<&'v str> {
        let field_path = join(path, "type");
        match obj.get("type") {
            Some(Value::String(s)) => Some(s.as_str()),
            None | Some(Value::Null) => {
                self.fail(&field_path, format!("Missing discriminator; expected one of {NODE_TYPES}"));
                None
            }
            Some(other) => {
                self.fail(
                    &field_path,
                    format!("Expected string, received {}", json_kind(other)),
                );
                None
            }
        }
    }

    // ── Document structure ────────────────────────────────────────────────

    fn document(&mut self, value: &Value) -> Option<CvDocument> {
        let obj = self.object(value, "")?;

        let header = match obj.get("header") {
            Some(h) => self.header(h, "header"),
            None => {
                self.fail("header", "Required");
                None
            }
        };

        let sections = self.array(obj, "sections", "").and_then(|items| {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| self.section(item, &join("sections", i)))
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Option<Vec<_>>>()
        });

        Some(CvDocument {
            header: header?,
            sections: sections?,
        })
    }

    fn header(&mut self, value: &Value, path: &str) -> Option<CvHeader> {
        let obj = self.object(value, path)?;
        let titre = self.non_empty_string(obj, "titre", path);
        let experience = self.non_empty_string(obj, "experience", path);
        Some(CvHeader {
            titre: titre?,
            experience: experience?,
        })
    }

    fn section(&mut self, value: &Value, path: &str) -> Option<Section> {
        let obj = self.object(value, path)?;

        let kind_ok = match obj.get("type") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) if s == "section" => true,
            Some(other) => {
                self.fail(
                    &join(path, "type"),
                    format!("Expected \"section\", received {other}"),
                );
                false
            }
        };

        let id = match obj.get("id") {
            Some(Value::String(raw)) => match SectionId::parse(raw) {
                Some(id) => Some(id),
                None => {
                    self.fail(
                        &join(path, "id"),
                        format!(
                            "Unknown section id '{raw}'; expected one of profil, competences, formations, certifications, experiences"
                        ),
                    );
                    None
                }
            },
            None | Some(Value::Null) => {
                self.fail(&join(path, "id"), "Required");
                None
            }
            Some(other) => {
                self.fail(
                    &join(path, "id"),
                    format!("Expected string, received {}", json_kind(other)),
                );
                None
            }
        };

        let title = self.string(obj, "title", path);
        let content = self.array(obj, "content", path).and_then(|items| {
            let content_path = join(path, "content");
            items
                .iter()
                .enumerate()
                .map(|(i, item)| self.section_node(item, &join(&content_path, i)))
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Option<Vec<_>>>()
        });

        if !kind_ok {
            return None;
        }
        Some(Section {
            id: id?,
            title: title?,
            content: content?,
        })
    }

    fn section_node(&mut self, value: &Value, path: &str) -> Option<SectionNode> {
        let obj = self.object(value, path)?;
        match self.discriminator(obj, path)? {
            "subsection" => self.subsection(obj, path).map(SectionNode::SubSection),
            other => self.content_item(obj, other, path).map(|item| match item {
                ContentItem::Bullet(b) => SectionNode::Bullet(b),
                ContentItem::Text(t) => SectionNode::Text(t),
                ContentItem::Competence(c) => SectionNode::Competence(c),
                ContentItem::Diplome(d) => SectionNode::Diplome(d),
                ContentItem::Experience(e) => SectionNode::Experience(e),
            }),
        }
    }

    fn subsection(&mut self, obj: &Map<String, Value>, path: &str) -> Option<SubSection> {
        let title = self.string(obj, "title", path);
        let content = self.array(obj, "content", path).and_then(|items| {
            let content_path = join(path, "content");
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = join(&content_path, i);
                    let item_obj = self.object(item, &item_path)?;
                    match self.discriminator(item_obj, &item_path)? {
                        "subsection" => {
                            self.fail(
                                &join(&item_path, "type"),
                                "Subsections cannot be nested inside a subsection",
                            );
                            None
                        }
                        kind => self.content_item(item_obj, kind, &item_path),
                    }
                })
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Option<Vec<_>>>()
        });
        Some(SubSection {
            title: title?,
            content: content?,
        })
    }

    fn content_item(
        &mut self,
        obj: &Map<String, Value>,
        kind: &str,
        path: &str,
    ) -> Option<ContentItem> {
        match kind {
            "bullet" => self.bullet(obj, path).map(ContentItem::Bullet),
            "text" => self.text_block(obj, path).map(ContentItem::Text),
            "competence" => self.competence(obj, path).map(ContentItem::Competence),
            "diplome" => self.diplome(obj, path).map(ContentItem::Diplome),
            "experience" => self.experience(obj, path).map(ContentItem::Experience),
            unknown => {
                self.fail(
                    &join(path, "type"),
                    format!("Unknown content type '{unknown}'; expected one of {NODE_TYPES}"),
                );
                None
            }
        }
    }

    // ── Leaf nodes ────────────────────────────────────────────────────────

    fn bullet(&mut self, obj: &Map<String, Value>, path: &str) -> Option<Bullet> {
        let text = self.string(obj, "text", path);
        let level = self.level(obj, path);
        Some(Bullet {
            text: text?,
            level: level?,
        })
    }

    fn text_block(&mut self, obj: &Map<String, Value>, path: &str) -> Option<TextBlock> {
        let text = self.string(obj, "text", path);
        let bold = self.bool_or(obj, "bold", false, path);
        Some(TextBlock {
            text: text?,
            bold: bold?,
        })
    }

    fn competence(&mut self, obj: &Map<String, Value>, path: &str) -> Option<Competence> {
        let categorie = self.string(obj, "categorie", path);
        let valeurs = self.string(obj, "valeurs", path);
        Some(Competence {
            categorie: categorie?,
            valeurs: valeurs?,
        })
    }

    fn diplome(&mut self, obj: &Map<String, Value>, path: &str) -> Option<Diplome> {
        let date = self.string(obj, "date", path);
        let titre = self.string(obj, "titre", path);
        let etablissement = self.string(obj, "etablissement", path);
        Some(Diplome {
            date: date?,
            titre: titre?,
            etablissement: etablissement?,
        })
    }

    fn experience(&mut self, obj: &Map<String, Value>, path: &str) -> Option<Experience> {
        let client = self.string(obj, "client", path);
        let periode = self.string(obj, "periode", path);
        let titre = self.string(obj, "titre", path);
        let description = self.optional_string(obj, "description", path);
        let environnement = self.optional_string(obj, "environnement", path);

        // Experience content may be omitted entirely.
        let content = match obj.get("content") {
            None | Some(Value::Null) => Some(vec![]),
            Some(_) => self.array(obj, "content", path).and_then(|items| {
                let content_path = join(path, "content");
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.experience_item(item, &join(&content_path, i)))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
            }),
        };

        Some(Experience {
            client: client?,
            periode: periode?,
            titre: titre?,
            description: description?,
            content: content?,
            environnement: environnement?,
        })
    }

    fn experience_item(&mut self, value: &Value, path: &str) -> Option<ExperienceItem> {
        let obj = self.object(value, path)?;
        match self.discriminator(obj, path)? {
            "bullet" => self.bullet(obj, path).map(ExperienceItem::Bullet),
            "text" => self.text_block(obj, path).map(ExperienceItem::Text),
            "competence" => self.competence(obj, path).map(ExperienceItem::Competence),
            kind @ ("diplome" | "experience" | "subsection") => {
                self.fail(
                    &join(path, "type"),
                    format!("Content type '{kind}' is not allowed inside an experience"),
                );
                None
            }
            unknown => {
                self.fail(
                    &join(path, "type"),
                    format!("Unknown content type '{unknown}'; expected one of bullet, text, competence"),
                );
                None
            }
        }
    }
}
