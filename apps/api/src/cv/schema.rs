//! Canonical CV document shape.
//!
//! Wire names follow the upstream CV-generation service (French field names,
//! `type`-tagged content nodes). Values of these types only come out of
//! [`crate::cv::validation::validate`]; nothing else constructs them from
//! untrusted input.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Document root
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvDocument {
    pub header: CvHeader,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvHeader {
    /// Job title shown at the top of the CV.
    pub titre: String,
    /// Experience summary, e.g. "5 ans d'expérience".
    pub experience: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// The five recognised section kinds, declared in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    #[serde(rename = "profil", alias = "profile")]
    Profile,
    #[serde(rename = "competences", alias = "skills")]
    Skills,
    #[serde(rename = "formations", alias = "education")]
    Education,
    Certifications,
    Experiences,
}

impl SectionId {
    pub const CANONICAL_ORDER: [SectionId; 5] = [
        SectionId::Profile,
        SectionId::Skills,
        SectionId::Education,
        SectionId::Certifications,
        SectionId::Experiences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Profile => "profil",
            SectionId::Skills => "competences",
            SectionId::Education => "formations",
            SectionId::Certifications => "certifications",
            SectionId::Experiences => "experiences",
        }
    }

    /// Parses a wire id, accepting the English aliases.
    pub fn parse(raw: &str) -> Option<SectionId> {
        match raw {
            "profil" | "profile" => Some(SectionId::Profile),
            "competences" | "skills" => Some(SectionId::Skills),
            "formations" | "education" => Some(SectionId::Education),
            "certifications" => Some(SectionId::Certifications),
            "experiences" => Some(SectionId::Experiences),
            _ => None,
        }
    }

    /// Position of this id in the canonical section order.
    pub fn rank(&self) -> usize {
        Self::CANONICAL_ORDER
            .iter()
            .position(|id| id == self)
            .unwrap_or(Self::CANONICAL_ORDER.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "section")]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub content: Vec<SectionNode>,
}

// ────────────────────────────────────────────────────────────────────────────
// Content nodes
// ────────────────────────────────────────────────────────────────────────────

/// A direct child of a section: any content item, or a one-level subsection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionNode {
    Bullet(Bullet),
    Text(TextBlock),
    Competence(Competence),
    Diplome(Diplome),
    Experience(Experience),
    #[serde(rename = "subsection")]
    SubSection(SubSection),
}

/// A content node that is not a subsection. Children of a subsection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Bullet(Bullet),
    Text(TextBlock),
    Competence(Competence),
    Diplome(Diplome),
    Experience(Experience),
}

/// Content allowed inside an experience block (no nesting of experiences or diplomas).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExperienceItem {
    Bullet(Bullet),
    Text(TextBlock),
    Competence(Competence),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub text: String,
    /// Indentation depth, 0..=2.
    #[serde(default)]
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
}

/// Rendered as "categorie : valeurs".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competence {
    pub categorie: String,
    pub valeurs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diplome {
    pub date: String,
    pub titre: String,
    pub etablissement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub client: String,
    pub periode: String,
    pub titre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Vec<ExperienceItem>,
    /// Technical environment / stack line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environnement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSection {
    pub title: String,
    pub content: Vec<ContentItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_id_rank_follows_canonical_order() {
        assert!(SectionId::Profile.rank() < SectionId::Skills.rank());
        assert!(SectionId::Certifications.rank() < SectionId::Experiences.rank());
        assert_eq!(SectionId::Experiences.rank(), 4);
    }

    #[test]
    fn test_section_id_parse_accepts_aliases() {
        assert_eq!(SectionId::parse("skills"), Some(SectionId::Skills));
        assert_eq!(SectionId::parse("competences"), Some(SectionId::Skills));
        assert_eq!(SectionId::parse("hobbies"), None);
    }

    #[test]
    fn test_section_node_serializes_with_type_tag() {
        let node = SectionNode::SubSection(SubSection {
            title: "Langages".to_string(),
            content: vec![ContentItem::Bullet(Bullet {
                text: "Rust".to_string(),
                level: 1,
            })],
        });
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "subsection");
        assert_eq!(value["content"][0]["type"], "bullet");
        assert_eq!(value["content"][0]["level"], 1);
    }

    #[test]
    fn test_section_serializes_id_in_wire_form() {
        let section = Section {
            id: SectionId::Education,
            title: "Formations".to_string(),
            content: vec![],
        };
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["type"], "section");
        assert_eq!(value["id"], "formations");
    }
}
