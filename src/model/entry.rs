//! Section entries
//!
//! A closed sum type over the eight entry kinds, internally tagged on
//! `type` so persisted JSON matches the original wire shape. Each variant
//! carries only its relevant fields plus its own unique id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::cv::SectionType;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionEntry {
    Summary(SummaryEntry),
    Experience(ExperienceEntry),
    Education(EducationEntry),
    Skills(SkillsEntry),
    Project(ProjectEntry),
    Certification(CertificationEntry),
    Language(LanguageEntry),
    Award(AwardEntry),
}

impl SectionEntry {
    pub fn id(&self) -> &str {
        match self {
            SectionEntry::Summary(e) => &e.id,
            SectionEntry::Experience(e) => &e.id,
            SectionEntry::Education(e) => &e.id,
            SectionEntry::Skills(e) => &e.id,
            SectionEntry::Project(e) => &e.id,
            SectionEntry::Certification(e) => &e.id,
            SectionEntry::Language(e) => &e.id,
            SectionEntry::Award(e) => &e.id,
        }
    }

    /// The section type this entry belongs to. `add_entry` rejects entries
    /// whose kind does not match the owning section.
    pub fn section_type(&self) -> SectionType {
        match self {
            SectionEntry::Summary(_) => SectionType::Summary,
            SectionEntry::Experience(_) => SectionType::Experience,
            SectionEntry::Education(_) => SectionType::Education,
            SectionEntry::Skills(_) => SectionType::Skills,
            SectionEntry::Project(_) => SectionType::Projects,
            SectionEntry::Certification(_) => SectionType::Certifications,
            SectionEntry::Language(_) => SectionType::Languages,
            SectionEntry::Award(_) => SectionType::Awards,
        }
    }

    /// A deep copy carrying a freshly generated id, for duplication flows
    /// where entries must never be shared between documents.
    pub fn with_new_id(&self) -> SectionEntry {
        let mut copy = self.clone();
        let id = Uuid::new_v4().to_string();
        match &mut copy {
            SectionEntry::Summary(e) => e.id = id,
            SectionEntry::Experience(e) => e.id = id,
            SectionEntry::Education(e) => e.id = id,
            SectionEntry::Skills(e) => e.id = id,
            SectionEntry::Project(e) => e.id = id,
            SectionEntry::Certification(e) => e.id = id,
            SectionEntry::Language(e) => e.id = id,
            SectionEntry::Award(e) => e.id = id,
        }
        copy
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub id: String,
    /// Rich text HTML.
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    /// Rich text HTML.
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsEntry {
    pub id: String,
    pub category: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    /// Rich text HTML.
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEntry {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageEntry {
    pub id: String,
    pub language: String,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Native,
    Fluent,
    Advanced,
    Intermediate,
    Basic,
}

impl Proficiency {
    pub fn label(&self) -> &'static str {
        match self {
            Proficiency::Native => "Native",
            Proficiency::Fluent => "Fluent",
            Proficiency::Advanced => "Advanced",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::Basic => "Basic",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardEntry {
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

// ===== Partial updates =====

/// Partial update for one entry, mirroring the entry sum type. The patch is
/// applied only when its kind matches the target entry's kind; a mismatch is
/// a caller bug and is silently ignored, keeping the entry well-typed.
#[derive(Debug, Clone)]
pub enum EntryPatch {
    Summary {
        content: Option<String>,
    },
    Experience {
        company: Option<String>,
        position: Option<String>,
        location: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        current: Option<bool>,
        description: Option<String>,
    },
    Education {
        institution: Option<String>,
        degree: Option<String>,
        field: Option<String>,
        location: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        current: Option<bool>,
        description: Option<String>,
    },
    Skills {
        category: Option<String>,
        skills: Option<Vec<String>>,
    },
    Project {
        name: Option<String>,
        url: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        description: Option<String>,
    },
    Certification {
        name: Option<String>,
        issuer: Option<String>,
        date: Option<String>,
        url: Option<String>,
    },
    Language {
        language: Option<String>,
        proficiency: Option<Proficiency>,
    },
    Award {
        title: Option<String>,
        issuer: Option<String>,
        date: Option<String>,
        description: Option<String>,
    },
}

impl EntryPatch {
    /// Merges the patch into `entry`. Returns false (entry untouched) when
    /// the patch kind does not match the entry kind.
    pub fn apply(self, entry: &mut SectionEntry) -> bool {
        match (entry, self) {
            (SectionEntry::Summary(e), EntryPatch::Summary { content }) => {
                if let Some(v) = content {
                    e.content = v;
                }
                true
            }
            (
                SectionEntry::Experience(e),
                EntryPatch::Experience {
                    company,
                    position,
                    location,
                    start_date,
                    end_date,
                    current,
                    description,
                },
            ) => {
                if let Some(v) = company {
                    e.company = v;
                }
                if let Some(v) = position {
                    e.position = v;
                }
                if let Some(v) = location {
                    e.location = v;
                }
                if let Some(v) = start_date {
                    e.start_date = v;
                }
                if let Some(v) = end_date {
                    e.end_date = v;
                }
                if let Some(v) = current {
                    e.current = v;
                }
                if let Some(v) = description {
                    e.description = v;
                }
                true
            }
            (
                SectionEntry::Education(e),
                EntryPatch::Education {
                    institution,
                    degree,
                    field,
                    location,
                    start_date,
                    end_date,
                    current,
                    description,
                },
            ) => {
                if let Some(v) = institution {
                    e.institution = v;
                }
                if let Some(v) = degree {
                    e.degree = v;
                }
                if let Some(v) = field {
                    e.field = v;
                }
                if let Some(v) = location {
                    e.location = v;
                }
                if let Some(v) = start_date {
                    e.start_date = v;
                }
                if let Some(v) = end_date {
                    e.end_date = v;
                }
                if let Some(v) = current {
                    e.current = v;
                }
                if let Some(v) = description {
                    e.description = v;
                }
                true
            }
            (SectionEntry::Skills(e), EntryPatch::Skills { category, skills }) => {
                if let Some(v) = category {
                    e.category = v;
                }
                if let Some(v) = skills {
                    e.skills = v;
                }
                true
            }
            (
                SectionEntry::Project(e),
                EntryPatch::Project {
                    name,
                    url,
                    start_date,
                    end_date,
                    description,
                },
            ) => {
                if let Some(v) = name {
                    e.name = v;
                }
                if let Some(v) = url {
                    e.url = v;
                }
                if let Some(v) = start_date {
                    e.start_date = v;
                }
                if let Some(v) = end_date {
                    e.end_date = v;
                }
                if let Some(v) = description {
                    e.description = v;
                }
                true
            }
            (
                SectionEntry::Certification(e),
                EntryPatch::Certification {
                    name,
                    issuer,
                    date,
                    url,
                },
            ) => {
                if let Some(v) = name {
                    e.name = v;
                }
                if let Some(v) = issuer {
                    e.issuer = v;
                }
                if let Some(v) = date {
                    e.date = v;
                }
                if let Some(v) = url {
                    e.url = v;
                }
                true
            }
            (
                SectionEntry::Language(e),
                EntryPatch::Language {
                    language,
                    proficiency,
                },
            ) => {
                if let Some(v) = language {
                    e.language = v;
                }
                if let Some(v) = proficiency {
                    e.proficiency = v;
                }
                true
            }
            (
                SectionEntry::Award(e),
                EntryPatch::Award {
                    title,
                    issuer,
                    date,
                    description,
                },
            ) => {
                if let Some(v) = title {
                    e.title = v;
                }
                if let Some(v) = issuer {
                    e.issuer = v;
                }
                if let Some(v) = date {
                    e.date = v;
                }
                if let Some(v) = description {
                    e.description = v;
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(id: &str) -> SectionEntry {
        SectionEntry::Experience(ExperienceEntry {
            id: id.to_string(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            location: "Remote".to_string(),
            start_date: "2020-01".to_string(),
            end_date: "2022-03".to_string(),
            current: false,
            description: String::new(),
        })
    }

    #[test]
    fn entry_serializes_with_type_tag() {
        let entry = experience("e1");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "experience");
        assert_eq!(json["startDate"], "2020-01");

        let back: SectionEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.section_type(), SectionType::Experience);
        assert_eq!(back.id(), "e1");
    }

    #[test]
    fn patch_kind_mismatch_is_rejected() {
        let mut entry = experience("e1");
        let applied = EntryPatch::Summary {
            content: Some("<p>hi</p>".to_string()),
        }
        .apply(&mut entry);
        assert!(!applied);
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut entry = experience("e1");
        let applied = EntryPatch::Experience {
            company: None,
            position: Some("Staff Engineer".to_string()),
            location: None,
            start_date: None,
            end_date: None,
            current: Some(true),
            description: None,
        }
        .apply(&mut entry);
        assert!(applied);

        match entry {
            SectionEntry::Experience(e) => {
                assert_eq!(e.position, "Staff Engineer");
                assert_eq!(e.company, "Acme");
                assert!(e.current);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn with_new_id_changes_only_the_id() {
        let entry = experience("e1");
        let copy = entry.with_new_id();
        assert_ne!(copy.id(), entry.id());
        assert_eq!(copy.section_type(), entry.section_type());
    }
}
