//! Template catalog
//!
//! Fixed set of named templates seeding new documents. Each template is a
//! complete layout/theme/header preset plus the default section list.
//! `create_cv` copies everything by value so documents never share state.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::model::cv::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    Professional,
    Modern,
    Creative,
}

/// A named document preset.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TemplateCategory,
    pub layout: LayoutSettings,
    pub theme: ThemeSettings,
    pub header: HeaderSettings,
}

fn theme(primary: &str, font: FontFamily) -> ThemeSettings {
    ThemeSettings {
        primary_color: primary.to_string(),
        font_family: font,
        ..ThemeSettings::default()
    }
}

/// The fixed template catalog.
pub fn templates() -> Vec<Template> {
    vec![
        Template {
            id: "classic",
            name: "Classic",
            description: "A timeless, professional design perfect for traditional industries.",
            category: TemplateCategory::Professional,
            layout: LayoutSettings {
                columns: 1,
                split_ratio: 0.35,
                section_spacing: SectionSpacing::Normal,
            },
            theme: theme("#1f2937", FontFamily::Inter),
            header: HeaderSettings::default(),
        },
        Template {
            id: "modern",
            name: "Modern",
            description: "Clean and contemporary with a two-column layout for maximum impact.",
            category: TemplateCategory::Modern,
            layout: LayoutSettings {
                columns: 2,
                split_ratio: 0.35,
                section_spacing: SectionSpacing::Normal,
            },
            theme: theme("#2563eb", FontFamily::Inter),
            header: HeaderSettings {
                layout: HeaderLayout::Modern,
                ..HeaderSettings::default()
            },
        },
        Template {
            id: "minimal",
            name: "Minimal",
            description: "Simple and elegant, letting your content speak for itself.",
            category: TemplateCategory::Modern,
            layout: LayoutSettings {
                columns: 1,
                split_ratio: 0.35,
                section_spacing: SectionSpacing::Relaxed,
            },
            theme: theme("#374151", FontFamily::OpenSans),
            header: HeaderSettings {
                layout: HeaderLayout::Minimal,
                ..HeaderSettings::default()
            },
        },
        Template {
            id: "executive",
            name: "Executive",
            description: "Sophisticated design for senior professionals and executives.",
            category: TemplateCategory::Professional,
            layout: LayoutSettings {
                columns: 2,
                split_ratio: 0.3,
                section_spacing: SectionSpacing::Normal,
            },
            theme: theme("#1e3a5f", FontFamily::Merriweather),
            header: HeaderSettings {
                layout: HeaderLayout::Centered,
                ..HeaderSettings::default()
            },
        },
        Template {
            id: "creative",
            name: "Creative",
            description: "Bold and eye-catching for creative professionals.",
            category: TemplateCategory::Creative,
            layout: LayoutSettings {
                columns: 2,
                split_ratio: 0.4,
                section_spacing: SectionSpacing::Normal,
            },
            theme: theme("#7c3aed", FontFamily::Lato),
            header: HeaderSettings {
                layout: HeaderLayout::Modern,
                ..HeaderSettings::default()
            },
        },
        Template {
            id: "tech",
            name: "Tech",
            description: "Modern design tailored for tech industry professionals.",
            category: TemplateCategory::Modern,
            layout: LayoutSettings {
                columns: 2,
                split_ratio: 0.35,
                section_spacing: SectionSpacing::Compact,
            },
            theme: theme("#059669", FontFamily::Roboto),
            header: HeaderSettings::default(),
        },
    ]
}

pub fn template_by_id(id: &str) -> Option<Template> {
    templates().into_iter().find(|t| t.id == id)
}

/// Default section list: (type, title, enabled, order). In two-column
/// templates the side sections move to the left column so a fresh document
/// renders a visible split.
const DEFAULT_SECTIONS: [(SectionType, &str, bool); 8] = [
    (SectionType::Summary, "Professional Summary", true),
    (SectionType::Experience, "Work Experience", true),
    (SectionType::Education, "Education", true),
    (SectionType::Skills, "Skills", true),
    (SectionType::Projects, "Projects", false),
    (SectionType::Certifications, "Certifications", false),
    (SectionType::Languages, "Languages", false),
    (SectionType::Awards, "Awards & Achievements", false),
];

fn default_column(section_type: SectionType, columns: u8) -> SectionColumn {
    if columns != 2 {
        return SectionColumn::Full;
    }
    match section_type {
        SectionType::Skills
        | SectionType::Languages
        | SectionType::Certifications
        | SectionType::Awards => SectionColumn::Left,
        _ => SectionColumn::Right,
    }
}

/// Builds a fresh document from a template.
///
/// Every section receives a newly generated id and an empty entry list;
/// `created_at == updated_at == now`. An unknown template id is an error —
/// callers should validate against the catalog first.
pub fn create_cv(name: &str, template_id: &str) -> Result<Cv> {
    let template = template_by_id(template_id)
        .ok_or_else(|| AppError::TemplateNotFound(template_id.to_string()))?;

    let now = Utc::now();
    let sections = DEFAULT_SECTIONS
        .iter()
        .enumerate()
        .map(|(order, (section_type, title, enabled))| Section {
            id: Uuid::new_v4().to_string(),
            section_type: *section_type,
            title: (*title).to_string(),
            enabled: *enabled,
            column: default_column(*section_type, template.layout.columns),
            order: order as u32,
            entries: Vec::new(),
        })
        .collect();

    Ok(Cv {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        template_id: template.id.to_string(),
        created_at: now,
        updated_at: now,
        personal_info: PersonalInfo::default(),
        sections,
        layout: template.layout,
        theme: template.theme,
        header: template.header,
    })
}
