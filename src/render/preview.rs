//! Preview painter
//!
//! `render` maps a document to a scalable on-screen tree: an A4-proportioned
//! surface at 794 px base width with relative utility classes for the theme
//! scales. Rich text passes through as raw HTML; the document owner authored
//! it. All layout decisions come from the shared plan.

use serde::Serialize;

use crate::config;
use crate::model::{
    Cv, FontScale, HeadingStyle, LineHeightScale, PhotoShape, PhotoSize, SectionEntry,
    SectionSpacing, SectionType,
};
use crate::render::plan::{self, AccentContent, BodyPlan, ContactItem, HeaderPlan, SectionPlan};
use crate::render::text::format_date;

/// Scalable on-screen rendering of one document.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewDocument {
    pub base_width_px: f32,
    pub font_family: &'static str,
    pub font_size_class: &'static str,
    pub line_height_class: &'static str,
    pub spacing_class: &'static str,
    pub heading_class: &'static str,
    pub primary_color: String,
    pub accent_color: String,
    pub separator_color: String,
    pub header: PreviewHeader,
    pub accent: Option<PreviewAccent>,
    pub body: PreviewBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewHeader {
    pub layout: crate::model::HeaderLayout,
    pub contact_layout: crate::model::ContactLayout,
    pub compact: bool,
    pub full_name: String,
    pub title: Option<String>,
    pub photo: Option<PreviewPhoto>,
    pub contacts: Vec<ContactItem>,
    pub summary_html: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewPhoto {
    pub data: String,
    pub size_class: &'static str,
    pub shape_class: &'static str,
    pub position: crate::model::PhotoPosition,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewAccent {
    pub position: crate::model::AccentBoxPosition,
    pub width_pct: u8,
    pub background_color: String,
    pub text_color: String,
    pub content: AccentContent,
}

#[derive(Debug, Clone, Serialize)]
pub enum PreviewBody {
    Single(Vec<PreviewSection>),
    TwoColumn {
        left_width_pct: f32,
        left: Vec<PreviewSection>,
        right: Vec<PreviewSection>,
    },
}

impl PreviewBody {
    pub fn sections(&self) -> Vec<&PreviewSection> {
        match self {
            PreviewBody::Single(sections) => sections.iter().collect(),
            PreviewBody::TwoColumn { left, right, .. } => {
                left.iter().chain(right.iter()).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewSection {
    pub id: String,
    pub section_type: SectionType,
    pub title: String,
    pub blocks: Vec<PreviewBlock>,
}

/// One visual block inside a section, in reading order.
#[derive(Debug, Clone, Serialize)]
pub enum PreviewBlock {
    /// Raw trusted rich text.
    Html(String),
    Text(String),
    EntryHeader {
        title: String,
        subtitle: Option<String>,
        date: Option<String>,
    },
    SkillsGroup {
        category: String,
        skills: Vec<String>,
    },
    LanguageRow(Vec<String>),
}

pub fn render(cv: &Cv) -> PreviewDocument {
    let plan = plan::plan(cv);
    let theme = &cv.theme;

    PreviewDocument {
        base_width_px: config::PREVIEW_BASE_WIDTH_PX,
        font_family: theme.font_family.css_name(),
        font_size_class: font_size_class(theme.font_size),
        line_height_class: line_height_class(theme.line_height),
        spacing_class: spacing_class(cv.layout.section_spacing),
        heading_class: heading_class(theme.heading_style),
        primary_color: theme.primary_color.clone(),
        accent_color: theme.accent_color.clone(),
        separator_color: theme.separator_color.clone(),
        header: header(plan.header),
        accent: plan.accent.map(|a| PreviewAccent {
            position: a.position,
            width_pct: a.width_pct,
            background_color: a.background_color,
            text_color: a.text_color,
            content: a.content,
        }),
        body: match plan.body {
            BodyPlan::Single(sections) => {
                PreviewBody::Single(sections.iter().map(section).collect())
            }
            BodyPlan::TwoColumn {
                split_ratio,
                left,
                right,
            } => PreviewBody::TwoColumn {
                left_width_pct: split_ratio * 100.0,
                left: left.iter().map(section).collect(),
                right: right.iter().map(section).collect(),
            },
        },
    }
}

fn font_size_class(scale: FontScale) -> &'static str {
    match scale {
        FontScale::Small => "text-xs",
        FontScale::Medium => "text-sm",
        FontScale::Large => "text-base",
    }
}

fn line_height_class(scale: LineHeightScale) -> &'static str {
    match scale {
        LineHeightScale::Tight => "leading-tight",
        LineHeightScale::Normal => "leading-normal",
        LineHeightScale::Relaxed => "leading-relaxed",
    }
}

fn spacing_class(spacing: SectionSpacing) -> &'static str {
    match spacing {
        SectionSpacing::Compact => "space-y-2",
        SectionSpacing::Normal => "space-y-4",
        SectionSpacing::Relaxed => "space-y-6",
    }
}

fn heading_class(style: HeadingStyle) -> &'static str {
    match style {
        HeadingStyle::Uppercase => "uppercase tracking-wide text-sm",
        HeadingStyle::Normal => "",
    }
}

fn photo_size_class(size: PhotoSize) -> &'static str {
    match size {
        PhotoSize::Small => "w-16 h-16",
        PhotoSize::Medium => "w-20 h-20",
        PhotoSize::Large => "w-24 h-24",
    }
}

fn photo_shape_class(shape: PhotoShape) -> &'static str {
    match shape {
        PhotoShape::Circle => "rounded-full",
        PhotoShape::Square => "rounded-none",
        PhotoShape::Rounded => "rounded-lg",
    }
}

fn header(plan: HeaderPlan) -> PreviewHeader {
    PreviewHeader {
        layout: plan.layout,
        contact_layout: plan.contact_layout,
        compact: plan.compact,
        full_name: plan.full_name,
        title: plan.title,
        photo: plan.photo.map(|p| PreviewPhoto {
            data: p.data,
            size_class: photo_size_class(p.size),
            shape_class: photo_shape_class(p.shape),
            position: p.position,
        }),
        contacts: plan.contacts,
        summary_html: plan.summary_html,
    }
}

fn section(plan: &SectionPlan) -> PreviewSection {
    let mut blocks = Vec::new();
    for entry in &plan.entries {
        entry_blocks(entry, &mut blocks);
    }
    // Language entries collapse into one wrapped row.
    if plan.section_type == SectionType::Languages {
        let items: Vec<String> = blocks
            .drain(..)
            .filter_map(|b| match b {
                PreviewBlock::Text(t) => Some(t),
                _ => None,
            })
            .collect();
        if !items.is_empty() {
            blocks.push(PreviewBlock::LanguageRow(items));
        }
    }

    PreviewSection {
        id: plan.id.clone(),
        section_type: plan.section_type,
        title: plan.title.clone(),
        blocks,
    }
}

fn entry_blocks(entry: &SectionEntry, blocks: &mut Vec<PreviewBlock>) {
    match entry {
        SectionEntry::Summary(e) => {
            if !e.content.is_empty() {
                blocks.push(PreviewBlock::Html(e.content.clone()));
            }
        }
        SectionEntry::Experience(e) => {
            let subtitle = if e.location.is_empty() {
                e.company.clone()
            } else {
                format!("{} - {}", e.company, e.location)
            };
            blocks.push(PreviewBlock::EntryHeader {
                title: e.position.clone(),
                subtitle: Some(subtitle),
                date: Some(date_range(&e.start_date, &e.end_date, e.current)),
            });
            if !e.description.is_empty() {
                blocks.push(PreviewBlock::Html(e.description.clone()));
            }
        }
        SectionEntry::Education(e) => {
            let title = if e.field.is_empty() {
                e.degree.clone()
            } else {
                format!("{} in {}", e.degree, e.field)
            };
            let subtitle = if e.location.is_empty() {
                e.institution.clone()
            } else {
                format!("{} - {}", e.institution, e.location)
            };
            blocks.push(PreviewBlock::EntryHeader {
                title,
                subtitle: Some(subtitle),
                date: Some(date_range(&e.start_date, &e.end_date, e.current)),
            });
            if !e.description.is_empty() {
                blocks.push(PreviewBlock::Text(e.description.clone()));
            }
        }
        SectionEntry::Skills(e) => {
            blocks.push(PreviewBlock::SkillsGroup {
                category: e.category.clone(),
                skills: e.skills.clone(),
            });
        }
        SectionEntry::Project(e) => {
            let date = if e.start_date.is_empty() && e.end_date.is_empty() {
                None
            } else if e.end_date.is_empty() {
                Some(format_date(&e.start_date))
            } else {
                Some(format!(
                    "{} - {}",
                    format_date(&e.start_date),
                    format_date(&e.end_date)
                ))
            };
            blocks.push(PreviewBlock::EntryHeader {
                title: e.name.clone(),
                subtitle: (!e.url.is_empty()).then(|| e.url.clone()),
                date,
            });
            if !e.description.is_empty() {
                blocks.push(PreviewBlock::Html(e.description.clone()));
            }
        }
        SectionEntry::Certification(e) => {
            blocks.push(PreviewBlock::EntryHeader {
                title: e.name.clone(),
                subtitle: Some(e.issuer.clone()),
                date: Some(format_date(&e.date)),
            });
        }
        SectionEntry::Language(e) => {
            blocks.push(PreviewBlock::Text(format!(
                "{} - {}",
                e.language,
                e.proficiency.label()
            )));
        }
        SectionEntry::Award(e) => {
            blocks.push(PreviewBlock::EntryHeader {
                title: e.title.clone(),
                subtitle: Some(e.issuer.clone()),
                date: Some(format_date(&e.date)),
            });
            if !e.description.is_empty() {
                blocks.push(PreviewBlock::Text(e.description.clone()));
            }
        }
    }
}

fn date_range(start: &str, end: &str, current: bool) -> String {
    crate::render::text::format_date_range(start, end, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{create_cv, ExperienceEntry, SummaryEntry};

    fn cv_with_content() -> Cv {
        let mut cv = create_cv("Preview", "modern").unwrap();
        cv.personal_info.first_name = "Ada".to_string();
        cv.personal_info.last_name = "Lovelace".to_string();
        cv.personal_info.email = "ada@example.com".to_string();

        let summary_id = cv
            .sections
            .iter()
            .find(|s| s.section_type == SectionType::Summary)
            .unwrap()
            .id
            .clone();
        cv.section_mut(&summary_id)
            .unwrap()
            .entries
            .push(SectionEntry::Summary(SummaryEntry {
                id: "s1".to_string(),
                content: "<p>Analyst &amp; programmer.</p>".to_string(),
            }));

        let exp_id = cv
            .sections
            .iter()
            .find(|s| s.section_type == SectionType::Experience)
            .unwrap()
            .id
            .clone();
        cv.section_mut(&exp_id)
            .unwrap()
            .entries
            .push(SectionEntry::Experience(ExperienceEntry {
                id: "e1".to_string(),
                company: "Analytical Engines".to_string(),
                position: "Programmer".to_string(),
                location: "London".to_string(),
                start_date: "1842-01".to_string(),
                end_date: String::new(),
                current: true,
                description: "<ul><li>Wrote the first program</li></ul>".to_string(),
            }));
        cv
    }

    #[test]
    fn rich_text_passes_through_unmodified() {
        let doc = render(&cv_with_content());
        let sections = doc.body.sections();
        let summary = sections
            .iter()
            .find(|s| s.section_type == SectionType::Summary)
            .unwrap();
        match &summary.blocks[0] {
            PreviewBlock::Html(html) => {
                assert_eq!(html, "<p>Analyst &amp; programmer.</p>");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn theme_scales_map_to_relative_classes() {
        let mut cv = cv_with_content();
        cv.theme.font_size = FontScale::Large;
        cv.theme.line_height = LineHeightScale::Tight;
        cv.layout.section_spacing = SectionSpacing::Relaxed;

        let doc = render(&cv);
        assert_eq!(doc.base_width_px, 794.0);
        assert_eq!(doc.font_size_class, "text-base");
        assert_eq!(doc.line_height_class, "leading-tight");
        assert_eq!(doc.spacing_class, "space-y-6");
    }

    #[test]
    fn two_column_body_uses_split_ratio_percent() {
        let doc = render(&cv_with_content());
        match doc.body {
            PreviewBody::TwoColumn { left_width_pct, .. } => {
                assert!((left_width_pct - 35.0).abs() < 0.01);
            }
            _ => unreachable!("modern template is two-column"),
        }
    }

    #[test]
    fn experience_dates_render_as_month_year_range() {
        let doc = render(&cv_with_content());
        let sections = doc.body.sections();
        let exp = sections
            .iter()
            .find(|s| s.section_type == SectionType::Experience)
            .unwrap();
        match &exp.blocks[0] {
            PreviewBlock::EntryHeader { date, subtitle, .. } => {
                assert_eq!(date.as_deref(), Some("Jan 1842 - Present"));
                assert_eq!(subtitle.as_deref(), Some("Analytical Engines - London"));
            }
            _ => unreachable!(),
        }
    }
}
