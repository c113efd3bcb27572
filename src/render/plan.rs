//! Renderer-agnostic layout plan.
//!
//! `plan` resolves every layout decision once (section filtering and order,
//! summary-in-header extraction, the header-layout switch, accent box
//! placement and content, column partitioning) so the preview and export
//! painters consume one description and cannot drift from each other.

use serde::Serialize;

use crate::model::{
    AccentBoxPosition, ContactLayout, Cv, HeaderLayout, PhotoPosition, PhotoShape, PhotoSize,
    Section, SectionColumn, SectionEntry, SectionType,
};

/// Everything both painters need, already decided.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutPlan {
    pub header: HeaderPlan,
    pub accent: Option<AccentPlan>,
    pub body: BodyPlan,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderPlan {
    pub layout: HeaderLayout,
    /// Resolved contact sub-layout; minimal forces inline regardless of the
    /// stored setting.
    pub contact_layout: ContactLayout,
    /// Minimal renders the header compact.
    pub compact: bool,
    pub full_name: String,
    pub title: Option<String>,
    pub photo: Option<PhotoPlan>,
    pub contacts: Vec<ContactItem>,
    /// Summary rich text pulled into the header when `showSummaryInHeader`
    /// is set and an enabled summary entry exists.
    pub summary_html: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoPlan {
    pub data: String,
    pub shape: PhotoShape,
    pub size: PhotoSize,
    pub position: PhotoPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
    Location,
    Website,
    Linkedin,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactItem {
    pub kind: ContactKind,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccentPlan {
    pub position: AccentBoxPosition,
    /// Sidebar width as a percentage of the content width; unused for the
    /// top band.
    pub width_pct: u8,
    pub background_color: String,
    pub text_color: String,
    pub content: AccentContent,
}

#[derive(Debug, Clone, Serialize)]
pub enum AccentContent {
    Contact(Vec<ContactItem>),
    /// All enabled skills-section entries, flattened in section order.
    Skills(Vec<SkillsGroup>),
    Custom(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillsGroup {
    pub category: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub enum BodyPlan {
    Single(Vec<SectionPlan>),
    TwoColumn {
        /// Left column width as a fraction of the content width.
        split_ratio: f32,
        left: Vec<SectionPlan>,
        right: Vec<SectionPlan>,
    },
}

impl BodyPlan {
    /// All planned sections in reading order, for callers that do not care
    /// about column placement.
    pub fn sections(&self) -> Vec<&SectionPlan> {
        match self {
            BodyPlan::Single(sections) => sections.iter().collect(),
            BodyPlan::TwoColumn { left, right, .. } => left.iter().chain(right.iter()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionPlan {
    pub id: String,
    pub section_type: SectionType,
    pub title: String,
    pub entries: Vec<SectionEntry>,
}

/// Resolve the full layout for a document.
pub fn plan(cv: &Cv) -> LayoutPlan {
    let mut sections: Vec<&Section> = cv.sections.iter().filter(|s| s.enabled).collect();
    sections.sort_by_key(|s| s.order);

    // Empty sections render nothing, not an empty heading.
    sections.retain(|s| !s.entries.is_empty());

    let summary_html = if cv.header.show_summary_in_header {
        sections
            .iter()
            .find(|s| s.section_type == SectionType::Summary)
            .and_then(|s| match s.entries.first() {
                Some(SectionEntry::Summary(e)) if !e.content.is_empty() => {
                    Some(e.content.clone())
                }
                _ => None,
            })
    } else {
        None
    };
    if summary_html.is_some() {
        sections.retain(|s| s.section_type != SectionType::Summary);
    }

    let header = header_plan(cv, summary_html);
    let accent = accent_plan(cv, &sections);
    let body = body_plan(cv, &sections);

    LayoutPlan {
        header,
        accent,
        body,
    }
}

fn contact_items(cv: &Cv) -> Vec<ContactItem> {
    let info = &cv.personal_info;
    let fields = [
        (ContactKind::Email, &info.email),
        (ContactKind::Phone, &info.phone),
        (ContactKind::Location, &info.location),
        (ContactKind::Website, &info.website),
        (ContactKind::Linkedin, &info.linkedin),
    ];
    fields
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(kind, value)| ContactItem {
            kind,
            value: value.clone(),
        })
        .collect()
}

fn header_plan(cv: &Cv, summary_html: Option<String>) -> HeaderPlan {
    let info = &cv.personal_info;
    let layout = cv.header.layout;

    let contact_layout = match layout {
        HeaderLayout::Minimal => ContactLayout::Inline,
        _ => cv.header.contact_layout,
    };

    let photo = match (&info.photo, info.photo_position) {
        (Some(data), position) if position != PhotoPosition::None => Some(PhotoPlan {
            data: data.clone(),
            shape: info.photo_shape,
            size: info.photo_size,
            position,
        }),
        _ => None,
    };

    HeaderPlan {
        layout,
        contact_layout,
        compact: layout == HeaderLayout::Minimal,
        full_name: format!("{} {}", info.first_name, info.last_name)
            .trim()
            .to_string(),
        title: (!info.title.is_empty()).then(|| info.title.clone()),
        photo,
        contacts: contact_items(cv),
        summary_html,
    }
}

fn accent_plan(cv: &Cv, sections: &[&Section]) -> Option<AccentPlan> {
    let accent_box = &cv.theme.accent_box;
    if !accent_box.enabled {
        return None;
    }

    let content = match accent_box.content {
        crate::model::AccentBoxContent::Contact => AccentContent::Contact(contact_items(cv)),
        crate::model::AccentBoxContent::Skills => {
            let groups = sections
                .iter()
                .filter(|s| s.section_type == SectionType::Skills)
                .flat_map(|s| s.entries.iter())
                .filter_map(|entry| match entry {
                    SectionEntry::Skills(e) => Some(SkillsGroup {
                        category: e.category.clone(),
                        skills: e.skills.clone(),
                    }),
                    _ => None,
                })
                .collect();
            AccentContent::Skills(groups)
        }
        crate::model::AccentBoxContent::Custom => {
            AccentContent::Custom(accent_box.custom_text.clone())
        }
    };

    Some(AccentPlan {
        position: accent_box.position,
        width_pct: accent_box.width,
        background_color: accent_box.background_color.clone(),
        text_color: accent_box.text_color.clone(),
        content,
    })
}

fn body_plan(cv: &Cv, sections: &[&Section]) -> BodyPlan {
    let to_plan = |s: &&Section| SectionPlan {
        id: s.id.clone(),
        section_type: s.section_type,
        title: s.title.clone(),
        entries: s.entries.clone(),
    };

    if cv.layout.columns == 1 {
        BodyPlan::Single(sections.iter().map(to_plan).collect())
    } else {
        let left = sections
            .iter()
            .filter(|s| s.column == SectionColumn::Left)
            .map(to_plan)
            .collect();
        // Full-width sections land in the right partition in two-column mode.
        let right = sections
            .iter()
            .filter(|s| s.column == SectionColumn::Right || s.column == SectionColumn::Full)
            .map(to_plan)
            .collect();
        BodyPlan::TwoColumn {
            split_ratio: cv.layout.split_ratio,
            left,
            right,
        }
    }
}
