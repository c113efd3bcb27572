//! CV document schema
//!
//! Rust structs for the CV root aggregate and its settings blocks.
//! Field names serialize in camelCase to stay compatible with documents
//! persisted by earlier releases. Fields the schema gained later carry
//! serde defaults so old records decode cleanly (see `model::migrate`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::entry::SectionEntry;

/// The complete resume document edited in one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cv {
    pub id: String,
    pub name: String,
    pub template_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub personal_info: PersonalInfo,
    pub sections: Vec<Section>,
    pub layout: LayoutSettings,
    pub theme: ThemeSettings,
    #[serde(default)]
    pub header: HeaderSettings,
}

impl Cv {
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    /// The listing projection maintained in the metadata index.
    pub fn metadata(&self) -> CvMetadata {
        CvMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            template_id: self.template_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing projection of a CV, kept in a separate index so the dashboard
/// never loads full documents.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CvMetadata {
    pub id: String,
    pub name: String,
    pub template_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable full snapshot of a document, kept for short-term history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: String,
    pub cv_id: String,
    pub timestamp: DateTime<Utc>,
    pub data: Cv,
}

// ===== Personal info =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    /// Base64-encoded raster image produced by the crop widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub photo_shape: PhotoShape,
    pub photo_size: PhotoSize,
    pub photo_position: PhotoPosition,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            title: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            website: String::new(),
            linkedin: String::new(),
            photo: None,
            photo_shape: PhotoShape::Circle,
            photo_size: PhotoSize::Medium,
            photo_position: PhotoPosition::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoShape {
    Circle,
    Square,
    Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoPosition {
    Left,
    Right,
    /// Photo stored but not rendered.
    None,
}

// ===== Sections =====

/// A named, orderable, enable-able block of same-typed entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub enabled: bool,
    pub column: SectionColumn,
    pub order: u32,
    pub entries: Vec<SectionEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Awards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionColumn {
    Left,
    Right,
    Full,
}

// ===== Layout =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    /// 1 or 2.
    pub columns: u8,
    /// Left-column width fraction, meaningful only when `columns == 2`.
    pub split_ratio: f32,
    pub section_spacing: SectionSpacing,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            columns: 1,
            split_ratio: 0.35,
            section_spacing: SectionSpacing::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionSpacing {
    Compact,
    Normal,
    Relaxed,
}

// ===== Theme =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub primary_color: String,
    pub accent_color: String,
    #[serde(default = "default_separator_color")]
    pub separator_color: String,
    pub font_family: FontFamily,
    pub font_size: FontScale,
    pub line_height: LineHeightScale,
    pub heading_style: HeadingStyle,
    #[serde(default)]
    pub accent_box: AccentBoxSettings,
}

pub(crate) fn default_separator_color() -> String {
    "#e5e7eb".to_string()
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#2563eb".to_string(),
            accent_color: "#3b82f6".to_string(),
            separator_color: default_separator_color(),
            font_family: FontFamily::Inter,
            font_size: FontScale::Medium,
            line_height: LineHeightScale::Normal,
            heading_style: HeadingStyle::Normal,
            accent_box: AccentBoxSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Inter,
    Roboto,
    #[serde(rename = "Open Sans")]
    OpenSans,
    Lato,
    Merriweather,
}

impl FontFamily {
    /// CSS-ready family name.
    pub fn css_name(&self) -> &'static str {
        match self {
            FontFamily::Inter => "Inter",
            FontFamily::Roboto => "Roboto",
            FontFamily::OpenSans => "Open Sans",
            FontFamily::Lato => "Lato",
            FontFamily::Merriweather => "Merriweather",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontScale {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineHeightScale {
    Tight,
    Normal,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    Uppercase,
    Normal,
}

// ===== Accent box =====

/// Optionally enabled colored panel carrying contact/skills/custom content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccentBoxSettings {
    pub enabled: bool,
    pub position: AccentBoxPosition,
    pub background_color: String,
    pub text_color: String,
    pub content: AccentBoxContent,
    pub custom_text: String,
    /// Sidebar width as a percentage of the page width.
    pub width: u8,
}

impl Default for AccentBoxSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            position: AccentBoxPosition::LeftSidebar,
            background_color: "#1f2937".to_string(),
            text_color: "#ffffff".to_string(),
            content: AccentBoxContent::Contact,
            custom_text: String::new(),
            width: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccentBoxPosition {
    Top,
    LeftSidebar,
    RightSidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentBoxContent {
    Contact,
    Skills,
    Custom,
}

// ===== Header =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderSettings {
    pub layout: HeaderLayout,
    pub contact_layout: ContactLayout,
    /// Fold the summary section's content into the header block.
    pub show_summary_in_header: bool,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            layout: HeaderLayout::Classic,
            contact_layout: ContactLayout::Inline,
            show_summary_in_header: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLayout {
    Classic,
    Modern,
    Centered,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactLayout {
    Inline,
    Stacked,
    TwoColumn,
}

// ===== Partial updates =====
//
// Mutation operations merge a partial update into the matching sub-object.
// Every field is optional; `None` means "leave unchanged".

#[derive(Debug, Clone, Default)]
pub struct PersonalInfoPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    /// `Some(None)` clears the photo.
    pub photo: Option<Option<String>>,
    pub photo_shape: Option<PhotoShape>,
    pub photo_size: Option<PhotoSize>,
    pub photo_position: Option<PhotoPosition>,
}

impl PersonalInfoPatch {
    pub fn apply(self, info: &mut PersonalInfo) {
        if let Some(v) = self.first_name {
            info.first_name = v;
        }
        if let Some(v) = self.last_name {
            info.last_name = v;
        }
        if let Some(v) = self.title {
            info.title = v;
        }
        if let Some(v) = self.email {
            info.email = v;
        }
        if let Some(v) = self.phone {
            info.phone = v;
        }
        if let Some(v) = self.location {
            info.location = v;
        }
        if let Some(v) = self.website {
            info.website = v;
        }
        if let Some(v) = self.linkedin {
            info.linkedin = v;
        }
        if let Some(v) = self.photo {
            info.photo = v;
        }
        if let Some(v) = self.photo_shape {
            info.photo_shape = v;
        }
        if let Some(v) = self.photo_size {
            info.photo_size = v;
        }
        if let Some(v) = self.photo_position {
            info.photo_position = v;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutPatch {
    pub columns: Option<u8>,
    pub split_ratio: Option<f32>,
    pub section_spacing: Option<SectionSpacing>,
}

impl LayoutPatch {
    pub fn apply(self, layout: &mut LayoutSettings) {
        if let Some(v) = self.columns {
            layout.columns = v.clamp(1, 2);
        }
        if let Some(v) = self.split_ratio {
            layout.split_ratio = v.clamp(crate::config::MIN_SPLIT_RATIO, crate::config::MAX_SPLIT_RATIO);
        }
        if let Some(v) = self.section_spacing {
            layout.section_spacing = v;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThemePatch {
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub separator_color: Option<String>,
    pub font_family: Option<FontFamily>,
    pub font_size: Option<FontScale>,
    pub line_height: Option<LineHeightScale>,
    pub heading_style: Option<HeadingStyle>,
}

impl ThemePatch {
    pub fn apply(self, theme: &mut ThemeSettings) {
        if let Some(v) = self.primary_color {
            theme.primary_color = v;
        }
        if let Some(v) = self.accent_color {
            theme.accent_color = v;
        }
        if let Some(v) = self.separator_color {
            theme.separator_color = v;
        }
        if let Some(v) = self.font_family {
            theme.font_family = v;
        }
        if let Some(v) = self.font_size {
            theme.font_size = v;
        }
        if let Some(v) = self.line_height {
            theme.line_height = v;
        }
        if let Some(v) = self.heading_style {
            theme.heading_style = v;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccentBoxPatch {
    pub enabled: Option<bool>,
    pub position: Option<AccentBoxPosition>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub content: Option<AccentBoxContent>,
    pub custom_text: Option<String>,
    pub width: Option<u8>,
}

impl AccentBoxPatch {
    pub fn apply(self, accent: &mut AccentBoxSettings) {
        if let Some(v) = self.enabled {
            accent.enabled = v;
        }
        if let Some(v) = self.position {
            accent.position = v;
        }
        if let Some(v) = self.background_color {
            accent.background_color = v;
        }
        if let Some(v) = self.text_color {
            accent.text_color = v;
        }
        if let Some(v) = self.content {
            accent.content = v;
        }
        if let Some(v) = self.custom_text {
            accent.custom_text = v;
        }
        if let Some(v) = self.width {
            accent.width = v.clamp(15, 50);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderPatch {
    pub layout: Option<HeaderLayout>,
    pub contact_layout: Option<ContactLayout>,
    pub show_summary_in_header: Option<bool>,
}

impl HeaderPatch {
    pub fn apply(self, header: &mut HeaderSettings) {
        if let Some(v) = self.layout {
            header.layout = v;
        }
        if let Some(v) = self.contact_layout {
            header.contact_layout = v;
        }
        if let Some(v) = self.show_summary_in_header {
            header.show_summary_in_header = v;
        }
    }
}

/// Partial update for a section's own fields. Entries and the section type
/// are never touched through this path.
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub enabled: Option<bool>,
    pub column: Option<SectionColumn>,
    pub order: Option<u32>,
}

impl SectionPatch {
    pub fn apply(self, section: &mut Section) {
        if let Some(v) = self.title {
            section.title = v;
        }
        if let Some(v) = self.enabled {
            section.enabled = v;
        }
        if let Some(v) = self.column {
            section.column = v;
        }
        if let Some(v) = self.order {
            section.order = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_newer_fields_decode_with_defaults() {
        // A record persisted before separatorColor, accentBox and header existed.
        let json = r##"{
            "id": "cv1",
            "name": "Old CV",
            "templateId": "classic",
            "createdAt": "2023-01-01T00:00:00Z",
            "updatedAt": "2023-01-02T00:00:00Z",
            "personalInfo": {"firstName": "Ada"},
            "sections": [],
            "layout": {"columns": 1, "splitRatio": 0.35, "sectionSpacing": "normal"},
            "theme": {
                "primaryColor": "#111111",
                "accentColor": "#222222",
                "fontFamily": "Inter",
                "fontSize": "medium",
                "lineHeight": "normal",
                "headingStyle": "normal"
            }
        }"##;

        let cv: Cv = serde_json::from_str(json).unwrap();
        assert_eq!(cv.theme.separator_color, "#e5e7eb");
        assert!(!cv.theme.accent_box.enabled);
        assert_eq!(cv.header.layout, HeaderLayout::Classic);
        assert_eq!(cv.personal_info.photo_position, PhotoPosition::Left);
        assert_eq!(cv.personal_info.first_name, "Ada");
    }

    #[test]
    fn layout_patch_clamps_split_ratio() {
        let mut layout = LayoutSettings::default();
        LayoutPatch {
            split_ratio: Some(0.9),
            ..Default::default()
        }
        .apply(&mut layout);
        assert_eq!(layout.split_ratio, crate::config::MAX_SPLIT_RATIO);

        LayoutPatch {
            split_ratio: Some(0.1),
            ..Default::default()
        }
        .apply(&mut layout);
        assert_eq!(layout.split_ratio, crate::config::MIN_SPLIT_RATIO);
    }

    #[test]
    fn personal_info_patch_can_clear_photo() {
        let mut info = PersonalInfo {
            photo: Some("data:image/png;base64,xyz".to_string()),
            ..Default::default()
        };
        PersonalInfoPatch {
            photo: Some(None),
            ..Default::default()
        }
        .apply(&mut info);
        assert!(info.photo.is_none());
    }

    #[test]
    fn font_family_roundtrips_with_spaces() {
        let json = serde_json::to_string(&FontFamily::OpenSans).unwrap();
        assert_eq!(json, r#""Open Sans""#);
        let back: FontFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FontFamily::OpenSans);
    }
}
