//! Export painter
//!
//! `render` maps a document to fixed A4 pages with absolute point sizes.
//! Rich text is flattened to plain text, except lists, which export as
//! bulleted lines. Pagination is greedy over estimated paragraph heights
//! using an average-character-width line estimate; in two-column mode each
//! column paginates independently and pages are zipped together.

use serde::Serialize;

use crate::config;
use crate::model::{Cv, FontScale, HeadingStyle, LineHeightScale, SectionEntry};
use crate::render::plan::{self, AccentContent, BodyPlan, ContactItem, HeaderPlan, SectionPlan};
use crate::render::text::{
    export_file_name, extract_list_items, format_date, format_date_range, has_list_items,
    strip_html,
};

// Fixed style table in points, body size comes from the theme scale.
const NAME_SIZE_PT: f32 = 20.0;
const TITLE_SIZE_PT: f32 = 12.0;
const CONTACT_SIZE_PT: f32 = 9.0;
const HEADING_SIZE_PT: f32 = 12.0;
const HEADING_UPPERCASE_SIZE_PT: f32 = 10.0;
const ENTRY_TITLE_SIZE_PT: f32 = 10.0;
const ENTRY_SUBTITLE_SIZE_PT: f32 = 9.0;
const DATE_SIZE_PT: f32 = 8.0;
const BODY_TEXT_SIZE_PT: f32 = 9.0;

// Average glyph width as a fraction of the font size; a static
// approximation is enough for page-break estimates.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// Fixed-page rendering of one document, ready for a PDF backend.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub file_name: String,
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_pt: f32,
    pub body_font_size_pt: f32,
    pub line_height: f32,
    pub header: Vec<Paragraph>,
    pub accent: Option<ExportAccent>,
    pub pages: Vec<ExportPage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportAccent {
    pub position: crate::model::AccentBoxPosition,
    pub width_pct: u8,
    pub background_color: String,
    pub text_color: String,
    pub paragraphs: Vec<Paragraph>,
}

/// One page of body content. Single-column documents fill one full-width
/// column; two-column documents carry two.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPage {
    pub columns: Vec<ExportColumn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportColumn {
    /// Width as a fraction of the body content width.
    pub width_frac: f32,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphStyle {
    Name,
    Title,
    Contact,
    Heading,
    EntryTitle,
    EntrySubtitle,
    Date,
    Body,
    Bullet,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paragraph {
    pub text: String,
    pub style: ParagraphStyle,
    pub font_size_pt: f32,
}

pub fn render(cv: &Cv) -> ExportDocument {
    let plan = plan::plan(cv);
    let line_height = line_height_factor(cv.theme.line_height);
    let heading_uppercase = cv.theme.heading_style == HeadingStyle::Uppercase;

    let content_width = config::A4_WIDTH_PT - 2.0 * config::PAGE_MARGIN_PT;
    let content_height = config::A4_HEIGHT_PT - 2.0 * config::PAGE_MARGIN_PT;

    let accent = plan.accent.as_ref().map(|a| ExportAccent {
        position: a.position,
        width_pct: a.width_pct,
        background_color: a.background_color.clone(),
        text_color: a.text_color.clone(),
        paragraphs: accent_paragraphs(&a.content),
    });

    // A sidebar narrows the region holding header and body.
    let body_width = match &accent {
        Some(a) if a.position != crate::model::AccentBoxPosition::Top => {
            content_width * (1.0 - a.width_pct as f32 / 100.0)
        }
        _ => content_width,
    };

    let header = header_paragraphs(&plan.header);
    let header_height = block_height(&header, body_width, line_height)
        + accent_top_height(&accent, content_width, line_height);

    let pages = match &plan.body {
        BodyPlan::Single(sections) => {
            let paragraphs = sections_paragraphs(sections, heading_uppercase);
            paginate_single(
                paragraphs,
                body_width,
                content_height,
                header_height,
                line_height,
            )
        }
        BodyPlan::TwoColumn {
            split_ratio,
            left,
            right,
        } => {
            let left_width = body_width * split_ratio;
            let right_width = body_width - left_width;
            let left_pages = paginate(
                sections_paragraphs(left, heading_uppercase),
                left_width,
                content_height,
                header_height,
                line_height,
            );
            let right_pages = paginate(
                sections_paragraphs(right, heading_uppercase),
                right_width,
                content_height,
                header_height,
                line_height,
            );
            zip_columns(left_pages, right_pages, *split_ratio)
        }
    };

    ExportDocument {
        file_name: export_file_name(&cv.name),
        page_width_pt: config::A4_WIDTH_PT,
        page_height_pt: config::A4_HEIGHT_PT,
        margin_pt: config::PAGE_MARGIN_PT,
        body_font_size_pt: body_font_size(cv.theme.font_size),
        line_height,
        header,
        accent,
        pages,
    }
}

fn body_font_size(scale: FontScale) -> f32 {
    match scale {
        FontScale::Small => 9.0,
        FontScale::Medium => 10.0,
        FontScale::Large => 11.0,
    }
}

fn line_height_factor(scale: LineHeightScale) -> f32 {
    match scale {
        LineHeightScale::Tight => 1.3,
        LineHeightScale::Normal => 1.5,
        LineHeightScale::Relaxed => 1.7,
    }
}

fn header_paragraphs(header: &HeaderPlan) -> Vec<Paragraph> {
    let mut out = vec![Paragraph {
        text: header.full_name.clone(),
        style: ParagraphStyle::Name,
        font_size_pt: NAME_SIZE_PT,
    }];
    if let Some(title) = &header.title {
        out.push(Paragraph {
            text: title.clone(),
            style: ParagraphStyle::Title,
            font_size_pt: TITLE_SIZE_PT,
        });
    }
    for contact in &header.contacts {
        out.push(contact_paragraph(contact));
    }
    if let Some(summary) = &header.summary_html {
        out.push(Paragraph {
            text: strip_html(summary),
            style: ParagraphStyle::Body,
            font_size_pt: BODY_TEXT_SIZE_PT,
        });
    }
    out
}

fn contact_paragraph(contact: &ContactItem) -> Paragraph {
    Paragraph {
        text: contact.value.clone(),
        style: ParagraphStyle::Contact,
        font_size_pt: CONTACT_SIZE_PT,
    }
}

fn accent_paragraphs(content: &AccentContent) -> Vec<Paragraph> {
    match content {
        AccentContent::Contact(items) => items.iter().map(contact_paragraph).collect(),
        AccentContent::Skills(groups) => {
            let mut out = Vec::new();
            for group in groups {
                out.push(Paragraph {
                    text: group.category.clone(),
                    style: ParagraphStyle::EntryTitle,
                    font_size_pt: ENTRY_TITLE_SIZE_PT,
                });
                out.push(Paragraph {
                    text: group.skills.join(", "),
                    style: ParagraphStyle::Body,
                    font_size_pt: BODY_TEXT_SIZE_PT,
                });
            }
            out
        }
        AccentContent::Custom(text) => vec![Paragraph {
            text: text.clone(),
            style: ParagraphStyle::Body,
            font_size_pt: BODY_TEXT_SIZE_PT,
        }],
    }
}

fn sections_paragraphs(sections: &[SectionPlan], heading_uppercase: bool) -> Vec<Paragraph> {
    let mut out = Vec::new();
    for section in sections {
        let (text, size) = if heading_uppercase {
            (section.title.to_uppercase(), HEADING_UPPERCASE_SIZE_PT)
        } else {
            (section.title.clone(), HEADING_SIZE_PT)
        };
        out.push(Paragraph {
            text,
            style: ParagraphStyle::Heading,
            font_size_pt: size,
        });
        for entry in &section.entries {
            entry_paragraphs(entry, &mut out);
        }
    }
    out
}

fn entry_paragraphs(entry: &SectionEntry, out: &mut Vec<Paragraph>) {
    match entry {
        SectionEntry::Summary(e) => {
            if !e.content.is_empty() {
                push_body(out, &e.content);
            }
        }
        SectionEntry::Experience(e) => {
            push_entry_title(out, &e.position);
            let subtitle = if e.location.is_empty() {
                e.company.clone()
            } else {
                format!("{} - {}", e.company, e.location)
            };
            push_subtitle(out, &subtitle);
            push_date(out, &format_date_range(&e.start_date, &e.end_date, e.current));
            if !e.description.is_empty() {
                push_body(out, &e.description);
            }
        }
        SectionEntry::Education(e) => {
            let title = if e.field.is_empty() {
                e.degree.clone()
            } else {
                format!("{} in {}", e.degree, e.field)
            };
            push_entry_title(out, &title);
            let subtitle = if e.location.is_empty() {
                e.institution.clone()
            } else {
                format!("{} - {}", e.institution, e.location)
            };
            push_subtitle(out, &subtitle);
            push_date(out, &format_date_range(&e.start_date, &e.end_date, e.current));
            if !e.description.is_empty() {
                out.push(Paragraph {
                    text: e.description.clone(),
                    style: ParagraphStyle::Body,
                    font_size_pt: BODY_TEXT_SIZE_PT,
                });
            }
        }
        SectionEntry::Skills(e) => {
            push_entry_title(out, &e.category);
            out.push(Paragraph {
                text: e.skills.join(", "),
                style: ParagraphStyle::Body,
                font_size_pt: BODY_TEXT_SIZE_PT,
            });
        }
        SectionEntry::Project(e) => {
            push_entry_title(out, &e.name);
            if !e.url.is_empty() {
                push_subtitle(out, &e.url);
            }
            if !e.start_date.is_empty() || !e.end_date.is_empty() {
                let date = if e.end_date.is_empty() {
                    format_date(&e.start_date)
                } else {
                    format!("{} - {}", format_date(&e.start_date), format_date(&e.end_date))
                };
                push_date(out, &date);
            }
            if !e.description.is_empty() {
                push_body(out, &e.description);
            }
        }
        SectionEntry::Certification(e) => {
            push_entry_title(out, &e.name);
            push_subtitle(out, &e.issuer);
            push_date(out, &format_date(&e.date));
        }
        SectionEntry::Language(e) => {
            out.push(Paragraph {
                text: format!("{} - {}", e.language, e.proficiency.label()),
                style: ParagraphStyle::Body,
                font_size_pt: BODY_TEXT_SIZE_PT,
            });
        }
        SectionEntry::Award(e) => {
            push_entry_title(out, &e.title);
            push_subtitle(out, &e.issuer);
            if !e.description.is_empty() {
                out.push(Paragraph {
                    text: e.description.clone(),
                    style: ParagraphStyle::Body,
                    font_size_pt: BODY_TEXT_SIZE_PT,
                });
            }
            push_date(out, &format_date(&e.date));
        }
    }
}

fn push_entry_title(out: &mut Vec<Paragraph>, text: &str) {
    out.push(Paragraph {
        text: text.to_string(),
        style: ParagraphStyle::EntryTitle,
        font_size_pt: ENTRY_TITLE_SIZE_PT,
    });
}

fn push_subtitle(out: &mut Vec<Paragraph>, text: &str) {
    out.push(Paragraph {
        text: text.to_string(),
        style: ParagraphStyle::EntrySubtitle,
        font_size_pt: ENTRY_SUBTITLE_SIZE_PT,
    });
}

fn push_date(out: &mut Vec<Paragraph>, text: &str) {
    out.push(Paragraph {
        text: text.to_string(),
        style: ParagraphStyle::Date,
        font_size_pt: DATE_SIZE_PT,
    });
}

/// Rich text becomes either bulleted lines or one flattened paragraph.
fn push_body(out: &mut Vec<Paragraph>, html: &str) {
    if has_list_items(html) {
        for item in extract_list_items(html) {
            out.push(Paragraph {
                text: item,
                style: ParagraphStyle::Bullet,
                font_size_pt: BODY_TEXT_SIZE_PT,
            });
        }
    } else {
        out.push(Paragraph {
            text: strip_html(html),
            style: ParagraphStyle::Body,
            font_size_pt: BODY_TEXT_SIZE_PT,
        });
    }
}

// ===== Pagination =====

fn estimate_lines(text: &str, width_pt: f32, font_size_pt: f32) -> u32 {
    if text.is_empty() {
        return 1;
    }
    let chars_per_line = (width_pt / (font_size_pt * AVG_CHAR_WIDTH_EM)).floor().max(1.0) as usize;
    text.chars().count().div_ceil(chars_per_line) as u32
}

fn paragraph_height(p: &Paragraph, width_pt: f32, line_height: f32) -> f32 {
    let lines = estimate_lines(&p.text, width_pt, p.font_size_pt);
    let gap = match p.style {
        ParagraphStyle::Heading => 9.0,
        ParagraphStyle::Name | ParagraphStyle::Title => 4.0,
        ParagraphStyle::Bullet => 2.0,
        ParagraphStyle::Date => 3.0,
        _ => 2.0,
    };
    lines as f32 * p.font_size_pt * line_height + gap
}

fn block_height(paragraphs: &[Paragraph], width_pt: f32, line_height: f32) -> f32 {
    if paragraphs.is_empty() {
        return 0.0;
    }
    // Bottom border and padding below the header block.
    let trailer = 16.0;
    paragraphs
        .iter()
        .map(|p| paragraph_height(p, width_pt, line_height))
        .sum::<f32>()
        + trailer
}

fn accent_top_height(
    accent: &Option<ExportAccent>,
    width_pt: f32,
    line_height: f32,
) -> f32 {
    match accent {
        Some(a) if a.position == crate::model::AccentBoxPosition::Top => {
            block_height(&a.paragraphs, width_pt, line_height)
        }
        _ => 0.0,
    }
}

/// Greedy pack into per-page paragraph runs. The first page's capacity is
/// reduced by the header block; a paragraph taller than a whole page still
/// occupies one page rather than being split.
fn paginate(
    paragraphs: Vec<Paragraph>,
    width_pt: f32,
    page_height_pt: f32,
    first_page_offset_pt: f32,
    line_height: f32,
) -> Vec<Vec<Paragraph>> {
    let mut pages: Vec<Vec<Paragraph>> = Vec::new();
    let mut current: Vec<Paragraph> = Vec::new();
    let mut remaining = page_height_pt - first_page_offset_pt;

    for p in paragraphs {
        let height = paragraph_height(&p, width_pt, line_height);
        if height > remaining && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
            remaining = page_height_pt;
        }
        remaining -= height;
        current.push(p);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

fn paginate_single(
    paragraphs: Vec<Paragraph>,
    width_pt: f32,
    page_height_pt: f32,
    first_page_offset_pt: f32,
    line_height: f32,
) -> Vec<ExportPage> {
    paginate(
        paragraphs,
        width_pt,
        page_height_pt,
        first_page_offset_pt,
        line_height,
    )
    .into_iter()
    .map(|paragraphs| ExportPage {
        columns: vec![ExportColumn {
            width_frac: 1.0,
            paragraphs,
        }],
    })
    .collect()
}

/// Columns paginate independently; page `i` shows page `i` of each stream.
fn zip_columns(
    left: Vec<Vec<Paragraph>>,
    right: Vec<Vec<Paragraph>>,
    split_ratio: f32,
) -> Vec<ExportPage> {
    let count = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();

    (0..count)
        .map(|_| ExportPage {
            columns: vec![
                ExportColumn {
                    width_frac: split_ratio,
                    paragraphs: left.next().unwrap_or_default(),
                },
                ExportColumn {
                    width_frac: 1.0 - split_ratio,
                    paragraphs: right.next().unwrap_or_default(),
                },
            ],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{create_cv, ExperienceEntry, SummaryEntry};
    use crate::model::{SectionEntry, SectionType};

    fn cv_with_content() -> Cv {
        let mut cv = create_cv("My Great CV", "classic").unwrap();
        cv.personal_info.first_name = "Alan".to_string();
        cv.personal_info.last_name = "Turing".to_string();
        cv.personal_info.email = "alan@example.com".to_string();

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
                content: "<p>Mathematician &amp; computer scientist.</p>".to_string(),
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
                company: "GC&CS".to_string(),
                position: "Cryptanalyst".to_string(),
                location: "Bletchley".to_string(),
                start_date: "1939-09".to_string(),
                end_date: "1945-05".to_string(),
                current: false,
                description: "<ul><li>Broke naval Enigma</li><li>Designed the Bombe</li></ul>"
                    .to_string(),
            }));
        cv
    }

    fn all_paragraphs(doc: &ExportDocument) -> Vec<&Paragraph> {
        doc.pages
            .iter()
            .flat_map(|p| p.columns.iter())
            .flat_map(|c| c.paragraphs.iter())
            .collect()
    }

    #[test]
    fn page_geometry_is_a4_with_fixed_margins() {
        let doc = render(&cv_with_content());
        assert_eq!(doc.page_width_pt, 595.28);
        assert_eq!(doc.page_height_pt, 841.89);
        assert_eq!(doc.margin_pt, 40.0);
        assert_eq!(doc.file_name, "My_Great_CV.pdf");
        assert_eq!(doc.pages.len(), 1);
    }

    #[test]
    fn theme_scales_map_to_point_sizes() {
        let mut cv = cv_with_content();
        cv.theme.font_size = FontScale::Small;
        cv.theme.line_height = LineHeightScale::Relaxed;
        let doc = render(&cv);
        assert_eq!(doc.body_font_size_pt, 9.0);
        assert_eq!(doc.line_height, 1.7);
    }

    #[test]
    fn rich_text_is_stripped_and_lists_become_bullets() {
        let doc = render(&cv_with_content());
        let paragraphs = all_paragraphs(&doc);

        assert!(paragraphs
            .iter()
            .any(|p| p.text == "Mathematician & computer scientist."
                && p.style == ParagraphStyle::Body));

        let bullets: Vec<&str> = paragraphs
            .iter()
            .filter(|p| p.style == ParagraphStyle::Bullet)
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(bullets, vec!["Broke naval Enigma", "Designed the Bombe"]);

        assert!(!paragraphs.iter().any(|p| p.text.contains('<')));
    }

    #[test]
    fn dates_render_as_month_year() {
        let doc = render(&cv_with_content());
        assert!(all_paragraphs(&doc)
            .iter()
            .any(|p| p.text == "Sep 1939 - May 1945" && p.style == ParagraphStyle::Date));
    }

    #[test]
    fn uppercase_heading_style_transforms_titles() {
        let mut cv = cv_with_content();
        cv.theme.heading_style = HeadingStyle::Uppercase;
        let doc = render(&cv);
        let headings: Vec<&Paragraph> = all_paragraphs(&doc)
            .into_iter()
            .filter(|p| p.style == ParagraphStyle::Heading)
            .collect();
        assert!(!headings.is_empty());
        for h in headings {
            assert_eq!(h.text, h.text.to_uppercase());
            assert_eq!(h.font_size_pt, HEADING_UPPERCASE_SIZE_PT);
        }
    }

    #[test]
    fn long_documents_paginate_greedily() {
        let mut cv = cv_with_content();
        let exp_id = cv
            .sections
            .iter()
            .find(|s| s.section_type == SectionType::Experience)
            .unwrap()
            .id
            .clone();
        for i in 0..40 {
            cv.section_mut(&exp_id)
                .unwrap()
                .entries
                .push(SectionEntry::Experience(ExperienceEntry {
                    id: format!("gen{}", i),
                    company: "Comp".to_string(),
                    position: format!("Role {}", i),
                    location: String::new(),
                    start_date: "2010-01".to_string(),
                    end_date: "2012-01".to_string(),
                    current: false,
                    description: "<p>Did a lot of meaningful work across several projects \
                                  and teams over a sustained period.</p>"
                        .to_string(),
                }));
        }

        let doc = render(&cv);
        assert!(doc.pages.len() > 1);

        // Every paragraph survives pagination, in order.
        let texts: Vec<&str> = all_paragraphs(&doc).iter().map(|p| p.text.as_str()).collect();
        let first = texts.iter().position(|t| *t == "Role 0").unwrap();
        let last = texts.iter().position(|t| *t == "Role 39").unwrap();
        assert!(first < last);
    }

    #[test]
    fn two_column_pages_zip_independent_streams() {
        let mut cv = cv_with_content();
        cv.layout.columns = 2;
        let doc = render(&cv);
        for page in &doc.pages {
            assert_eq!(page.columns.len(), 2);
            assert!((page.columns[0].width_frac - 0.35).abs() < 0.001);
        }
    }
}
