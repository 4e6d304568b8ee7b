//! Paragraph classification.
//!
//! A paragraph becomes exactly one kind of Markdown line. The kinds are
//! decided by an ordered list of rules where the first rule that matches
//! wins; a paragraph no rule claims is rendered as plain text.

use super::options::ConvertOptions;
use super::style_mapping::{heading_level, heading_line};
use crate::model::Paragraph;

/// The Markdown shape of a paragraph line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `#`-prefixed heading at the given level
    Heading(u8),
    /// `- ` bullet indented two spaces per level
    ListItem(u8),
    /// Whole line wrapped in `**`
    Bold,
    /// Text as is
    Plain,
}

impl LineKind {
    /// Render already-trimmed paragraph text as this kind of line.
    pub fn render(self, text: &str) -> String {
        match self {
            LineKind::Heading(level) => heading_line(level, text),
            LineKind::ListItem(level) => {
                format!("{}- {}", "  ".repeat(usize::from(level)), text)
            }
            LineKind::Bold => format!("**{}**", text),
            LineKind::Plain => text.to_string(),
        }
    }
}

/// A classification rule.
pub type Rule = fn(&Paragraph, &ConvertOptions) -> Option<LineKind>;

/// Rules for Word body paragraphs, highest priority first.
pub const DOCUMENT_RULES: &[Rule] = &[style_heading, numbered_list, all_bold];

/// Rules for slide text paragraphs, highest priority first.
pub const SLIDE_RULES: &[Rule] = &[large_font_heading, top_level, outline_list];

/// Classify a paragraph with the first matching rule.
pub fn classify(paragraph: &Paragraph, rules: &[Rule], options: &ConvertOptions) -> LineKind {
    rules
        .iter()
        .find_map(|rule| rule(paragraph, options))
        .unwrap_or(LineKind::Plain)
}

fn style_heading(paragraph: &Paragraph, _: &ConvertOptions) -> Option<LineKind> {
    paragraph
        .style_name
        .as_deref()
        .and_then(heading_level)
        .map(LineKind::Heading)
}

fn numbered_list(paragraph: &Paragraph, _: &ConvertOptions) -> Option<LineKind> {
    paragraph.list_info.map(|info| LineKind::ListItem(info.level))
}

fn all_bold(paragraph: &Paragraph, _: &ConvertOptions) -> Option<LineKind> {
    paragraph.is_all_bold().then_some(LineKind::Bold)
}

fn large_font_heading(paragraph: &Paragraph, options: &ConvertOptions) -> Option<LineKind> {
    paragraph
        .max_font_size()
        .filter(|size| *size >= options.heading_font_size_pt)
        .map(|_| LineKind::Heading(3))
}

fn top_level(paragraph: &Paragraph, _: &ConvertOptions) -> Option<LineKind> {
    (paragraph.level == 0).then_some(LineKind::Plain)
}

fn outline_list(paragraph: &Paragraph, _: &ConvertOptions) -> Option<LineKind> {
    Some(LineKind::ListItem(paragraph.level))
}
