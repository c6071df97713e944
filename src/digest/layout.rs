//! Page model and cursor-based layout for the digest.
//!
//! Coordinates are millimetres on an A4 page measured from the top-left
//! corner; the PDF renderer flips the y axis.

use serde::Serialize;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_LEFT_MM: f32 = 14.0;
pub const MARGIN_RIGHT_MM: f32 = 196.0;
pub const CENTER_X_MM: f32 = 105.0;
/// Crossing this line forces a page break.
pub const PAGE_BOTTOM_MM: f32 = 270.0;
/// Where layout resumes after an automatic page break.
pub const CONTINUATION_TOP_MM: f32 = 20.0;
pub const FOOTER_Y_MM: f32 = 290.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextStyle {
    Title,
    Subtitle,
    Section,
    Heading,
    Body,
    TableHeader,
    TableCell,
    Footer,
}

impl TextStyle {
    pub fn font_size(&self) -> f32 {
        match self {
            Self::Title => 20.0,
            Self::Subtitle => 12.0,
            Self::Section => 16.0,
            Self::Heading => 14.0,
            Self::Body | Self::TableHeader | Self::TableCell => 10.0,
            Self::Footer => 8.0,
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Title | Self::Heading | Self::TableHeader => (128, 0, 128),
            Self::Subtitle => (100, 100, 100),
            Self::Footer => (150, 150, 150),
            Self::Section | Self::Body | Self::TableCell => (0, 0, 0),
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, Self::Title | Self::Section | Self::Heading | Self::TableHeader)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
        align: Align,
    },
    Rule {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    /// Text content of the page in emission order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Rule { .. } => None,
        })
    }

    pub fn footer(&self) -> Option<&str> {
        self.elements.iter().rev().find_map(|e| match e {
            Element::Text {
                text,
                style: TextStyle::Footer,
                ..
            } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Accumulates pages while tracking the vertical cursor.
pub(crate) struct PageLayout {
    pages: Vec<Page>,
    pub y: f32,
}

impl PageLayout {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: 0.0,
        }
    }

    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn text_at(&mut self, text: impl Into<String>, x: f32, y: f32, style: TextStyle, align: Align) {
        self.current().elements.push(Element::Text {
            text: text.into(),
            x,
            y,
            style,
            align,
        });
    }

    /// Left-aligned text at the cursor.
    pub fn text(&mut self, text: impl Into<String>, x: f32, style: TextStyle) {
        let y = self.y;
        self.text_at(text, x, y, style, Align::Left);
    }

    pub fn rule(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.current().elements.push(Element::Rule { x1, y1, x2, y2 });
    }

    pub fn new_page(&mut self, top: f32) {
        self.pages.push(Page::default());
        self.y = top;
    }

    /// Breaks to a new page once the cursor has passed the bottom margin.
    pub fn break_if_past_bottom(&mut self) {
        if self.y > PAGE_BOTTOM_MM {
            self.new_page(CONTINUATION_TOP_MM);
        }
    }

    /// Breaks to a new page if `height` more millimetres would not fit.
    pub fn ensure_room(&mut self, height: f32) {
        if self.y + height > PAGE_BOTTOM_MM {
            self.new_page(CONTINUATION_TOP_MM);
        }
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

/// Simple word-wrap helper for PDF text rendering. Words longer than
/// `max_chars` are split so no line exceeds the column width.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let current_len = current.chars().count();
        if current_len + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Rough Helvetica advance width, used only to centre text.
pub fn approx_text_width_mm(text: &str, font_size: f32) -> f32 {
    const PT_TO_MM: f32 = 0.3528;
    text.chars().count() as f32 * font_size * 0.5 * PT_TO_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let text = "This is a long sentence that should be wrapped at around forty characters or so.";
        let lines = wrap_text(text, 40);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 40);
        }
    }

    #[test]
    fn test_wrap_text_short() {
        let lines = wrap_text("Short", 40);
        assert_eq!(lines, vec!["Short"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        let lines = wrap_text("", 40);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let lines = wrap_text("see aaaaaaaaaa", 4);
        assert_eq!(lines, vec!["see", "aaaa", "aaaa", "aa"]);
    }

    #[test]
    fn break_if_past_bottom_starts_new_page() {
        let mut layout = PageLayout::new();
        layout.y = PAGE_BOTTOM_MM;
        layout.break_if_past_bottom();
        assert_eq!(layout.into_pages().len(), 1);

        let mut layout = PageLayout::new();
        layout.y = PAGE_BOTTOM_MM + 1.0;
        layout.break_if_past_bottom();
        assert_eq!(layout.y, CONTINUATION_TOP_MM);
        assert_eq!(layout.into_pages().len(), 2);
    }

    #[test]
    fn footer_lookup_ignores_body_text() {
        let mut layout = PageLayout::new();
        layout.y = 30.0;
        layout.text("body", MARGIN_LEFT_MM, TextStyle::Body);
        let pages = layout.into_pages();
        assert_eq!(pages[0].footer(), None);
        assert_eq!(pages[0].texts().collect::<Vec<_>>(), vec!["body"]);
    }
}
