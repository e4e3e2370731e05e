//! Profile document model and pagination.
//!
//! A [`ProfileDocument`] is a flat list of blocks built from one candidate.
//! [`paginate`] flows the blocks top to bottom, word-wraps text with the
//! static font metrics, and starts a new page whenever the next line or chip
//! row would cross the bottom padding.

use crate::export::font_metrics::{FontMetricTable, PageConfig};
use crate::export::ExportError;
use crate::models::Candidate;

/// Hard upper bound on pages per document.
pub const MAX_PAGES: usize = 200;

// Type scale, in points.
const TITLE_SIZE: f32 = 24.0;
const SUBTITLE_SIZE: f32 = 16.0;
const SECTION_TITLE_SIZE: f32 = 14.0;
const TEXT_SIZE: f32 = 12.0;
const CHIP_SIZE: f32 = 10.0;

const CHIP_PADDING: f32 = 5.0;
const CHIP_GAP: f32 = 5.0;
const CHIP_RADIUS: f32 = 4.0;

const HEADER_GAP: f32 = 20.0;
const SECTION_GAP: f32 = 15.0;

/// Fraction of the font size between the top of a line box and its baseline.
const ASCENT: f32 = 0.8;

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
}

// #666, #333, #f3f4f6
const SUBTITLE_COLOR: Rgb = Rgb(0.4, 0.4, 0.4);
const SECTION_TITLE_COLOR: Rgb = Rgb(0.2, 0.2, 0.2);
const CHIP_FILL: Rgb = Rgb(0.953, 0.957, 0.965);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgb,
    pub margin_bottom: f32,
}

const TITLE: TextStyle = TextStyle {
    size: TITLE_SIZE,
    color: Rgb::BLACK,
    margin_bottom: 10.0,
};
const SUBTITLE: TextStyle = TextStyle {
    size: SUBTITLE_SIZE,
    color: SUBTITLE_COLOR,
    margin_bottom: 5.0,
};
const SECTION_TITLE: TextStyle = TextStyle {
    size: SECTION_TITLE_SIZE,
    color: SECTION_TITLE_COLOR,
    margin_bottom: 5.0,
};
const BODY: TextStyle = TextStyle {
    size: TEXT_SIZE,
    color: Rgb::BLACK,
    margin_bottom: 3.0,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph; embedded newlines are kept as hard breaks.
    Text { text: String, style: TextStyle },
    /// Wrapping row of filled boxes, one per item.
    Chips { items: Vec<String> },
    Spacer(f32),
}

/// Fixed-layout profile of one candidate, before pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocument {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl ProfileDocument {
    /// Header, then Match Score, Match Analysis, Skills, Experience and
    /// LinkedIn Profile sections. Sections whose content is absent are left out;
    /// Match Score is always present.
    pub fn for_candidate(candidate: &Candidate) -> Self {
        let mut blocks = vec![text(&candidate.full_name, TITLE)];
        for line in [&candidate.job_title, &candidate.company, &candidate.location]
            .into_iter()
            .flatten()
        {
            blocks.push(text(line, SUBTITLE));
        }
        blocks.push(Block::Spacer(HEADER_GAP));

        let mut score = vec![text(&candidate.score_label(), BODY)];
        if let Some(fit) = &candidate.fit_indicator {
            score.push(text(&format!("Fit Indicator: {fit}"), BODY));
        }
        push_section(&mut blocks, "Match Score", score);

        if let Some(reason) = &candidate.match_reason {
            push_section(&mut blocks, "Match Analysis", vec![text(reason, BODY)]);
        }

        let skills = candidate.all_skills();
        if !skills.is_empty() {
            push_section(&mut blocks, "Skills", vec![Block::Chips { items: skills }]);
        }

        if let Some(experience) = &candidate.experience {
            push_section(&mut blocks, "Experience", vec![text(experience, BODY)]);
        }

        if let Some(url) = &candidate.profile_url {
            push_section(&mut blocks, "LinkedIn Profile", vec![text(url, BODY)]);
        }

        ProfileDocument {
            title: format!("{} profile", candidate.full_name),
            blocks,
        }
    }
}

fn text(s: &str, style: TextStyle) -> Block {
    Block::Text {
        text: s.to_string(),
        style,
    }
}

fn push_section(blocks: &mut Vec<Block>, title: &str, body: Vec<Block>) {
    blocks.push(text(title, SECTION_TITLE));
    blocks.extend(body);
    blocks.push(Block::Spacer(SECTION_GAP));
}

// ────────────────────────────────────────────────────────────────────────────
// Laid-out pages
// ────────────────────────────────────────────────────────────────────────────

/// A positioned drawing operation. Coordinates are PDF user space: origin at
/// the bottom-left corner, y growing upwards.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: Rgb,
        text: String,
    },
    /// Filled box; `radius` rounds the corners.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Top-down cursor over a growing list of pages.
struct Flow<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    /// Distance from the top edge of the current page.
    cursor: f32,
}

impl<'a> Flow<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            cursor: config.padding_pt,
        }
    }

    fn bottom(&self) -> f32 {
        self.config.height_pt - self.config.padding_pt
    }

    /// Moves to a new page unless `height` still fits on this one. A box taller
    /// than a whole page is placed at the top of a fresh page and allowed to clip.
    fn reserve(&mut self, height: f32) -> Result<(), ExportError> {
        let at_top = self.cursor <= self.config.padding_pt;
        if self.cursor + height > self.bottom() && !at_top {
            if self.pages.len() >= MAX_PAGES {
                return Err(ExportError::TooManyPages(MAX_PAGES));
            }
            self.pages.push(Page::default());
            self.cursor = self.config.padding_pt;
        }
        Ok(())
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Converts a distance-from-top into a PDF y coordinate.
    fn to_pdf_y(&self, from_top: f32) -> f32 {
        self.config.height_pt - from_top
    }

    fn advance(&mut self, by: f32) {
        self.cursor += by;
    }
}

/// Lays out `document` onto as many pages as it needs.
pub fn paginate(
    document: &ProfileDocument,
    metrics: &FontMetricTable,
    config: &PageConfig,
) -> Result<Vec<Page>, ExportError> {
    if config.content_width() <= 0.0 || config.content_height() <= 0.0 {
        return Err(ExportError::InvalidPage {
            width: config.width_pt,
            height: config.height_pt,
            padding: config.padding_pt,
        });
    }

    let mut flow = Flow::new(config);

    for block in &document.blocks {
        match block {
            Block::Text { text, style } => layout_text(&mut flow, text, *style, metrics)?,
            Block::Chips { items } => layout_chips(&mut flow, items, metrics)?,
            // Spacers never open a page on their own.
            Block::Spacer(height) => flow.advance(*height),
        }
    }

    Ok(flow.pages)
}

fn layout_text(
    flow: &mut Flow<'_>,
    text: &str,
    style: TextStyle,
    metrics: &FontMetricTable,
) -> Result<(), ExportError> {
    let line_height = style.size * flow.config.line_height;
    let max_width = flow.config.content_width();

    for paragraph in text.split('\n') {
        let lines = wrap_text(paragraph, metrics, style.size, max_width);
        // A blank paragraph still takes one line, like a hard break.
        let lines = if lines.is_empty() { vec![String::new()] } else { lines };

        for line in lines {
            flow.reserve(line_height)?;
            if !line.is_empty() {
                let y = flow.to_pdf_y(flow.cursor + style.size * ASCENT);
                flow.push(DrawOp::Text {
                    x: flow.config.padding_pt,
                    y,
                    size: style.size,
                    color: style.color,
                    text: line,
                });
            }
            flow.advance(line_height);
        }
    }

    flow.advance(style.margin_bottom);
    Ok(())
}

fn layout_chips(
    flow: &mut Flow<'_>,
    items: &[String],
    metrics: &FontMetricTable,
) -> Result<(), ExportError> {
    if items.is_empty() {
        return Ok(());
    }

    let left = flow.config.padding_pt;
    let max_width = flow.config.content_width();
    let chip_height = CHIP_SIZE * flow.config.line_height + 2.0 * CHIP_PADDING;
    let max_label = max_width - 2.0 * CHIP_PADDING;

    let mut x = left;
    flow.reserve(chip_height)?;

    for item in items {
        let label = truncate_to_width(item, metrics, CHIP_SIZE, max_label);
        let width = metrics.width_pt(&label, CHIP_SIZE) + 2.0 * CHIP_PADDING;

        if x > left && x + width > left + max_width {
            flow.advance(chip_height + CHIP_GAP);
            flow.reserve(chip_height)?;
            x = left;
        }

        let top = flow.cursor;
        flow.push(DrawOp::Rect {
            x,
            y: flow.to_pdf_y(top + chip_height),
            width,
            height: chip_height,
            radius: CHIP_RADIUS,
            color: CHIP_FILL,
        });
        flow.push(DrawOp::Text {
            x: x + CHIP_PADDING,
            y: flow.to_pdf_y(top + CHIP_PADDING + CHIP_SIZE * ASCENT),
            size: CHIP_SIZE,
            color: Rgb::BLACK,
            text: label,
        });

        x += width + CHIP_GAP;
    }

    flow.advance(chip_height);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Line breaking
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap at `max_width_pt`. Words wider than a full line are split
/// between characters. An empty or all-whitespace string yields no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let space = metrics.space_width * size_pt;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_width = metrics.width_pt(word, size_pt);

        if word_width > max_width_pt {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            let mut pieces = split_word(word, metrics, size_pt, max_width_pt);
            if let Some(last) = pieces.pop() {
                lines.extend(pieces);
                current_width = metrics.width_pt(&last, size_pt);
                current = last;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width > max_width_pt {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_word(
    word: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let w = metrics.char_width(c) * size_pt;
        if !piece.is_empty() && width + w > max_width_pt {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Shortens `text` with a trailing `...` until it fits in `max_width_pt`.
fn truncate_to_width(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
) -> String {
    if metrics.width_pt(text, size_pt) <= max_width_pt {
        return text.to_string();
    }
    let ellipsis = "...";
    let budget = max_width_pt - metrics.width_pt(ellipsis, size_pt);
    let mut out = String::new();
    let mut width = 0.0_f32;
    for c in text.chars() {
        let w = metrics.char_width(c) * size_pt;
        if width + w > budget {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str(ellipsis);
    out
}
