//! Minimal PDF 1.4 serializer for laid-out pages.
//!
//! Object layout:
//! ```text
//! 1 Catalog   2 Pages   3 Font (base-14, WinAnsiEncoding)   4 Info
//! 5 + 2i  Page i        6 + 2i  content stream of page i
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::export::font_metrics::{FontMetricTable, PageConfig};
use crate::export::layout::{DrawOp, Page, Rgb};
use crate::export::ExportError;

const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));
const FIRST_PAGE_OBJECT: usize = 5;

/// Document information dictionary fields.
pub struct DocumentInfo<'a> {
    pub title: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Serializes `pages` into a complete PDF file.
pub fn write_pdf(
    pages: &[Page],
    font: &FontMetricTable,
    config: &PageConfig,
    info: &DocumentInfo<'_>,
) -> Result<Vec<u8>, ExportError> {
    if pages.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut out: Vec<u8> = Vec::new();
    // Object byte offsets, indexed by object number - 1.
    let mut offsets: Vec<usize> = Vec::new();

    out.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;

    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");

    begin_object(&mut out, &mut offsets)?;
    out.write_all(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n")?;

    begin_object(&mut out, &mut offsets)?;
    write!(
        out,
        "<< /Type /Pages /Kids [{kids}] /Count {} >>\nendobj\n",
        pages.len()
    )?;

    begin_object(&mut out, &mut offsets)?;
    write!(
        out,
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\nendobj\n",
        font.base_font
    )?;

    begin_object(&mut out, &mut offsets)?;
    out.write_all(b"<< /Title ")?;
    write_string(&mut out, info.title)?;
    out.write_all(b" /Producer ")?;
    write_string(&mut out, PRODUCER)?;
    write!(
        out,
        " /CreationDate (D:{}Z) >>\nendobj\n",
        info.created_at.format("%Y%m%d%H%M%S")
    )?;

    for (i, page) in pages.iter().enumerate() {
        let content_ref = FIRST_PAGE_OBJECT + 2 * i + 1;

        begin_object(&mut out, &mut offsets)?;
        write!(
            out,
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_ref} 0 R >>\nendobj\n",
            num(config.width_pt),
            num(config.height_pt)
        )?;

        let stream = content_stream(page)?;
        begin_object(&mut out, &mut offsets)?;
        write!(out, "<< /Length {} >>\nstream\n", stream.len())?;
        out.write_all(&stream)?;
        out.write_all(b"\nendstream\nendobj\n")?;
    }

    let xref_offset = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1)?;
    for offset in &offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 4 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        offsets.len() + 1
    )?;

    Ok(out)
}

fn begin_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>) -> std::io::Result<()> {
    offsets.push(out.len());
    write!(out, "{} 0 obj\n", offsets.len())
}

fn content_stream(page: &Page) -> std::io::Result<Vec<u8>> {
    let mut s: Vec<u8> = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                radius,
                color,
            } => {
                write!(s, "{} rg ", rgb(*color))?;
                let r = radius.min(width / 2.0).min(height / 2.0);
                if r > 0.0 {
                    rounded_rect_path(&mut s, *x, *y, *width, *height, r)?;
                    s.write_all(b" f\n")?;
                } else {
                    write!(
                        s,
                        "{} {} {} {} re f\n",
                        num(*x),
                        num(*y),
                        num(*width),
                        num(*height)
                    )?;
                }
            }
            DrawOp::Text {
                x,
                y,
                size,
                color,
                text,
            } => {
                write!(
                    s,
                    "BT /F1 {} Tf {} rg {} {} Td ",
                    num(*size),
                    rgb(*color),
                    num(*x),
                    num(*y)
                )?;
                write_string(&mut s, text)?;
                s.write_all(b" Tj ET\n")?;
            }
        }
    }
    Ok(s)
}

/// Closed path of a rounded rectangle; corners are cubic Bezier quarter arcs.
fn rounded_rect_path(
    s: &mut Vec<u8>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    r: f32,
) -> std::io::Result<()> {
    // Control point offset for a quarter circle.
    let k = r * 0.552_284_8;
    let (x1, y1) = (x + w, y + h);
    write!(s, "{} {} m ", num(x + r), num(y))?;
    write!(s, "{} {} l ", num(x1 - r), num(y))?;
    write!(
        s,
        "{} {} {} {} {} {} c ",
        num(x1 - r + k),
        num(y),
        num(x1),
        num(y + r - k),
        num(x1),
        num(y + r)
    )?;
    write!(s, "{} {} l ", num(x1), num(y1 - r))?;
    write!(
        s,
        "{} {} {} {} {} {} c ",
        num(x1),
        num(y1 - r + k),
        num(x1 - r + k),
        num(y1),
        num(x1 - r),
        num(y1)
    )?;
    write!(s, "{} {} l ", num(x + r), num(y1))?;
    write!(
        s,
        "{} {} {} {} {} {} c ",
        num(x + r - k),
        num(y1),
        num(x),
        num(y1 - r + k),
        num(x),
        num(y1 - r)
    )?;
    write!(s, "{} {} l ", num(x), num(y + r))?;
    write!(
        s,
        "{} {} {} {} {} {} c h",
        num(x),
        num(y + r - k),
        num(x + r - k),
        num(y),
        num(x + r),
        num(y)
    )
}

fn num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn rgb(Rgb(r, g, b): Rgb) -> String {
    format!("{} {} {}", num(r), num(g), num(b))
}

/// Writes a literal string `( ... )` in WinAnsi bytes.
fn write_string(out: &mut Vec<u8>, text: &str) -> std::io::Result<()> {
    out.push(b'(');
    for c in text.chars() {
        let byte = win_ansi(c);
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    Ok(())
}

/// Maps a char to its WinAnsiEncoding byte. Unmappable chars become `?`.
pub fn win_ansi(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}
