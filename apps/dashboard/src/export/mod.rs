//! Candidate profile export as a paginated A4 PDF.
//!
//! Pipeline: [`layout::ProfileDocument::for_candidate`] builds the block list,
//! [`layout::paginate`] places it on pages, [`pdf::write_pdf`] serializes.

pub mod font_metrics;
pub mod layout;
pub mod pdf;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::models::Candidate;
use font_metrics::{a4_page_config, HELVETICA};
use layout::{paginate, ProfileDocument};
use pdf::{write_pdf, DocumentInfo};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("page {width}x{height} leaves no room inside {padding}pt padding")]
    InvalidPage { width: f32, height: f32, padding: f32 },

    #[error("document exceeds {0} pages")]
    TooManyPages(usize),

    #[error("document has no pages")]
    Empty,

    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered profile, ready to be sent as a download or an inline preview.
#[derive(Debug, Clone)]
pub struct ProfileExport {
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// `<name>_profile.pdf` with every whitespace run collapsed to one underscore.
pub fn profile_file_name(full_name: &str) -> String {
    let mut name = String::with_capacity(full_name.len() + 12);
    let mut in_space = false;
    for c in full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    name.push_str("_profile.pdf");
    name
}

pub fn render_profile(candidate: &Candidate) -> Result<ProfileExport, ExportError> {
    let config = a4_page_config();
    let document = ProfileDocument::for_candidate(candidate);
    let pages = paginate(&document, &HELVETICA, &config)?;

    let bytes = write_pdf(
        &pages,
        &HELVETICA,
        &config,
        &DocumentInfo {
            title: &document.title,
            created_at: Utc::now(),
        },
    )?;

    info!(
        candidate = %candidate.full_name,
        pages = pages.len(),
        bytes = bytes.len(),
        "Rendered profile PDF"
    );

    Ok(ProfileExport {
        file_name: profile_file_name(&candidate.full_name),
        page_count: pages.len(),
        bytes,
    })
}
