//! Candidate search page: form, page states, result cards and the profile modal.

use crate::models::Candidate;
use crate::search::session::{ModalMode, SearchSession};
use crate::view::{escape, layout, Head, NavItem};

pub const EMPTY_NOTICE: &str = "No candidates found. Try adjusting your search criteria.";

/// Reload interval while a search is in flight.
const LOADING_REFRESH_SECS: u32 = 2;

const INTRO: &str = "Find the perfect candidates for your roles using our advanced AI-powered search. \
Enter your job requirements below, and we'll match you with candidates who best fit your criteria, \
analyzing skills, experience, and overall compatibility.";

pub fn search_page(session: &SearchSession) -> String {
    let mut body = form(session);

    if let Some(error) = &session.error {
        body.push_str(&format!(r#"<div class="banner" role="alert">{}</div>"#, escape(error)));
    }

    if !session.candidates.is_empty() {
        let cards: String = session
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| card(i, c))
            .collect();
        body.push_str(&format!(r#"<div class="grid-2">{cards}</div>"#));
    }

    if session.is_loading {
        body.push_str(r#"<div class="loading" aria-busy="true">Searching for candidates...</div>"#);
    }

    if session.show_empty_notice() {
        body.push_str(&format!(r#"<div class="panel notice">{EMPTY_NOTICE}</div>"#));
    }

    if let Some(modal) = session.modal {
        if let Some(candidate) = session.candidate(modal.index) {
            body.push_str(&match modal.mode {
                ModalMode::Detail => detail_modal(modal.index, candidate),
                ModalMode::Preview => preview_modal(modal.index),
            });
        }
    }

    let head = Head {
        refresh_secs: session.is_loading.then_some(LOADING_REFRESH_SECS),
    };
    layout(Some(NavItem::Search), "Candidate Search", head, &body)
}

fn form(session: &SearchSession) -> String {
    let (disabled, button) = if session.is_loading {
        (" disabled", "Searching...")
    } else {
        ("", "Find Matching Candidates")
    };

    format!(
        r#"<div class="panel">
<h1>Candidate Search</h1>
<p class="muted">{INTRO}</p>
<form method="post" action="/search">
<label for="job_title">Job Title</label>
<input id="job_title" name="job_title" type="text" value="{title}" placeholder="e.g. Senior React Developer" required>
<label for="job_description">Job Description</label>
<textarea id="job_description" name="job_description" rows="4" placeholder="Enter detailed job requirements and responsibilities..." required>{description}</textarea>
<button class="submit" type="submit"{disabled}>{button}</button>
</form>
</div>"#,
        title = escape(&session.job_title),
        description = escape(&session.job_description),
    )
}

fn chips<S: AsRef<str>>(items: &[S], class: &str) -> String {
    let spans: String = items
        .iter()
        .map(|s| format!(r#"<span class="chip {class}">{}</span>"#, escape(s.as_ref())))
        .collect();
    format!(r#"<div class="chips">{spans}</div>"#)
}

fn avatar(candidate: &Candidate, large: bool, placeholder: &str) -> String {
    let size = if large { " avatar-lg" } else { "" };
    match &candidate.profile_image {
        Some(src) => format!(
            r#"<img class="avatar{size}" src="{}" alt="{}">"#,
            escape(src),
            escape(&candidate.full_name)
        ),
        None => format!(r#"<div class="avatar{size}">{}</div>"#, escape(placeholder)),
    }
}

fn optional_line(tag: &str, class: &str, value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|v| format!(r#"<{tag} class="{class}">{}</{tag}>"#, escape(v)))
        .unwrap_or_default()
}

fn badge(candidate: &Candidate) -> String {
    format!(
        r#"<span class="{}">{}</span>"#,
        candidate.score_band().css_class(),
        escape(&candidate.score_label())
    )
}

/// One result card. `index` is the candidate's position in the response.
pub fn card(index: usize, candidate: &Candidate) -> String {
    let mut sections = String::new();

    if let Some(matched) = candidate.matched_skill_list() {
        sections.push_str(&format!(
            "<h4>Matched Skills</h4>{}",
            chips(&matched, "chip-matched")
        ));
    }
    if let Some(missing) = candidate.missing_skill_list() {
        sections.push_str(&format!(
            "<h4>Missing Skills</h4>{}",
            chips(&missing, "chip-missing")
        ));
    }
    sections.push_str(&format!(
        "<h4>All Skills</h4>{}",
        chips(&candidate.card_skills(), "")
    ));
    sections.push_str(&format!(
        r#"<div class="tile"><h4>Match Analysis</h4><p class="muted">{}</p></div>"#,
        escape(candidate.match_reason.as_deref().unwrap_or_default())
    ));

    format!(
        r#"<article class="card">
<div class="card-body">
<div class="card-head">
{avatar}
<div class="card-id">
<h3>{name}</h3>
{title}{company}
</div>
<div class="card-score">{badge}<div>{fit}</div></div>
</div>
{sections}
</div>
<div class="card-foot"><a class="link" href="/search/candidates/{index}">View Profile</a></div>
</article>"#,
        avatar = avatar(candidate, false, "\u{1F464}"),
        name = escape(&candidate.full_name),
        title = optional_line("p", "muted", &candidate.job_title),
        company = optional_line("p", "muted company", &candidate.company),
        badge = badge(candidate),
        fit = escape(candidate.fit_indicator.as_deref().unwrap_or_default()),
    )
}

fn detail_modal(index: usize, candidate: &Candidate) -> String {
    let mut sections = format!(
        r#"<h4>Match Score</h4><div class="actions">{badge}<span class="muted">{fit}</span></div>"#,
        badge = badge(candidate),
        fit = escape(candidate.fit_indicator.as_deref().unwrap_or_default()),
    );
    if let Some(reason) = &candidate.match_reason {
        sections.push_str(&format!(
            r#"<h4>Match Analysis</h4><p class="muted">{}</p>"#,
            escape(reason)
        ));
    }
    if let Some(experience) = &candidate.experience {
        sections.push_str(&format!(
            r#"<h4>Experience</h4><p class="muted pre-line">{}</p>"#,
            escape(experience)
        ));
    }
    sections.push_str(&format!(
        "<h4>Skills</h4>{}",
        chips(&candidate.all_skills(), "")
    ));

    let profile_link = candidate
        .profile_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<a class="link" href="{}" target="_blank" rel="noopener noreferrer">View LinkedIn Profile</a>"#,
                escape(url)
            )
        })
        .unwrap_or_else(|| "<span></span>".to_string());

    format!(
        r#"<div class="overlay" role="dialog" aria-modal="true">
<div class="modal">
<div class="modal-head"><h2>Candidate Profile</h2><a class="link" href="/search/candidates/{index}/close" aria-label="Close">&times;</a></div>
<div class="modal-body">
<div class="card-head">
{avatar}
<div>
<h3>{name}</h3>
{title}{company}{location}
</div>
</div>
{sections}
</div>
<div class="modal-foot">
{profile_link}
<div class="actions">
<a class="link" href="/search/candidates/{index}/profile.pdf">Download PDF</a>
<a class="button" href="/search/candidates/{index}/preview">Preview PDF</a>
</div>
</div>
</div>
</div>"#,
        avatar = avatar(candidate, true, &candidate.initial()),
        name = escape(&candidate.full_name),
        title = optional_line("p", "", &candidate.job_title),
        company = optional_line("p", "muted", &candidate.company),
        location = optional_line("p", "muted", &candidate.location),
    )
}

fn preview_modal(index: usize) -> String {
    format!(
        r#"<div class="overlay" role="dialog" aria-modal="true">
<div class="modal modal-wide">
<div class="modal-head"><h2>PDF Preview</h2>
<div class="actions">
<a class="link" href="/search/candidates/{index}/profile.pdf">Download PDF</a>
<a class="link" href="/search/candidates/{index}" aria-label="Close preview">&times;</a>
</div>
</div>
<iframe class="preview" src="/search/candidates/{index}/preview.pdf" title="PDF Preview"></iframe>
</div>
</div>"#
    )
}
