//! Candidate records as returned by the matching service.
//!
//! The service encodes "not applicable" with string sentinels. Every record is
//! normalized here, once, so the rest of the crate only deals with `Option`.

use reqwest::Url;
use serde_json::Value;

/// Values the matching service uses in place of a missing field.
pub const ABSENCE_SENTINELS: &[&str] = &["N/A", "(None)", "None"];

/// Tokens dropped from the "All Skills" list on result cards.
pub const NOISE_SKILLS: &[&str] = &["Git", "JIRA"];

/// Display name used when the service omits `"Full Name"`.
pub const UNNAMED_CANDIDATE: &str = "Unnamed Candidate";

// Wire keys, exactly as the service sends them.
const KEY_FULL_NAME: &str = "Full Name";
const KEY_JOB_TITLE: &str = "Job Title";
const KEY_COMPANY: &str = "Company";
const KEY_LOCATION: &str = "Location";
const KEY_PROFILE_IMAGE: &str = "Profile Image";
const KEY_EXPERIENCE: &str = "Experience(Skills/Tools Used)";
const KEY_PROFILE_URL: &str = "LinkedIn URL";
const KEY_SKILLS: &str = "Skills";
const KEY_MATCHED_SKILLS: &str = "Matched Skills";
const KEY_MISSING_SKILLS: &str = "Missing Skills";
const KEY_SCORE: &str = "Score";
const KEY_MATCH_REASON: &str = "MatchedReason";
const KEY_FIT_INDICATOR: &str = "FitIndicator";

/// One matched profile. Immutable once normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub full_name: String,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// Absolute `http`/`https` URL only.
    pub profile_image: Option<String>,
    pub experience: Option<String>,
    /// Absolute `http`/`https` URL only.
    pub profile_url: Option<String>,
    /// Comma-delimited.
    pub skills: Option<String>,
    /// Newline-delimited.
    pub matched_skills: Option<String>,
    /// Newline-delimited.
    pub missing_skills: Option<String>,
    pub score: f64,
    pub match_reason: Option<String>,
    pub fit_indicator: Option<String>,
}

impl Candidate {
    /// Normalizes one element of the service's response array.
    ///
    /// Never fails: non-object elements and missing keys yield absent fields,
    /// and a missing or non-numeric score becomes `0`.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(field_text);

        Candidate {
            full_name: text(KEY_FULL_NAME).unwrap_or_else(|| UNNAMED_CANDIDATE.to_string()),
            job_title: text(KEY_JOB_TITLE),
            company: text(KEY_COMPANY),
            location: text(KEY_LOCATION),
            profile_image: web_url(text(KEY_PROFILE_IMAGE)),
            experience: text(KEY_EXPERIENCE),
            profile_url: web_url(text(KEY_PROFILE_URL)),
            skills: text(KEY_SKILLS),
            matched_skills: text(KEY_MATCHED_SKILLS),
            missing_skills: text(KEY_MISSING_SKILLS),
            score: value.get(KEY_SCORE).map(score_value).unwrap_or(0.0),
            match_reason: text(KEY_MATCH_REASON),
            fit_indicator: text(KEY_FIT_INDICATOR),
        }
    }

    /// Every listed skill, comma-split and trimmed.
    pub fn all_skills(&self) -> Vec<String> {
        self.skills.as_deref().map(split_commas).unwrap_or_default()
    }

    /// The "All Skills" list shown on result cards, with noise tokens removed.
    pub fn card_skills(&self) -> Vec<String> {
        self.skills.as_deref().map(filter_skills).unwrap_or_default()
    }

    /// `None` when the service reported no matched skills.
    pub fn matched_skill_list(&self) -> Option<Vec<String>> {
        self.matched_skills.as_deref().map(split_lines)
    }

    /// `None` when the service reported no missing skills.
    pub fn missing_skill_list(&self) -> Option<Vec<String>> {
        self.missing_skills.as_deref().map(split_lines)
    }

    /// First character of the name, for the avatar placeholder.
    pub fn initial(&self) -> String {
        self.full_name
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_default()
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score)
    }

    /// `Score: 92%`
    pub fn score_label(&self) -> String {
        format!("Score: {}%", format_score(self.score))
    }
}

/// Normalizes a whole response array, preserving order.
pub fn normalize_all(items: &[Value]) -> Vec<Candidate> {
    items.iter().map(Candidate::from_value).collect()
}

fn field_text(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    normalize_field(&raw)
}

/// Maps absence sentinels and blank strings to `None`.
pub fn normalize_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || ABSENCE_SENTINELS.contains(&trimmed) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Keeps a link only when it parses as an absolute `http` or `https` URL.
fn web_url(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(trimmed.to_string()),
        _ => None,
    }
}

fn score_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Renders a score without a trailing `.0` for whole numbers.
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}

fn split_commas(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-splits, trims, and drops blanks and [`NOISE_SKILLS`].
pub fn filter_skills(raw: &str) -> Vec<String> {
    split_commas(raw)
        .into_iter()
        .filter(|s| !NOISE_SKILLS.contains(&s.as_str()))
        .collect()
}

/// Color bucket of a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    Red,
    Orange,
    Yellow,
    Green,
}

impl ScoreBand {
    /// `≥90` green, `≥70` yellow, `≥50` orange, anything else (NaN included) red.
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            ScoreBand::Green
        } else if score >= 70.0 {
            ScoreBand::Yellow
        } else if score >= 50.0 {
            ScoreBand::Orange
        } else {
            ScoreBand::Red
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBand::Green => "badge badge-green",
            ScoreBand::Yellow => "badge badge-yellow",
            ScoreBand::Orange => "badge badge-orange",
            ScoreBand::Red => "badge badge-red",
        }
    }
}
