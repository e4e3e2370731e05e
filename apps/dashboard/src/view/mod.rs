//! Server-rendered HTML.
//!
//! Every page shares one shell: the sidebar navigation plus a main column.
//! All interpolated text goes through [`escape`].

pub mod pages;
pub mod search;

use axum::http::StatusCode;

/// Sidebar entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Home,
    Search,
    Pool,
    Reports,
}

impl NavItem {
    pub const ALL: [NavItem; 4] = [NavItem::Home, NavItem::Search, NavItem::Pool, NavItem::Reports];

    pub fn href(self) -> &'static str {
        match self {
            NavItem::Home => "/",
            NavItem::Search => "/search",
            NavItem::Pool => "/pool",
            NavItem::Reports => "/reports",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavItem::Home => "Home",
            NavItem::Search => "Candidate Search",
            NavItem::Pool => "Talent Pool",
            NavItem::Reports => "Reports",
        }
    }

    fn accent(self) -> &'static str {
        match self {
            NavItem::Home | NavItem::Search => "blue",
            NavItem::Pool => "purple",
            NavItem::Reports => "green",
        }
    }
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Extra `<head>` content for a page.
#[derive(Debug, Default, Clone, Copy)]
pub struct Head {
    /// Seconds until the browser reloads the page.
    pub refresh_secs: Option<u32>,
}

/// Wraps `body` in the document shell with `active` highlighted.
pub fn layout(active: Option<NavItem>, title: &str, head: Head, body: &str) -> String {
    let refresh = head
        .refresh_secs
        .map(|s| format!(r#"<meta http-equiv="refresh" content="{s}">"#))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}<title>{title} · Talent Assistant</title>
<style>{STYLE}</style>
</head>
<body>
<div class="shell">
{sidebar}
<main class="content">
{body}
</main>
</div>
</body>
</html>
"#,
        title = escape(title),
        sidebar = sidebar(active),
    )
}

fn sidebar(active: Option<NavItem>) -> String {
    let links: String = NavItem::ALL
        .iter()
        .map(|item| {
            let current = if Some(*item) == active {
                r#" current" aria-current="page"#
            } else {
                ""
            };
            format!(
                r#"<a class="nav-link text-{accent}{current}" href="{href}">{label}</a>"#,
                accent = item.accent(),
                href = item.href(),
                label = item.label(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<aside class="sidebar">
<div class="brand">Talent Assistant</div>
<nav>
{links}
</nav>
</aside>"#
    )
}

/// Full page shown for an `AppError`.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<div class="panel error-page">
<h1>{code} {heading}</h1>
<p>{message}</p>
<a class="link" href="/search">Back to Candidate Search</a>
</div>"#,
        code = status.as_u16(),
        message = escape(message),
    );
    layout(None, heading, Head::default(), &body)
}

const STYLE: &str = r#"
*{box-sizing:border-box}body{margin:0;font-family:system-ui,-apple-system,sans-serif;background:#f3f4f6;color:#111827}
.shell{display:flex;min-height:100vh}.sidebar{width:16rem;background:#fff;box-shadow:0 1px 6px rgba(0,0,0,.1)}
.brand{padding:1.5rem;font-size:1.5rem;font-weight:700}.nav-link{display:block;padding:.75rem 1.5rem;font-size:.875rem;font-weight:500;text-decoration:none;opacity:.6}
.nav-link:hover,.nav-link.current{opacity:1;background:#f9fafb}.nav-link.current{border-right:4px solid currentColor}
.text-blue{color:#3b82f6}.text-purple{color:#a855f7}.text-green{color:#22c55e}
.content{flex:1;padding:1.5rem;overflow:auto}.panel{background:#fff;border-radius:1rem;box-shadow:0 4px 12px rgba(0,0,0,.08);padding:2rem;margin-bottom:2rem}
.grid{display:grid;gap:1.5rem;grid-template-columns:repeat(auto-fit,minmax(14rem,1fr))}.grid-2{display:grid;gap:1.5rem;grid-template-columns:repeat(auto-fit,minmax(26rem,1fr))}
.tile{background:#f9fafb;border-radius:.75rem;padding:1.5rem}.shortcut{display:block;background:#fff;border-radius:.75rem;box-shadow:0 4px 12px rgba(0,0,0,.08);padding:1.5rem;text-decoration:none;color:inherit}
.swatch{width:3rem;height:3rem;border-radius:.5rem;margin-bottom:1rem}.bg-blue{background:#3b82f6}.bg-purple{background:#a855f7}.bg-green{background:#22c55e}.bg-orange{background:#f97316}
.up{color:#16a34a}.down{color:#dc2626}.value{font-size:1.5rem;font-weight:700;margin-right:.5rem}
label{display:block;font-size:.875rem;font-weight:500;margin:1rem 0 .5rem}input,textarea{width:100%;padding:.5rem 1rem;border:1px solid #d1d5db;border-radius:.5rem;font:inherit}
button,.button{display:inline-block;background:#3b82f6;color:#fff;font-weight:600;border:0;border-radius:.5rem;padding:.75rem 1.5rem;text-decoration:none;cursor:pointer}
button:disabled{opacity:.5}.submit{width:100%;margin-top:1.5rem}.link{color:#3b82f6;font-weight:500;text-decoration:none}
.banner{background:#fef2f2;border:1px solid #fecaca;color:#991b1b;border-radius:.75rem;padding:1rem;margin-bottom:2rem}
.notice{text-align:center;color:#6b7280;padding:2rem}.loading{text-align:center;color:#3b82f6;padding:2rem}
.card{background:#fff;border-radius:.75rem;box-shadow:0 4px 12px rgba(0,0,0,.08);display:flex;flex-direction:column}.card-body{padding:1.5rem;flex:1}
.card-head{display:flex;gap:1rem;align-items:flex-start}.card-id{flex:1;min-width:0}.card-score{text-align:right}.card-foot{border-top:1px solid #f3f4f6;padding:1rem 1.5rem;background:#f9fafb}
.avatar{width:4rem;height:4rem;border-radius:50%;object-fit:cover;background:#dbeafe;color:#3b82f6;display:flex;align-items:center;justify-content:center;font-size:1.5rem}
.avatar-lg{width:6rem;height:6rem;font-size:2rem}.muted{color:#6b7280}
.badge{display:inline-block;padding:.25rem .75rem;border-radius:9999px;font-size:.875rem;font-weight:500}
.badge-green{background:#dcfce7;color:#166534}.badge-yellow{background:#fef9c3;color:#854d0e}.badge-orange{background:#ffedd5;color:#9a3412}.badge-red{background:#fee2e2;color:#991b1b}
.chips{display:flex;flex-wrap:wrap;gap:.5rem}.chip{padding:.25rem .75rem;border-radius:9999px;font-size:.875rem;background:#f3f4f6;color:#1f2937}
.chip-matched{background:#dcfce7;color:#166534}.chip-missing{background:#fee2e2;color:#991b1b}
.overlay{position:fixed;inset:0;background:rgba(0,0,0,.5);display:flex;align-items:center;justify-content:center;padding:1rem}
.modal{background:#fff;border-radius:.75rem;width:100%;max-width:48rem;height:90vh;display:flex;flex-direction:column}.modal-wide{max-width:56rem}
.modal-head{display:flex;justify-content:space-between;align-items:center;padding:1.5rem;border-bottom:1px solid #e5e7eb}.modal-body{flex:1;overflow-y:auto;padding:1.5rem}
.modal-foot{display:flex;justify-content:space-between;align-items:center;padding:1.5rem;border-top:1px solid #f3f4f6;background:#f9fafb}
.pre-line{white-space:pre-line}.preview{flex:1;border:0;width:100%}.actions{display:flex;gap:1rem;align-items:center}
"#;
