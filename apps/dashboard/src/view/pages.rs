//! Static pages: home, reports and the talent pool placeholder.

use crate::view::{layout, Head, NavItem};

struct Shortcut {
    title: &'static str,
    description: &'static str,
    href: &'static str,
    color: &'static str,
}

const SHORTCUTS: [Shortcut; 4] = [
    Shortcut {
        title: "Quick Search",
        description: "Search for candidates based on job requirements",
        href: "/search",
        color: "blue",
    },
    Shortcut {
        title: "Talent Pool",
        description: "View and manage your saved candidates",
        href: "/pool",
        color: "purple",
    },
    Shortcut {
        title: "Analytics",
        description: "View recruitment metrics and insights",
        href: "/reports",
        color: "green",
    },
    Shortcut {
        title: "Recent Searches",
        description: "Access your recent candidate searches",
        href: "/search",
        color: "orange",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Up,
    Down,
}

struct Stat {
    title: &'static str,
    value: &'static str,
    change: &'static str,
    trend: Trend,
}

const STATS: [Stat; 4] = [
    Stat {
        title: "Total Candidates",
        value: "2,547",
        change: "+12.5%",
        trend: Trend::Up,
    },
    Stat {
        title: "Average Match Score",
        value: "85.3%",
        change: "+3.2%",
        trend: Trend::Up,
    },
    Stat {
        title: "Time to Hire",
        value: "18 days",
        change: "-2.5 days",
        trend: Trend::Down,
    },
    Stat {
        title: "Success Rate",
        value: "92%",
        change: "+5.4%",
        trend: Trend::Up,
    },
];

const INSIGHTS: [(&str, [&str; 5]); 3] = [
    (
        "Most In-Demand Skills",
        ["React", "TypeScript", "Node.js", "AWS", "Python"],
    ),
    (
        "Top Job Categories",
        ["Full Stack", "Frontend", "DevOps", "Data Science", "Backend"],
    ),
    (
        "Trending Technologies",
        ["Next.js", "Rust", "GraphQL", "Kubernetes", "AI/ML"],
    ),
];

fn stat_tiles() -> String {
    STATS
        .iter()
        .map(|s| {
            let class = match s.trend {
                Trend::Up => "up",
                Trend::Down => "down",
            };
            format!(
                r#"<div class="tile"><h3>{}</h3><p><span class="value">{}</span><span class="{class}">{}</span></p></div>"#,
                s.title, s.value, s.change
            )
        })
        .collect()
}

pub fn home() -> String {
    let shortcuts: String = SHORTCUTS
        .iter()
        .map(|s| {
            format!(
                r#"<a class="shortcut" href="{}"><div class="swatch bg-{}"></div><h3>{}</h3><p class="muted">{}</p></a>"#,
                s.href, s.color, s.title, s.description
            )
        })
        .collect();

    let insights: String = INSIGHTS
        .iter()
        .map(|(title, items)| {
            let list: String = items.iter().map(|i| format!("<li>{i}</li>")).collect();
            format!(r#"<div class="panel"><h3>{title}</h3><ul class="muted">{list}</ul></div>"#)
        })
        .collect();

    let body = format!(
        r#"<div class="grid">{shortcuts}</div>
<div class="panel"><h2>Recruitment Overview</h2><div class="grid">{stats}</div></div>
<div class="grid">{insights}</div>"#,
        stats = stat_tiles(),
    );

    layout(Some(NavItem::Home), "Home", Head::default(), &body)
}

pub fn reports() -> String {
    let body = format!(
        r#"<div class="panel">
<h1>Analytics &amp; Reports</h1>
<div class="grid">{stats}</div>
</div>
<div class="panel notice">Detailed reports and advanced analytics features are coming soon. Stay tuned for more insights into your recruitment process.</div>"#,
        stats = stat_tiles(),
    );
    layout(Some(NavItem::Reports), "Reports", Head::default(), &body)
}

pub fn talent_pool() -> String {
    let body = r#"<div class="panel notice">
<h1>Under Construction</h1>
<p>We're working hard to bring you exciting new features. This section will be available soon with powerful tools to enhance your recruitment process.</p>
</div>"#;
    layout(Some(NavItem::Pool), "Talent Pool", Head::default(), body)
}
