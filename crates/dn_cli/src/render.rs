use dn_core::Summary;
use dn_view::{ActionKind, StatsView, ViewState};

pub fn rows(view: &ViewState) -> String {
    if view.show_empty_state() {
        return "No articles to show.\n".to_string();
    }
    let mut out = String::new();
    for (i, row) in view.rows().iter().enumerate() {
        let marker = match row.action.kind {
            ActionKind::View => "📖",
            ActionKind::Generate => "  ",
        };
        out.push_str(&format!("{:>3}. {} {}\n", i + 1, marker, row.title));
        out.push_str(&format!("       {}  ({})\n", row.url, row.created_at));
    }
    out
}

pub fn page_footer(view: &ViewState) -> String {
    let pagination = view.pagination();
    format!("Page {} of {}", pagination.current, pagination.total_pages.max(1))
}

pub fn summary(summary: &Summary) -> String {
    let mut out = format!("{}\n{}\n\n{}\n", summary.title, summary.article_url, summary.body);
    if !summary.keywords.is_empty() {
        out.push_str(&format!("\nKeywords: {}\n", summary.keywords.join(", ")));
    }
    if !summary.references.is_empty() {
        out.push_str("\nBible verses:\n");
        for reference in &summary.references {
            out.push_str(&format!("  - {}\n", reference));
        }
    }
    out
}

pub fn stats(stats: &StatsView) -> String {
    format!(
        "Total articles: {}\nLast updated: {}",
        stats.total_articles, stats.last_updated
    )
}
