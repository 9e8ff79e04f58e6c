//! HTML rendering of the view state.
//!
//! Every value that came from the backend goes through [`html_escape`]
//! before it reaches the page.

use dn_view::{
    ActionKind, BannerKind, PageItem, RowView, StatsView, StatusBanner, SummaryOverlay, ViewState,
};

/// Full page for the current view.
pub fn page(view: &ViewState) -> String {
    let content = format!(
        "{}{}{}{}{}",
        banner(view.banner()),
        loading(view.is_loading()),
        article_list(view),
        pagination(&view.page_controls()),
        view.overlay().map(overlay).unwrap_or_default(),
    );
    base_template(&toolbar(view), STATS_FRAME, &content)
}

pub fn base_template(toolbar: &str, stats: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Daniel News Digest</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="top">
        <h1><a href="/">Daniel News Digest</a></h1>
        {}
        {}
    </header>
    <main>
        {}
    </main>
</body>
</html>"#,
        stats, toolbar, content
    )
}

fn toolbar(view: &ViewState) -> String {
    let check_label = if view.is_checking() { "Checking..." } else { "🔄 Check new articles" };
    let bulk_label = if view.is_bulk_generating() { "Generating..." } else { "🤖 Generate summaries" };
    format!(
        r#"
        <div class="toolbar">
            <form method="post" action="/check"><button class="btn btn-primary"{}>{}</button></form>
            <form method="post" action="/summarize"><button class="btn btn-primary"{}>{}</button></form>
        </div>"#,
        disabled_attr(view.is_checking()),
        check_label,
        disabled_attr(view.is_bulk_generating()),
        bulk_label
    )
}

/// The page shows the stats through `/stats`, which reloads itself so the
/// poller's updates reach the browser without touching the article list.
const STATS_FRAME: &str =
    r#"<iframe id="stats-frame" class="stats-frame" src="/stats" title="Article statistics"></iframe>"#;

/// Standalone document served at `/stats`, refreshed every `refresh_secs`.
pub fn stats_document(view: &StatsView, refresh_secs: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta http-equiv="refresh" content="{}">
    <link rel="stylesheet" href="/static/style.css">
</head>
<body class="stats-document">{}
</body>
</html>"#,
        refresh_secs.max(1),
        stats(view)
    )
}

/// The two stats fields.
pub fn stats(stats: &StatsView) -> String {
    format!(
        r#"
        <div id="stats" class="stats">
            <span>Total articles: <strong id="total-count">{}</strong></span>
            <span>Last updated: <strong id="last-updated">{}</strong></span>
        </div>"#,
        html_escape(&stats.total_articles),
        html_escape(&stats.last_updated)
    )
}

fn banner(banner: Option<&StatusBanner>) -> String {
    let Some(banner) = banner else {
        return String::new();
    };
    let class = match banner.kind {
        BannerKind::Success => "status-success",
        BannerKind::Error => "status-error",
    };
    format!(
        r#"<div id="status-message" class="status-message {}">{}</div>"#,
        class,
        html_escape(&banner.text)
    )
}

fn loading(active: bool) -> &'static str {
    if active {
        r#"<div id="loading" class="loading">Loading...</div>"#
    } else {
        ""
    }
}

fn article_list(view: &ViewState) -> String {
    if view.show_empty_state() {
        return r#"<div id="no-articles" class="no-articles">No articles to show.</div>"#.to_string();
    }
    let rows: String = view.rows().iter().map(article_row).collect();
    format!(r#"<ul id="article-list" class="article-list">{}</ul>"#, rows)
}

pub fn article_row(row: &RowView) -> String {
    format!(
        r#"
        <li class="article-item">
            <div class="article-title">{}</div>
            <a href="{}" target="_blank" rel="noopener noreferrer" class="article-link">Read article →</a>
            <div class="article-meta">Saved: {}</div>
            {}
        </li>"#,
        html_escape(&row.title),
        html_escape(&row.url),
        html_escape(&row.created_at),
        action(row)
    )
}

fn action(row: &RowView) -> String {
    let label = row.action.label();
    if row.action.disabled() {
        return format!(r#"<button class="btn summary-btn" disabled>{}</button>"#, label);
    }
    match row.action.kind {
        ActionKind::Generate => format!(
            r#"<form method="post" action="/articles/summarize" class="summary-form"><input type="hidden" name="url" value="{}"><button class="btn btn-outline summary-btn">{}</button></form>"#,
            html_escape(&row.url),
            label
        ),
        ActionKind::View => format!(
            r#"<a class="btn btn-secondary summary-btn" href="/articles/summary?url={}">{}</a>"#,
            html_escape(&urlencoding::encode(&row.url)),
            label
        ),
    }
}

fn pagination(items: &[PageItem]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let links: String = items
        .iter()
        .map(|item| match *item {
            PageItem::Previous { target, disabled } => page_link(target, "‹ Previous", disabled, false),
            PageItem::Next { target, disabled } => page_link(target, "Next ›", disabled, false),
            PageItem::Page { number, active } => page_link(number, &number.to_string(), false, active),
            PageItem::Ellipsis => r#"<span class="ellipsis">…</span>"#.to_string(),
        })
        .collect();
    format!(r#"<nav class="pagination">{}</nav>"#, links)
}

fn page_link(target: u32, label: &str, disabled: bool, active: bool) -> String {
    if active {
        return format!(r#"<span class="page-link active">{}</span>"#, label);
    }
    if disabled {
        return format!(r#"<span class="page-link disabled">{}</span>"#, label);
    }
    format!(r#"<a class="page-link" href="/page/{}">{}</a>"#, target, label)
}

/// The summary overlay. The backdrop is its own link so that clicks inside
/// the content box never reach it.
pub fn overlay(overlay: &SummaryOverlay) -> String {
    format!(
        r#"
        <div class="overlay" role="dialog">
            <a class="overlay-backdrop" href="/overlay/dismiss?target=background" aria-label="Close"></a>
            <div class="overlay-content">
                <a class="overlay-close" href="/overlay/dismiss?target=close">×</a>
                <h2 class="summary-title">{}</h2>
                <div class="summary-body">{}</div>
                <h3>Keywords</h3>
                <ul class="keywords">{}</ul>
                <h3>Bible verses</h3>
                <ul class="references">{}</ul>
                <a href="{}" target="_blank" rel="noopener noreferrer">Read the original article →</a>
            </div>
        </div>"#,
        html_escape(&overlay.title),
        html_escape(&overlay.body),
        list_items(&overlay.keywords),
        list_items(&overlay.references),
        html_escape(&overlay.article_url)
    )
}

fn list_items(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("<li>{}</li>", html_escape(v)))
        .collect()
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

/// Escape text for element content and double- or single-quoted attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub const CSS: &str = r#"
:root {
    --bg: #fff;
    --text: #222;
    --text-muted: #666;
    --link: #0066cc;
    --border: #ddd;
    --success: #e6f4ea;
    --error: #fce8e6;
}

* { box-sizing: border-box; }

body {
    font-family: -apple-system, 'Segoe UI', sans-serif;
    background: var(--bg);
    color: var(--text);
    margin: 0 auto;
    max-width: 860px;
    padding: 1rem;
    line-height: 1.5;
}

a { color: var(--link); text-decoration: none; }
header h1 a { color: var(--text); }

.toolbar { display: flex; gap: 0.5rem; margin: 0.5rem 0; }
.toolbar form, .summary-form { display: inline; }
.stats { display: flex; gap: 1.5rem; color: var(--text-muted); }
.stats-frame { border: 0; width: 100%; height: 2rem; }
.stats-document { margin: 0; padding: 0; max-width: none; }

.btn { padding: 0.35rem 0.8rem; border: 1px solid var(--border); border-radius: 4px; background: #f7f7f7; cursor: pointer; }
.btn[disabled] { opacity: 0.6; cursor: default; }
.btn-primary { background: var(--link); color: #fff; border-color: var(--link); }

.status-message { padding: 0.6rem 1rem; border-radius: 4px; margin: 0.5rem 0; }
.status-success { background: var(--success); }
.status-error { background: var(--error); }
.loading, .no-articles { color: var(--text-muted); padding: 1rem 0; }

.article-list { list-style: none; padding: 0; }
.article-item { border-bottom: 1px solid var(--border); padding: 0.8rem 0; }
.article-title { font-weight: bold; }
.article-meta { color: var(--text-muted); font-size: 0.85rem; }

.pagination { display: flex; gap: 0.4rem; justify-content: center; margin: 1rem 0; }
.page-link { padding: 0.2rem 0.6rem; border: 1px solid var(--border); border-radius: 4px; }
.page-link.active { background: var(--link); color: #fff; }
.page-link.disabled, .ellipsis { color: var(--text-muted); }

.overlay { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; }
.overlay-backdrop { position: absolute; inset: 0; background: rgba(0, 0, 0, 0.5); }
.overlay-content { position: relative; background: var(--bg); max-width: 640px; max-height: 80vh; overflow-y: auto; padding: 1.5rem; border-radius: 6px; }
.overlay-close { position: absolute; top: 0.5rem; right: 0.8rem; font-size: 1.4rem; color: var(--text); }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use dn_core::{Article, ArticlePage, Summary};
    use scraper::{Html, Selector};

    const XSS: &str = "<script>alert(1)</script>";

    fn view_with(title: &str, summary: Option<Summary>, total_pages: u32) -> ViewState {
        let mut view = ViewState::new(10);
        let generation = view.begin_page_load();
        view.end_busy();
        let listing = ArticlePage {
            articles: vec![Article {
                url: "https://a/1?x=\"y\"".to_string(),
                title: title.to_string(),
                created_at: "2025-03-01 09:30:00".to_string(),
            }],
            total_pages,
        };
        view.apply_page(generation, 1, listing, Some(summary.into_iter().collect()));
        view
    }

    fn hostile_summary() -> Summary {
        Summary {
            article_url: "https://a/1?x=\"y\"".to_string(),
            title: XSS.to_string(),
            body: XSS.to_string(),
            keywords: vec![XSS.to_string()],
            references: vec![XSS.to_string()],
        }
    }

    fn select_text(document: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_row_fields_are_escaped() {
        let mut view = view_with(XSS, None, 1);
        view.set_error(XSS);
        let document = Html::parse_document(&page(&view));

        assert_eq!(document.select(&Selector::parse("script").unwrap()).count(), 0);
        assert_eq!(select_text(&document, ".article-title"), vec![XSS.to_string()]);
        assert_eq!(select_text(&document, "#status-message"), vec![XSS.to_string()]);

        let link = Selector::parse("a.article-link").unwrap();
        let href = document.select(&link).next().unwrap().value().attr("href").unwrap();
        assert_eq!(href, "https://a/1?x=\"y\"");
    }

    #[test]
    fn test_overlay_fields_are_escaped() {
        let mut view = view_with("Plain", Some(hostile_summary()), 1);
        view.show_summary(hostile_summary());
        let document = Html::parse_document(&page(&view));

        assert_eq!(document.select(&Selector::parse("script").unwrap()).count(), 0);
        assert_eq!(select_text(&document, ".summary-title"), vec![XSS.to_string()]);
        assert_eq!(select_text(&document, ".summary-body"), vec![XSS.to_string()]);
        assert_eq!(select_text(&document, ".keywords li"), vec![XSS.to_string()]);
        assert_eq!(select_text(&document, ".references li"), vec![XSS.to_string()]);
    }

    #[test]
    fn test_row_actions() {
        let view = view_with("Plain", None, 1);
        let document = Html::parse_document(&page(&view));
        let input = Selector::parse("form.summary-form input[name=url]").unwrap();
        let value = document.select(&input).next().unwrap().value().attr("value").unwrap();
        assert_eq!(value, "https://a/1?x=\"y\"");

        let view = view_with("Plain", Some(hostile_summary()), 1);
        let html = page(&view);
        assert!(html.contains("📖 View summary"));
        assert!(html.contains("/articles/summary?url=https%3A%2F%2Fa%2F1%3Fx%3D%22y%22"));
    }

    #[test]
    fn test_pagination_markup() {
        let html = pagination(&dn_view::page_window(10, 20));
        let document = Html::parse_fragment(&html);
        assert_eq!(select_text(&document, ".page-link.active"), vec!["10".to_string()]);
        assert_eq!(select_text(&document, ".ellipsis").len(), 2);
        assert!(html.contains(r#"href="/page/9">‹ Previous"#));
        assert!(html.contains(r#"href="/page/20">20"#));

        assert!(pagination(&dn_view::page_window(1, 1)).is_empty());
    }

    #[test]
    fn test_empty_state_and_stats() {
        let mut view = ViewState::new(10);
        let generation = view.begin_page_load();
        view.fail_page(generation, "Failed to load articles.".to_string());
        let document = Html::parse_document(&page(&view));
        assert_eq!(select_text(&document, "#no-articles").len(), 1);
        let frame = Selector::parse("iframe#stats-frame").unwrap();
        let src = document.select(&frame).next().unwrap().value().attr("src").unwrap();
        assert_eq!(src, "/stats");

        let document = Html::parse_document(&stats_document(view.stats(), 30));
        assert_eq!(select_text(&document, "#total-count"), vec!["-".to_string()]);
        assert_eq!(select_text(&document, "#last-updated"), vec!["-".to_string()]);
        let refresh = Selector::parse(r#"meta[http-equiv="refresh"]"#).unwrap();
        let content = document.select(&refresh).next().unwrap().value().attr("content").unwrap();
        assert_eq!(content, "30");
    }
}
