//! Terminal and JSON rendering of the answer markdown.
//!
//! The terminal form splits on `## ` headings and draws one bordered,
//! accent-colored panel per recognized section. Unrecognized headings are
//! dropped, a known fragility: content under a heading the backend invents
//! is lost. The JSON form carries the markdown untouched.

use askpipe_core::{PageContent, SearchResult};

// One-shot ANSI styling; no TUI.
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// The four recognized section titles, matched case-sensitively.
fn accent_for(title: &str) -> Option<&'static str> {
    match title {
        "TL;DR" => Some(CYAN),
        "Explanation" => Some(GREEN),
        "Key Points" => Some(YELLOW),
        "Sources" => Some(MAGENTA),
        _ => None,
    }
}

/// A bordered block. Body lines must be plain text: widths are computed in
/// characters, so embedded escape codes would skew the right border.
fn panel(label: &str, accent: &'static str, body: &str) -> String {
    let label_len = label.chars().count();
    let content_width = body
        .lines()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(label_len + 2);

    let mut out = String::new();
    out.push_str(&format!(
        "{accent}\u{256d}\u{2500} {BOLD}{label}{RESET}{accent} {}\u{256e}{RESET}\n",
        "\u{2500}".repeat(content_width - label_len - 1)
    ));
    for line in body.lines() {
        let pad = content_width - line.chars().count();
        out.push_str(&format!(
            "{accent}\u{2502}{RESET} {line}{} {accent}\u{2502}{RESET}\n",
            " ".repeat(pad)
        ));
    }
    out.push_str(&format!(
        "{accent}\u{2570}{}\u{256f}{RESET}",
        "\u{2500}".repeat(content_width + 2)
    ));
    out
}

/// Render the answer markdown as accent-colored terminal panels, in the
/// order the sections appear in the source text.
pub fn render_markdown(markdown: &str) -> String {
    let mut blocks = Vec::new();
    for chunk in markdown.split("## ") {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let (title, body) = match chunk.split_once('\n') {
            Some((t, b)) => (t.trim(), b.trim()),
            None => (chunk, ""),
        };
        let Some(accent) = accent_for(title) else {
            continue;
        };
        blocks.push(panel(&format!(">> {title} <<"), accent, body));
    }
    blocks.join("\n\n")
}

/// `{"answer": <unmodified markdown>, "sources": [{"title","url"}...]}`,
/// sources in input order, snippets dropped.
pub fn to_json(answer: &str, sources: &[SearchResult]) -> serde_json::Result<String> {
    let sources: Vec<serde_json::Value> = sources
        .iter()
        .map(|r| serde_json::json!({ "title": r.title, "url": r.url }))
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "answer": answer,
        "sources": sources,
    }))
}

pub fn header(provider: &str, with_web: bool) -> String {
    let mut out = format!(
        "{BOLD}{MAGENTA}askpipe{RESET}{DIM} | {RESET}{BOLD}{CYAN}web-grounded Q&A{RESET}"
    );
    if with_web {
        out.push_str(&format!("{GREEN} with web search{RESET}"));
    }
    out.push_str(&format!(
        "{BOLD}{YELLOW} [{}]{RESET}",
        provider.to_uppercase()
    ));
    out
}

pub fn error_line(e: &anyhow::Error) -> String {
    format!("{BOLD}{RED}Error:{RESET} {e}")
}

/// Search-result table and extraction summary shown under `--debug`.
pub fn debug_report(results: &[SearchResult], pages: &[PageContent]) -> String {
    let mut blocks = Vec::new();

    if !results.is_empty() {
        let rows = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{:>2}. {}\n    {}", i + 1, r.title, r.url))
            .collect::<Vec<_>>()
            .join("\n");
        blocks.push(panel(">> Search Results <<", MAGENTA, &rows));
    }

    if pages.is_empty() {
        blocks.push(panel(
            ">> Content Extracted <<",
            YELLOW,
            "No content extracted from web sources",
        ));
    } else {
        let body = pages
            .iter()
            .map(|p| format!("* {} ({} chars)", p.title, p.text.chars().count()))
            .collect::<Vec<_>>()
            .join("\n");
        blocks.push(panel(">> Content Extracted <<", GREEN, &body));
    }

    blocks.join("\n\n")
}
