//! HTML -> readable main text.
//!
//! This is intentionally "good enough" and deterministic, not a full
//! readability engine: score candidate containers by non-link text density,
//! fall back to a flat text conversion of the whole document.

use scraper::{ElementRef, Html, Selector};
use std::io::Cursor;

// Stop scanning pathological documents after this many candidates.
const ELEMENT_SCAN_CAP: usize = 20_000;

fn norm_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_any_text(s: &str) -> bool {
    s.chars().any(|c| !c.is_whitespace())
}

fn class_or_id_lc(el: &ElementRef) -> String {
    let mut out = String::new();
    if let Some(c) = el.value().attr("class") {
        out.push_str(c);
        out.push(' ');
    }
    if let Some(i) = el.value().attr("id") {
        out.push_str(i);
    }
    out.to_ascii_lowercase()
}

fn is_boilerplate_container(el: &ElementRef) -> bool {
    // Structural UI words only; no site-specific heuristics.
    let s = class_or_id_lc(el);
    if s.is_empty() {
        return false;
    }
    [
        "nav", "navbar", "menu", "sidebar", "footer", "header", "banner", "cookie", "consent",
        "ads", "advert", "promo", "subscribe", "newsletter", "comment",
    ]
    .iter()
    .any(|bad| s.contains(bad))
}

fn text_chars(el: &ElementRef) -> usize {
    el.text().map(|t| t.chars().count()).sum()
}

fn link_text_chars(el: &ElementRef) -> usize {
    let Ok(sel) = Selector::parse("a") else {
        return 0;
    };
    el.select(&sel)
        .map(|a| a.text().map(|t| t.chars().count()).sum::<usize>())
        .sum()
}

fn pick_main_text(html: &str) -> Option<String> {
    let Ok(sel) = Selector::parse("article, main, section, div") else {
        return None;
    };
    let doc = Html::parse_document(html);

    let mut best_score: i64 = 0;
    let mut best: Option<String> = None;
    for (seen, el) in doc.select(&sel).enumerate() {
        if seen >= ELEMENT_SCAN_CAP {
            break;
        }
        if is_boilerplate_container(&el) {
            continue;
        }
        let txt = text_chars(&el) as i64;
        if txt < 20 {
            continue;
        }
        // Dense non-link text wins; link text is usually navigation.
        let links = link_text_chars(&el) as i64;
        let mut score = txt - 2 * links;
        match el.value().name() {
            "article" => score += 500,
            "main" => score += 300,
            _ => {}
        }
        if links > txt / 2 {
            score -= 500;
        }
        if score > best_score {
            best_score = score;
            best = Some(norm_ws(&el.text().collect::<Vec<_>>().join(" ")));
        }
    }
    best.filter(|t| has_any_text(t))
}

/// Extract readable main text from an HTML document.
///
/// Returns an empty string when nothing useful can be extracted; callers
/// treat that as "this page contributes no context".
pub fn extract_main_text(html: &str) -> String {
    if !has_any_text(html) {
        return String::new();
    }
    if let Some(text) = pick_main_text(html) {
        return text;
    }
    let flat = html2text::from_read(Cursor::new(html.as_bytes()), 80).unwrap_or_default();
    let flat = norm_ws(&flat);
    if has_any_text(&flat) {
        flat
    } else {
        String::new()
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_article_body_over_navigation() {
        let html = r#"
        <html><body>
          <div class="navbar"><a href="/a">Home</a><a href="/b">Docs</a><a href="/c">About</a></div>
          <article>
            <p>Layer of protection analysis is a semi-quantitative risk assessment
            technique used in the process industries to evaluate safeguards.</p>
          </article>
          <div class="footer">Copyright notice and many legal words go here.</div>
        </body></html>
        "#;
        let text = extract_main_text(html);
        assert!(text.contains("Layer of protection analysis"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("Home"));
    }

    #[test]
    fn link_heavy_blocks_lose_to_prose() {
        let prose = "Plain explanatory prose about the topic at hand. ".repeat(5);
        let html = format!(
            r#"<html><body>
              <div><a href="/1">one</a> <a href="/2">two</a> <a href="/3">three four five six seven eight nine ten</a></div>
              <div><p>{prose}</p></div>
            </body></html>"#
        );
        let text = extract_main_text(&html);
        assert!(text.contains("explanatory prose"));
    }

    #[test]
    fn falls_back_to_flat_conversion_when_no_container_scores() {
        // No article/main/section/div at all.
        let html = "<html><body><p>short but present</p></body></html>";
        let text = extract_main_text(html);
        assert!(text.contains("short but present"));
    }

    #[test]
    fn empty_or_whitespace_input_yields_empty() {
        assert_eq!(extract_main_text(""), "");
        assert_eq!(extract_main_text("   \n\t  "), "");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
