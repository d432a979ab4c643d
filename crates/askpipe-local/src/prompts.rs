//! Prompt assembly: a fixed system instruction plus a user prompt built
//! from the query and the gathered context. Pure, no side effects.

use askpipe_core::PageContent;

pub const SYSTEM_PROMPT: &str = "\
You are a concise technical research assistant.
You must answer using the provided web content when it exists.
If web content is insufficient, say so clearly and mark which parts are assumptions.
Always respond in markdown with the following sections:

## TL;DR (2\u{2013}4 bullet points)

## Explanation

## Key Points (bulleted)

## Sources (numbered list of URLs with short labels)";

/// Build the user prompt for `query` over `pages` (1-based, input order).
///
/// With no pages, the prompt says so and asks for a general-knowledge
/// answer in the same four-section structure.
pub fn build_user_prompt(query: &str, pages: &[PageContent]) -> String {
    let mut parts = vec![format!("User question:\n{query}\n")];

    if pages.is_empty() {
        parts.push(
            "No web content provided. Answer using your general knowledge and \
             write a structured answer in markdown with the specified sections."
                .to_string(),
        );
    } else {
        parts.push("Web results:\n".to_string());
        for (i, page) in pages.iter().enumerate() {
            parts.push(format!(
                "[{}] Title: {}\nURL: {}\nContent:\n{}\n\n",
                i + 1,
                page.title,
                page.url,
                page.text
            ));
        }
        parts.push(
            "Using only the information above (and general knowledge only when absolutely \
             needed), write a structured answer in markdown with the specified sections."
                .to_string(),
        );
    }

    parts.join("\n")
}
