//! User-facing text for every path through the session manager.

use knowbot_core::{Article, ProviderError, SearchHit, truncate_chars};

pub const MEMORY_CLEARED: &str = "Memory cleared.";
pub const NO_SEARCH_RESULTS: &str = "No search results found.";
pub const ARTICLE_NOT_FOUND: &str = "No Wikipedia article found.";
pub const SEARCH_UNAVAILABLE: &str = "Search module not available.";
pub const WIKI_UNAVAILABLE: &str = "Wikipedia module not available.";

const ELLIPSIS: &str = "...";
const SNIPPET_CHARS: usize = 150;
const SUMMARY_CHARS: usize = 500;
const ERROR_CHARS: usize = 100;

pub fn search_results(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_SEARCH_RESULTS.to_string();
    }

    let mut out = String::from("**Search Results:**\n\n");
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!(
            "**{}. {}**\n{}{ELLIPSIS}\n\n",
            i + 1,
            hit.title,
            truncate_chars(&hit.body, SNIPPET_CHARS)
        ));
    }
    out
}

pub fn article(article: &Article) -> String {
    format!(
        "**Wikipedia: {}**\n\n{}{ELLIPSIS}",
        article.title,
        truncate_chars(&article.summary, SUMMARY_CHARS)
    )
}

pub fn chat_error(err: &ProviderError) -> String {
    format!(
        "Sorry, I encountered an issue. Error: {}",
        error_head(err)
    )
}

pub fn search_error(err: &ProviderError) -> String {
    format!("Search error: {}", error_head(err))
}

pub fn wiki_error(err: &ProviderError) -> String {
    format!("Wikipedia error: {}", error_head(err))
}

fn error_head(err: &ProviderError) -> String {
    truncate_chars(&err.to_string(), ERROR_CHARS).to_string()
}
