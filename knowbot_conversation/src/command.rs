const CLEAR_KEYWORD: &str = "clear";
const SEARCH_MARKER: &str = "search:";
const WIKI_MARKER: &str = "wiki:";

/// What a line of user input asks the assistant to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Forget the conversation so far.
    Clear,
    /// Web search with the trimmed query.
    Search(&'a str),
    /// Encyclopedia lookup with the trimmed term.
    Wiki(&'a str),
    /// Ordinary chat turn carrying the input as given.
    Chat(&'a str),
}

impl<'a> Command<'a> {
    /// Classify raw input.
    ///
    /// The input is trimmed before matching. Keywords and markers are
    /// case-insensitive and only count at the very start; `search:` later in
    /// the text is plain chat.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();

        if trimmed.eq_ignore_ascii_case(CLEAR_KEYWORD) {
            return Self::Clear;
        }
        if let Some(query) = strip_marker(trimmed, SEARCH_MARKER) {
            return Self::Search(query);
        }
        if let Some(term) = strip_marker(trimmed, WIKI_MARKER) {
            return Self::Wiki(term);
        }
        Self::Chat(raw)
    }
}

fn strip_marker<'a>(input: &'a str, marker: &str) -> Option<&'a str> {
    let head = input.get(..marker.len())?;
    head.eq_ignore_ascii_case(marker)
        .then(|| input[marker.len()..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keyword_any_case() {
        assert_eq!(Command::parse("clear"), Command::Clear);
        assert_eq!(Command::parse("  CLEAR \n"), Command::Clear);
        assert_eq!(
            Command::parse("clear the table"),
            Command::Chat("clear the table")
        );
    }

    #[test]
    fn search_marker_is_trimmed() {
        assert_eq!(
            Command::parse("search: rust programming"),
            Command::Search("rust programming")
        );
        assert_eq!(Command::parse("  search:  rust  "), Command::Search("rust"));
        assert_eq!(Command::parse("SEARCH:tokio"), Command::Search("tokio"));
    }

    #[test]
    fn wiki_marker_is_trimmed() {
        assert_eq!(
            Command::parse("wiki: Alan Turing"),
            Command::Wiki("Alan Turing")
        );
        assert_eq!(Command::parse("Wiki:Rust"), Command::Wiki("Rust"));
    }

    #[test]
    fn marker_later_in_text_is_chat() {
        assert_eq!(
            Command::parse("what does wiki: mean"),
            Command::Chat("what does wiki: mean")
        );
        assert_eq!(
            Command::parse("please search: cats"),
            Command::Chat("please search: cats")
        );
    }

    #[test]
    fn empty_marker_yields_empty_query() {
        assert_eq!(Command::parse("search:"), Command::Search(""));
        assert_eq!(Command::parse("wiki:   "), Command::Wiki(""));
    }

    #[test]
    fn short_and_multibyte_input_is_chat() {
        assert_eq!(Command::parse("wik"), Command::Chat("wik"));
        assert_eq!(Command::parse("séarch: x"), Command::Chat("séarch: x"));
        assert_eq!(Command::parse(""), Command::Chat(""));
    }
}
