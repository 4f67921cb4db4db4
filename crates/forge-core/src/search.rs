//! Text search.
//!
//! Find/replace support over document text, in **character offsets** throughout. A
//! [`SearchQuery`] compiles the pattern once (plain substrings are regex-escaped) and
//! can then scan forward, backward, or exhaustively. Whole-word filtering treats
//! `_` and alphanumerics as word characters.

use regex::{Regex, RegexBuilder};

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words.
    pub whole_word: bool,
    /// If `true`, treats the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

/// A match as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Match length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Search errors.
#[derive(Debug)]
pub enum SearchError {
    /// The provided pattern failed to compile as a regex.
    InvalidRegex(regex::Error),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRegex(err) => write!(f, "Invalid regex: {}", err),
        }
    }
}

impl std::error::Error for SearchError {}

/// A compiled search query.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    regex: Regex,
    options: SearchOptions,
}

impl SearchQuery {
    /// Compile `query` under `options`. An empty query compiles but never matches.
    pub fn compile(query: &str, options: SearchOptions) -> Result<Self, SearchError> {
        let pattern = if options.regex {
            query.to_string()
        } else {
            regex::escape(query)
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .multi_line(true)
            .build()
            .map_err(SearchError::InvalidRegex)?;

        Ok(Self { regex, options })
    }

    /// Next occurrence at or after `from` (char offset), or `None`.
    pub fn find_next(&self, text: &str, from: usize) -> Option<SearchMatch> {
        let index = CharIndex::new(text);
        let mut from_char = from.min(index.char_count());

        loop {
            let from_byte = index.char_to_byte(from_char);
            let m = self.regex.find_at(text, from_byte)?;

            let candidate = SearchMatch {
                start: index.byte_to_char(m.start()),
                end: index.byte_to_char(m.end()),
            };

            if candidate.is_empty() {
                if candidate.end >= index.char_count() {
                    return None;
                }
                from_char = candidate.end + 1;
                continue;
            }

            if self.options.whole_word && !is_whole_word(text, &index, candidate) {
                from_char = candidate.end;
                continue;
            }

            return Some(candidate);
        }
    }

    /// Last occurrence strictly before `until` (char offset), or `None`.
    pub fn find_prev(&self, text: &str, until: usize) -> Option<SearchMatch> {
        let index = CharIndex::new(text);
        let until_byte = index.char_to_byte(until.min(index.char_count()));

        let mut last = None;
        for m in self.regex.find_iter(&text[..until_byte]) {
            let candidate = SearchMatch {
                start: index.byte_to_char(m.start()),
                end: index.byte_to_char(m.end()),
            };
            if candidate.is_empty() {
                continue;
            }
            if self.options.whole_word && !is_whole_word(text, &index, candidate) {
                continue;
            }
            last = Some(candidate);
        }
        last
    }

    /// All occurrences in `text`.
    pub fn find_all(&self, text: &str) -> Vec<SearchMatch> {
        let index = CharIndex::new(text);

        self.regex
            .find_iter(text)
            .map(|m| SearchMatch {
                start: index.byte_to_char(m.start()),
                end: index.byte_to_char(m.end()),
            })
            .filter(|candidate| !candidate.is_empty())
            .filter(|candidate| {
                !self.options.whole_word || is_whole_word(text, &index, *candidate)
            })
            .collect()
    }
}

struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.char_to_byte
            .get(char_offset.min(self.char_count()))
            .copied()
            .unwrap_or(self.text_len)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        match self.char_to_byte.binary_search(&byte_offset.min(self.text_len)) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        text[start..].chars().next()
    }
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, index: &CharIndex, m: SearchMatch) -> bool {
    let before = m
        .start
        .checked_sub(1)
        .and_then(|prev| index.char_at(text, prev));
    let after = index.char_at(text, m.end);

    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_substring_search() {
        let query = SearchQuery::compile("foo", SearchOptions::default()).unwrap();
        let matches = query.find_all("foo bar foo");
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 0, end: 3 },
                SearchMatch { start: 8, end: 11 }
            ]
        );
    }

    #[test]
    fn test_find_next_and_prev() {
        let query = SearchQuery::compile("a", SearchOptions::default()).unwrap();
        assert_eq!(query.find_next("xaxa", 2), Some(SearchMatch { start: 3, end: 4 }));
        assert_eq!(query.find_prev("xaxa", 3), Some(SearchMatch { start: 1, end: 2 }));
        assert_eq!(query.find_next("xaxa", 4), None);
    }

    #[test]
    fn test_whole_word_filtering() {
        let options = SearchOptions {
            whole_word: true,
            ..Default::default()
        };
        let query = SearchQuery::compile("cat", options).unwrap();
        let matches = query.find_all("cat concat cat_x cat");
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 0, end: 3 },
                SearchMatch { start: 17, end: 20 }
            ]
        );
    }

    #[test]
    fn test_regex_mode_and_invalid_pattern() {
        let options = SearchOptions {
            regex: true,
            ..Default::default()
        };
        let query = SearchQuery::compile(r"\d+", options).unwrap();
        assert_eq!(query.find_all("a12b3").len(), 2);

        assert!(SearchQuery::compile(r"(", options).is_err());
    }

    #[test]
    fn test_case_insensitive_offsets_are_chars() {
        let options = SearchOptions {
            case_sensitive: false,
            ..Default::default()
        };
        let query = SearchQuery::compile("WORLD", options).unwrap();
        let matches = query.find_all("你好 world");
        assert_eq!(matches, vec![SearchMatch { start: 3, end: 8 }]);
    }
}
