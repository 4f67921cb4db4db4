//! Line ending helpers.
//!
//! The kernel stores text internally with LF (`'\n'`) newlines only. Text arriving from
//! the file I/O boundary is normalized on load; the dominant line ending is remembered so
//! saving can reproduce it.

/// The preferred newline sequence used when saving a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the dominant line ending of a source text.
    ///
    /// Policy: any CRLF in the input selects [`LineEnding::Crlf`], otherwise
    /// [`LineEnding::Lf`].
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// Normalize loaded text to LF and report the detected line ending.
    pub fn normalize(text: &str) -> (String, Self) {
        let ending = Self::detect(text);
        match ending {
            Self::Lf => (text.to_string(), ending),
            Self::Crlf => (text.replace("\r\n", "\n"), ending),
        }
    }

    /// Convert LF-normalized text to this line ending for saving.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', "\r\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_crlf_round_trip() {
        let (text, ending) = LineEnding::normalize("a\r\nb\r\n");
        assert_eq!(text, "a\nb\n");
        assert_eq!(ending, LineEnding::Crlf);
        assert_eq!(ending.apply(&text), "a\r\nb\r\n");
    }

    #[test]
    fn test_lf_text_is_untouched() {
        let (text, ending) = LineEnding::normalize("a\nb");
        assert_eq!(text, "a\nb");
        assert_eq!(ending, LineEnding::Lf);
    }
}
