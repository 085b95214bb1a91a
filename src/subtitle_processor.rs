use once_cell::sync::Lazy;
use regex::Regex;

// @module: Subtitle document parsing, chunking and projection

// @const: Blank-line run separating two entries, tolerating stray spaces/tabs
static ENTRY_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n[ \t]*\r?\n").unwrap()
});

// @const: Line holding only a numeric sequence index
static SEQUENCE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

// @const: SRT timestamp range line
static TIMESTAMP_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3}.*-->.*$").unwrap()
});

// @struct: SRT-style document as an ordered list of opaque entries
//
// An entry is whatever sits between two blank-line separators; usually a
// numeric index, a timestamp line and content lines. Nothing here parses
// that internal structure. A document is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleDocument {
    // @field: Entries in document order
    entries: Vec<String>,
}

impl SubtitleDocument {
    // @creates: Document from raw text
    // @validates: Nothing; parsing is total, degenerate input gives an empty document
    pub fn parse(raw: &str) -> Self {
        let entries = ENTRY_SEPARATOR
            .split(raw)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(String::from)
            .collect();
        SubtitleDocument { entries }
    }

    /// Builds a document from pre-separated entries, applying the same
    /// trim-and-discard rules as `parse`. Used by tests and benchmarks.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        SubtitleDocument { entries }
    }

    /// Entries in document order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // @returns: Contiguous chunks of at most max_entries entries each
    //
    // Every chunk except possibly the last holds exactly max_entries
    // entries; the last holds the remainder. Order is preserved and the
    // chunks jointly cover every entry exactly once. Values below 1 are
    // treated as 1. An empty document yields no chunks.
    pub fn chunks(&self, max_entries: usize) -> Vec<&[String]> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        self.entries.chunks(max_entries.max(1)).collect()
    }

    /// Renders the document back to text, entries joined by blank lines
    pub fn to_text(&self) -> String {
        self.entries.join("\n\n")
    }
}

// @returns: Plain-text projection of SRT content
//
// Drops lines that are purely a numeric sequence index and timestamp
// range lines, trims what remains and discards lines left empty. The
// result is content lines joined by single newlines. Idempotent; works
// on translated output and raw source text alike.
pub fn strip_srt_markup(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty() && !SEQUENCE_LINE.is_match(line) && !TIMESTAMP_LINE.is_match(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
