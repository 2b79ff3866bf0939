use std::sync::LazyLock;

use regex::Regex;

static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s*(.+)$").expect("numbered item pattern is valid")
});

/// A numbered input line chosen for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItem {
    /// 1-based position in the input.
    pub line_number: usize,
    /// The line with surrounding whitespace trimmed, numbering intact.
    pub original: String,
    /// The line with numbering, period and leading whitespace removed.
    pub text: String,
}

/// A non-empty line that did not look like a numbered item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub items: Vec<SelectedItem>,
    pub skipped: Vec<SkippedLine>,
}

impl Selection {
    pub fn total(&self) -> usize {
        self.items.len()
    }
}

/// Parse one raw line. Returns `None` for blank or unnumbered lines.
pub fn parse_item(line_number: usize, raw: &str) -> Option<SelectedItem> {
    let trimmed = raw.trim();
    let captures = NUMBERED_ITEM.captures(trimmed)?;
    let text = captures.get(1)?.as_str();
    Some(SelectedItem {
        line_number,
        original: trimmed.to_string(),
        text: text.to_string(),
    })
}

/// Select numbered items in input order. Blank lines are dropped silently;
/// other non-matching lines are reported in `skipped`.
pub fn select_items<'a, I>(lines: I) -> Selection
where
    I: IntoIterator<Item = &'a str>,
{
    let mut selection = Selection::default();
    for (index, raw) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        match parse_item(line_number, raw) {
            Some(item) => selection.items.push(item),
            None => selection.skipped.push(SkippedLine {
                line_number,
                line: raw.trim().to_string(),
            }),
        }
    }
    selection
}
