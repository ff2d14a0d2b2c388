use regex::Regex;

/// Trailing marker that routes a line or selection to the explain flow
pub const EXPLAIN_MARKER: &str = "# explain";

/// Marker that routes a line to the take-a-break flow
pub const BREAK_MARKER: &str = "# take-a-break";

/// Block and definition headers that must never execute on their own
const BLOCK_PREFIXES: [&str; 8] = [
    "def ", "class ", "for ", "while ", "if ", "elif ", "else:", "@",
];

/// How a line of input should be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Trailing explain marker; carries the code with the marker stripped
    Explain(String),
    /// Take-a-break marker present; open the external link instead
    TakeABreak,
    /// A call-like statement worth executing
    Runnable,
    /// Anything else: blank lines, assignments, block headers
    Skip,
}

/// Classify a line (or selection) of Python source.
///
/// The call heuristic matches any identifier followed by parentheses, so
/// some non-call lines slip through; accepted limitation of not parsing
/// the language.
pub fn classify(text: &str) -> Classification {
    let trimmed = text.trim();

    if trimmed.ends_with(EXPLAIN_MARKER) {
        let code = trimmed[..trimmed.len() - EXPLAIN_MARKER.len()].trim();
        return Classification::Explain(code.to_string());
    }

    if trimmed.contains(BREAK_MARKER) {
        return Classification::TakeABreak;
    }

    if BLOCK_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return Classification::Skip;
    }

    let call_like = Regex::new(r"\w+\s*\(.*\)").unwrap();
    if trimmed.starts_with("print(") || call_like.is_match(trimmed) {
        return Classification::Runnable;
    }

    Classification::Skip
}
