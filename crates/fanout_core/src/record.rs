use std::fmt::Write;

pub const SEPARATOR_WIDTH: usize = 80;

/// Result of one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Response(String),
    Error(String),
}

/// Render the output record for one processed item.
pub fn format_record(original: &str, outcome: &Outcome) -> String {
    let mut record = String::new();
    let _ = writeln!(record, "Original line: {original}");
    match outcome {
        Outcome::Response(text) => {
            let _ = writeln!(record, "LLM response: {text}");
        }
        Outcome::Error(description) => {
            let _ = writeln!(record, "Error: {description}");
        }
    }
    record.push_str(&"-".repeat(SEPARATOR_WIDTH));
    record.push_str("\n\n");
    record
}
