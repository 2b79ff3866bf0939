//! Fanout core: pure line selection, progress bookkeeping and record formatting.
mod progress;
mod prompt;
mod record;
mod select;

pub use progress::{format_duration, ProgressSnapshot, ProgressTracker, RunSummary};
pub use prompt::build_prompt;
pub use record::{format_record, Outcome, SEPARATOR_WIDTH};
pub use select::{parse_item, select_items, SelectedItem, Selection, SkippedLine};
