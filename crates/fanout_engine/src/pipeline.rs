use std::path::Path;
use std::time::Duration;

use tokio::time::Instant;

use fanout_core::{
    build_prompt, format_duration, select_items, Outcome, ProgressTracker, RunSummary,
    SelectedItem,
};
use fanout_logging::{fanout_debug, fanout_info, fanout_trace, fanout_warn};

use crate::{read_input, CompletionClient, ResultWriter, RunError, RunEvent};

/// Item cap applied by `--debug` when no explicit cap is given.
pub const DEBUG_ITEM_CAP: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub prompt_prefix: String,
    /// Sleep between consecutive items. Not applied after the last one.
    pub pacing_delay: Duration,
    /// Stop after this many attempted requests.
    pub item_cap: Option<usize>,
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}

/// Reports run progress through the `fanout_*` logging macros.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: RunEvent) {
        match event {
            RunEvent::Selected { total, skipped } => {
                fanout_info!("Selected {} numbered items ({} other lines skipped)", total, skipped);
            }
            RunEvent::LineSkipped { line_number, line } => {
                fanout_info!("Skipping unnumbered line {}: {}", line_number, line);
            }
            RunEvent::ItemStarted {
                index,
                total,
                line_number,
            } => {
                fanout_debug!("Requesting item {}/{} (input line {})", index, total, line_number);
            }
            RunEvent::ItemSucceeded {
                latency, snapshot, ..
            } => {
                fanout_info!("{} latency {}", snapshot, format_duration(latency));
            }
            RunEvent::ItemFailed {
                line_number,
                error,
                snapshot,
            } => {
                fanout_warn!("{} input line {} failed: {}", snapshot, line_number, error);
            }
            RunEvent::Pacing { delay } => {
                fanout_trace!("Waiting {} before next request", format_duration(delay));
            }
            RunEvent::CapReached { cap } => {
                fanout_info!("Item cap of {} reached, stopping", cap);
            }
            RunEvent::Finished(summary) => {
                fanout_info!("Finished: {}", summary);
            }
        }
    }
}

/// Read `input`, select numbered items and process them into `output`.
///
/// A missing or unreadable input aborts before the output file is touched.
pub async fn run_file(
    input: &Path,
    output: &Path,
    client: &dyn CompletionClient,
    config: &RunConfig,
    sink: &dyn ProgressSink,
) -> Result<RunSummary, RunError> {
    let content = read_input(input)?;
    let selection = select_items(content.lines());
    for skipped in &selection.skipped {
        sink.emit(RunEvent::LineSkipped {
            line_number: skipped.line_number,
            line: skipped.line.clone(),
        });
    }
    sink.emit(RunEvent::Selected {
        total: selection.total(),
        skipped: selection.skipped.len(),
    });

    let writer = ResultWriter::new(output.to_path_buf());
    run_batch(client, &writer, &selection.items, config, sink).await
}

/// Process `items` strictly in order, one request in flight at a time.
///
/// Each item gets exactly one completion call and exactly one output record,
/// written before any pacing delay. Request failures are recorded and the run
/// continues; a write failure aborts it.
pub async fn run_batch(
    client: &dyn CompletionClient,
    writer: &ResultWriter,
    items: &[SelectedItem],
    config: &RunConfig,
    sink: &dyn ProgressSink,
) -> Result<RunSummary, RunError> {
    let total = items.len();
    let mut tracker = ProgressTracker::new(total, config.pacing_delay);
    let mut attempted = 0usize;
    let mut capped = false;
    fanout_debug!("Appending records to {:?}", writer.path());

    for (index, item) in items.iter().enumerate() {
        if let Some(cap) = config.item_cap {
            if attempted >= cap {
                capped = true;
                sink.emit(RunEvent::CapReached { cap });
                break;
            }
        }
        if index > 0 {
            sink.emit(RunEvent::Pacing {
                delay: config.pacing_delay,
            });
            if !config.pacing_delay.is_zero() {
                tokio::time::sleep(config.pacing_delay).await;
            }
        }

        sink.emit(RunEvent::ItemStarted {
            index: index + 1,
            total,
            line_number: item.line_number,
        });
        let prompt = build_prompt(&config.prompt_prefix, item);
        let started = Instant::now();
        let result = client.complete(&prompt).await;
        let latency = started.elapsed();
        attempted += 1;

        let (outcome, failure) = match result {
            Ok(text) => (Outcome::Response(text), None),
            Err(err) => (Outcome::Error(err.to_string()), Some(err)),
        };
        writer.append(&item.original, &outcome)?;

        match failure {
            None => {
                let snapshot = tracker.record_success(latency);
                sink.emit(RunEvent::ItemSucceeded {
                    line_number: item.line_number,
                    latency,
                    snapshot,
                });
            }
            Some(error) => {
                let snapshot = tracker.record_failure();
                sink.emit(RunEvent::ItemFailed {
                    line_number: item.line_number,
                    error,
                    snapshot,
                });
            }
        }
    }

    let summary = tracker.summary(capped);
    sink.emit(RunEvent::Finished(summary.clone()));
    Ok(summary)
}
