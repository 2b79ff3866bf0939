//! Fanout engine: input reading, completion requests, durable output and the run loop.
mod completion;
mod input;
mod pipeline;
mod types;
mod writer;

pub use completion::{CompletionClient, CompletionSettings, OpenAiCompatibleClient};
pub use input::{read_input, InputError};
pub use pipeline::{run_batch, run_file, LogProgressSink, ProgressSink, RunConfig, DEBUG_ITEM_CAP};
pub use types::{RequestError, RequestErrorKind, RunError, RunEvent};
pub use writer::{ResultWriter, WriteError};
