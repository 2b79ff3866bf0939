use std::fmt;
use std::time::Duration;

use fanout_core::{ProgressSnapshot, RunSummary};
use thiserror::Error;

use crate::{InputError, WriteError};

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Selected {
        total: usize,
        skipped: usize,
    },
    LineSkipped {
        line_number: usize,
        line: String,
    },
    ItemStarted {
        index: usize,
        total: usize,
        line_number: usize,
    },
    ItemSucceeded {
        line_number: usize,
        latency: Duration,
        snapshot: ProgressSnapshot,
    },
    ItemFailed {
        line_number: usize,
        error: RequestError,
        snapshot: ProgressSnapshot,
    },
    Pacing {
        delay: Duration,
    },
    CapReached {
        cap: usize,
    },
    Finished(RunSummary),
}

/// Errors that end a run. Request failures never do; they become records.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// A single failed completion call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: RequestErrorKind,
    pub message: String,
}

impl RequestError {
    pub fn new(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestErrorKind {
    InvalidEndpoint,
    Network,
    Timeout,
    HttpStatus(u16),
    Service,
    MalformedResponse,
    EmptyCompletion,
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestErrorKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            RequestErrorKind::Network => write!(f, "network error"),
            RequestErrorKind::Timeout => write!(f, "timeout"),
            RequestErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            RequestErrorKind::Service => write!(f, "service error"),
            RequestErrorKind::MalformedResponse => write!(f, "malformed response"),
            RequestErrorKind::EmptyCompletion => write!(f, "empty completion"),
        }
    }
}
