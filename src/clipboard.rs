//! Copying results to the system clipboard.
//!
//! Writes run on a long-lived worker thread that owns the clipboard handle;
//! outcomes come back over a channel and drive a short-lived status on the
//! copy button.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Destination for copied text.
pub(crate) trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard, opened on first use and then kept open.
///
/// On X11 and Wayland the copied text is only served while the handle lives,
/// so the worker holds it for the rest of the session.
#[derive(Default)]
struct SystemClipboard {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?,
        };
        let result = clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()));
        self.clipboard = Some(clipboard);
        result
    }
}

/// Completion message for a background copy.
#[derive(Debug)]
pub enum CopyOutcome {
    Copied,
    Failed(String),
}

/// Long-lived copy thread. Requests carry an id so the page can ignore
/// outcomes it no longer waits for.
pub struct CopyWorker {
    requests: Sender<(u64, String)>,
    outcomes: Receiver<(u64, CopyOutcome)>,
}

impl CopyWorker {
    /// Start a worker that writes to the system clipboard.
    pub fn spawn() -> Self {
        Self::spawn_with(SystemClipboard::default)
    }

    /// Start a worker around a sink built on the worker thread.
    pub(crate) fn spawn_with<S, F>(make_sink: F) -> Self
    where
        S: ClipboardSink,
        F: FnOnce() -> S + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<(u64, String)>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut sink = make_sink();
            for (id, text) in request_rx {
                let outcome = match sink.set_text(&text) {
                    Ok(()) => CopyOutcome::Copied,
                    Err(e) => CopyOutcome::Failed(e.to_string()),
                };
                if outcome_tx.send((id, outcome)).is_err() {
                    break;
                }
            }
            debug!("clipboard_worker_stopped");
        });

        Self {
            requests: request_tx,
            outcomes: outcome_rx,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_channels(
        requests: Sender<(u64, String)>,
        outcomes: Receiver<(u64, CopyOutcome)>,
    ) -> Self {
        Self { requests, outcomes }
    }

    /// Queue a copy. Returns false if the worker thread has stopped.
    pub fn request(&self, id: u64, text: String) -> bool {
        self.requests.send((id, text)).is_ok()
    }

    pub fn try_outcome(&self) -> Result<(u64, CopyOutcome), TryRecvError> {
        self.outcomes.try_recv()
    }
}

/// What the copy button currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyStatus {
    #[default]
    Idle,
    Copied(Instant),
    Failed(Instant),
}

impl CopyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CopyStatus::Idle => "复制结果",
            CopyStatus::Copied(_) => "已复制",
            CopyStatus::Failed(_) => "复制失败",
        }
    }

    pub fn from_outcome(outcome: &CopyOutcome, now: Instant) -> Self {
        match outcome {
            CopyOutcome::Copied => {
                debug!("copy_succeeded");
                CopyStatus::Copied(now)
            }
            CopyOutcome::Failed(error) => {
                warn!(error = %error, "copy_failed");
                CopyStatus::Failed(now)
            }
        }
    }

    /// Revert to idle once `revert_after` has passed since the status was set.
    pub fn expire(self, now: Instant, revert_after: Duration) -> Self {
        match self {
            CopyStatus::Copied(at) | CopyStatus::Failed(at)
                if now.saturating_duration_since(at) >= revert_after =>
            {
                CopyStatus::Idle
            }
            other => other,
        }
    }
}
