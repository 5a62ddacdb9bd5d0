//! Debounced draft persistence for the Markdown editor.
//!
//! Every edit restarts a single-shot timer; the draft is written once the
//! timer runs out without another edit (trailing edge, no maximum wait). At
//! most one write is pending at any time.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use readmode_core::{DraftKeeper, MemoryStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut drafts = DraftKeeper::new(Arc::new(MemoryStore::new()));
//! drafts.record("# Draft");
//! drafts.flush().await;
//! assert_eq!(drafts.load().await.as_deref(), Some("# Draft"));
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::store::KeyValueStore;

/// Store key for the in-progress draft.
pub const DRAFT_KEY: &str = "markdown-draft";

/// Quiet period before a draft is written.
pub const DRAFT_DELAY: Duration = Duration::from_millis(300);

pub struct DraftKeeper {
    store: Arc<dyn KeyValueStore>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DraftKeeper {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_delay(store, DRAFT_DELAY)
    }

    pub fn with_delay(store: Arc<dyn KeyValueStore>, delay: Duration) -> Self {
        Self { store, delay, pending: None }
    }

    /// Schedules `text` to be saved after the quiet period, replacing any
    /// write that has not happened yet.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn record(&mut self, text: impl Into<String>) {
        self.cancel_pending();

        let store = Arc::clone(&self.store);
        let delay = self.delay;
        let text = text.into();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = store.set(DRAFT_KEY, Value::String(text)).await {
                tracing::warn!(error = %e, "failed to save draft");
            }
        }));
    }

    /// Whether a write is scheduled but not yet finished.
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Waits for the scheduled write, if any.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take()
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            tracing::warn!(error = %e, "draft write task failed");
        }
    }

    /// Returns the saved draft. Read failures are logged and treated as no draft.
    pub async fn load(&self) -> Option<String> {
        match self.store.get(DRAFT_KEY).await {
            Ok(Some(Value::String(text))) => Some(text),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load draft");
                None
            }
        }
    }

    /// Cancels any scheduled write and removes the saved draft.
    pub async fn clear(&mut self) {
        self.cancel_pending();
        if let Err(e) = self.store.remove(DRAFT_KEY).await {
            tracing::warn!(error = %e, "failed to clear draft");
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for DraftKeeper {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
