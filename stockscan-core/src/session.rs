//! Client-side scan session.
//!
//! A [`ScanSession`] walks the whole unflagged collection one slice at a
//! time against a [`BatchSource`], accumulating every result:
//!
//! - One request is in flight at most. The next offset is requested only
//!   after the previous response has been appended.
//! - The offset advances by the batch size the source reports.
//! - A failed request leaves offset and results untouched, so calling
//!   [`ScanSession::run`] again resumes from the last good slice.
//! - [`CancelHandle::cancel`] stops the loop between requests and keeps the
//!   accumulated results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::asset::MatchResult;
use crate::error::{Result, ScanError};
use crate::protocol::ScanResponse;

/// Anything that can serve scan slices by offset: the controller itself or
/// a remote server.
#[async_trait]
pub trait BatchSource: Send + Sync {
    async fn fetch_batch(&self, offset: u64) -> Result<ScanResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Scanning,
    Completed,
}

/// How a call to [`ScanSession::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Cancelled,
}

/// Snapshot reported after each slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanProgress {
    /// Assets received so far
    pub scanned: usize,
    /// Of those, assets attributed to a provider
    pub matched: usize,
    /// Unflagged total reported by the most recent response
    pub total: u64,
}

impl ScanProgress {
    /// Completion in percent, capped at 100. An empty collection is complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.scanned as f64 / self.total as f64 * 100.0).min(100.0)
    }
}

/// Cooperative stop signal for a running session.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct ScanSession {
    id: Uuid,
    state: SessionState,
    offset: u64,
    accumulated: Vec<MatchResult>,
    total: u64,
    cancel: CancelHandle,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            offset: 0,
            accumulated: Vec::new(),
            total: 0,
            cancel: CancelHandle::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Offset of the next slice to request.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Handle that stops [`run`](Self::run) before its next request.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Discard all results and return to `Idle` under a fresh session id.
    pub fn reset(&mut self) {
        tracing::debug!(session_id = %self.id, "Resetting scan session");
        self.id = Uuid::new_v4();
        self.state = SessionState::Idle;
        self.offset = 0;
        self.accumulated.clear();
        self.total = 0;
        self.cancel.take();
    }

    /// Request one slice and fold it into the session.
    ///
    /// A completed session returns its progress without issuing a request.
    pub async fn step<S: BatchSource + ?Sized>(&mut self, source: &S) -> Result<ScanProgress> {
        if self.state == SessionState::Completed {
            return Ok(self.progress());
        }
        self.state = SessionState::Scanning;

        let response = source.fetch_batch(self.offset).await.map_err(|e| {
            tracing::warn!(
                session_id = %self.id,
                offset = self.offset,
                error = %e,
                "Scan step failed"
            );
            e
        })?;

        if response.has_more && response.batch_size == 0 {
            return Err(ScanError::invalid_input(
                "batch source reported more results with a zero batch size",
            ));
        }

        let next_offset = if response.has_more {
            Some(self.offset.checked_add(response.batch_size).ok_or_else(|| {
                ScanError::invalid_input(format!(
                    "batch size {} at offset {} overflows the scan offset",
                    response.batch_size, self.offset
                ))
            })?)
        } else {
            None
        };

        let received = response.results.len();
        self.accumulated.extend(response.results);
        self.total = response.total;

        match next_offset {
            Some(offset) => self.offset = offset,
            None => self.state = SessionState::Completed,
        }

        let progress = self.progress();
        tracing::debug!(
            session_id = %self.id,
            received,
            scanned = progress.scanned,
            matched = progress.matched,
            total = progress.total,
            "Scan step complete"
        );

        Ok(progress)
    }

    /// Request slices until the source is exhausted or the session is
    /// cancelled, reporting progress after every slice.
    pub async fn run<S, F>(&mut self, source: &S, mut on_progress: F) -> Result<SessionOutcome>
    where
        S: BatchSource + ?Sized,
        F: FnMut(&ScanProgress),
    {
        tracing::info!(session_id = %self.id, offset = self.offset, "Scan session running");

        while self.state != SessionState::Completed {
            if self.cancel.take() {
                tracing::info!(
                    session_id = %self.id,
                    scanned = self.accumulated.len(),
                    "Scan session cancelled"
                );
                return Ok(SessionOutcome::Cancelled);
            }

            let progress = self.step(source).await?;
            on_progress(&progress);
        }

        tracing::info!(
            session_id = %self.id,
            scanned = self.accumulated.len(),
            matched = self.matched().count(),
            "Scan session completed"
        );
        Ok(SessionOutcome::Completed)
    }

    /// Every accumulated result in arrival order.
    pub fn results(&self) -> &[MatchResult] {
        &self.accumulated
    }

    /// Accumulated results attributed to a provider.
    pub fn matched(&self) -> impl Iterator<Item = &MatchResult> {
        self.accumulated.iter().filter(|r| r.is_match())
    }

    pub fn progress(&self) -> ScanProgress {
        ScanProgress {
            scanned: self.accumulated.len(),
            matched: self.matched().count(),
            total: self.total,
        }
    }

    pub fn into_results(self) -> Vec<MatchResult> {
        self.accumulated
    }
}
