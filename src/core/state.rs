//! Shared scan bookkeeping.
//!
//! The checked set, retry queue and available list live behind a single
//! mutex so that "is it checked?" and "queue it" (or "mark checked" and
//! "drop it from the queue") happen as one step. A number is never in the
//! checked set and the retry queue at the same time.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    checked: HashSet<String>,
    retry_queue: VecDeque<String>,
    queued: HashSet<String>,
    available: Vec<String>,
    already_known: usize,
}

#[derive(Debug, Default)]
pub struct ScanState {
    inner: Mutex<Inner>,
}

/// Result of recording a definitive response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkResult {
    /// First definitive response for this number.
    Fresh,
    /// Another check got there first.
    Duplicate,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // 任一 worker panic 不應讓整個掃描的記錄失效
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_checked(&self, number: &str) -> bool {
        self.lock().checked.contains(number)
    }

    /// Counts a skipped re-check, returning true if `number` is already checked.
    pub fn note_if_known(&self, number: &str) -> bool {
        let mut inner = self.lock();
        let known = inner.checked.contains(number);
        if known {
            inner.already_known += 1;
        }
        known
    }

    /// Adds `number` to the checked set and, when `available`, to the
    /// available list. Removes it from the retry queue if it was waiting there.
    /// A duplicate counts towards `already_known`.
    pub fn mark_checked(&self, number: &str, available: bool) -> MarkResult {
        let mut inner = self.lock();
        if !inner.checked.insert(number.to_string()) {
            inner.already_known += 1;
            return MarkResult::Duplicate;
        }
        if inner.queued.remove(number) {
            inner.retry_queue.retain(|queued| queued != number);
        }
        if available {
            inner.available.push(number.to_string());
        }
        MarkResult::Fresh
    }

    /// Queues `number` unless it is checked or already queued.
    pub fn enqueue_retry(&self, number: &str) -> bool {
        let mut inner = self.lock();
        if inner.checked.contains(number) || !inner.queued.insert(number.to_string()) {
            return false;
        }
        inner.retry_queue.push_back(number.to_string());
        true
    }

    pub fn pop_retry(&self) -> Option<String> {
        let mut inner = self.lock();
        let number = inner.retry_queue.pop_front()?;
        inner.queued.remove(&number);
        Some(number)
    }

    pub fn retry_len(&self) -> usize {
        self.lock().retry_queue.len()
    }

    pub fn retry_snapshot(&self) -> Vec<String> {
        self.lock().retry_queue.iter().cloned().collect()
    }

    pub fn checked_len(&self) -> usize {
        self.lock().checked.len()
    }

    pub fn already_known(&self) -> usize {
        self.lock().already_known
    }

    pub fn available(&self) -> Vec<String> {
        self.lock().available.clone()
    }
}
