//! Instrumented and fault-injecting mirrors.
//!
//! Each wrapper delegates to an inner mirror (an [`InMemoryMirror`] by
//! default) and adds one behaviour on top.

use hashkv_core::{InMemoryMirror, RemoteMirror, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// A mirror whose pulls and pushes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyMirror<M: RemoteMirror = InMemoryMirror> {
    inner: M,
    fail_pulls: AtomicBool,
    fail_pushes: AtomicBool,
    failures: AtomicUsize,
}

impl FlakyMirror {
    /// Creates a healthy flaky mirror over a fresh in-memory mirror.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: RemoteMirror> FlakyMirror<M> {
    /// Wraps an existing mirror.
    pub fn wrap(inner: M) -> Self {
        Self {
            inner,
            fail_pulls: AtomicBool::new(false),
            fail_pushes: AtomicBool::new(false),
            failures: AtomicUsize::new(0),
        }
    }

    /// Makes pulls fail (or succeed again).
    pub fn set_pull_failing(&self, failing: bool) {
        self.fail_pulls.store(failing, Ordering::SeqCst);
    }

    /// Makes pushes fail (or succeed again).
    pub fn set_push_failing(&self, failing: bool) {
        self.fail_pushes.store(failing, Ordering::SeqCst);
    }

    /// Makes every call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.set_pull_failing(offline);
        self.set_push_failing(offline);
    }

    /// Number of calls that were failed on purpose.
    pub fn injected_failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Returns the wrapped mirror.
    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn check(&self, flag: &AtomicBool, op: &str, name: &str) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(StorageError::unavailable(format!("injected {op} failure for {name}")));
        }
        Ok(())
    }
}

impl<M: RemoteMirror> RemoteMirror for FlakyMirror<M> {
    fn push(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        self.check(&self.fail_pushes, "push", name)?;
        self.inner.push(name, data)
    }

    fn pull(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        self.check(&self.fail_pulls, "pull", name)?;
        self.inner.pull(name)
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        self.check(&self.fail_pulls, "list", "*")?;
        self.inner.list()
    }
}

/// A mirror that counts round trips.
#[derive(Debug, Default)]
pub struct CountingMirror<M: RemoteMirror = InMemoryMirror> {
    inner: M,
    pulls: AtomicUsize,
    pushes: AtomicUsize,
}

impl CountingMirror {
    /// Creates a counting mirror over a fresh in-memory mirror.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: RemoteMirror> CountingMirror<M> {
    /// Wraps an existing mirror.
    pub fn wrap(inner: M) -> Self {
        Self {
            inner,
            pulls: AtomicUsize::new(0),
            pushes: AtomicUsize::new(0),
        }
    }

    /// Number of pulls so far.
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    /// Number of pushes so far.
    pub fn pushes(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    /// Resets both counters.
    pub fn reset(&self) {
        self.pulls.store(0, Ordering::SeqCst);
        self.pushes.store(0, Ordering::SeqCst);
    }
}

impl<M: RemoteMirror> RemoteMirror for CountingMirror<M> {
    fn push(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        self.inner.push(name, data)
    }

    fn pull(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        self.inner.pull(name)
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        self.inner.list()
    }
}

/// A mirror that detects overlapping calls on the same artifact name.
///
/// Every call marks its name as in flight for the duration of the call,
/// stretched by an optional delay. A call that finds its name already in
/// flight counts as an overlap. Overlaps on different names are allowed and
/// counted separately, which shows whether distinct buckets ran in parallel.
#[derive(Debug, Default)]
pub struct RecordingMirror<M: RemoteMirror = InMemoryMirror> {
    inner: M,
    delay: Duration,
    in_flight: Mutex<HashSet<String>>,
    same_name_overlaps: AtomicUsize,
    parallel_calls: AtomicUsize,
}

impl RecordingMirror {
    /// Creates a recording mirror that holds each call for `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

impl<M: RemoteMirror> RecordingMirror<M> {
    /// Number of calls that overlapped another call on the same name.
    pub fn same_name_overlaps(&self) -> usize {
        self.same_name_overlaps.load(Ordering::SeqCst)
    }

    /// Number of calls that started while a call on another name was in
    /// flight.
    pub fn parallel_calls(&self) -> usize {
        self.parallel_calls.load(Ordering::SeqCst)
    }

    fn record<T>(&self, name: &str, call: impl FnOnce() -> T) -> T {
        {
            let mut in_flight = self.in_flight.lock();
            if in_flight.contains(name) {
                self.same_name_overlaps.fetch_add(1, Ordering::SeqCst);
            }
            if in_flight.iter().any(|other| other != name) {
                self.parallel_calls.fetch_add(1, Ordering::SeqCst);
            }
            in_flight.insert(name.to_string());
        }

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let result = call();

        self.in_flight.lock().remove(name);
        result
    }
}

impl<M: RemoteMirror> RemoteMirror for RecordingMirror<M> {
    fn push(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        self.record(name, || self.inner.push(name, data))
    }

    fn pull(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        self.record(name, || self.inner.pull(name))
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        self.inner.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flaky_fails_on_demand() {
        let mirror = FlakyMirror::new();
        mirror.push("bucket0.txt", b"a").unwrap();

        mirror.set_pull_failing(true);
        assert!(mirror.pull("bucket0.txt").is_err());
        assert!(mirror.push("bucket0.txt", b"b").is_ok());

        mirror.set_offline(true);
        assert!(mirror.push("bucket0.txt", b"c").is_err());
        assert_eq!(mirror.injected_failures(), 2);

        mirror.set_offline(false);
        assert_eq!(mirror.pull("bucket0.txt").unwrap(), Some(b"b".to_vec()));
    }

    #[test]
    fn counting_counts() {
        let mirror = CountingMirror::new();
        mirror.push("bucket0.txt", b"a").unwrap();
        mirror.pull("bucket0.txt").unwrap();
        mirror.pull("bucket1.txt").unwrap();

        assert_eq!(mirror.pushes(), 1);
        assert_eq!(mirror.pulls(), 2);
        mirror.reset();
        assert_eq!(mirror.pulls(), 0);
    }

    #[test]
    fn recording_sequential_calls_never_overlap() {
        let mirror: RecordingMirror = RecordingMirror::default();
        for _ in 0..3 {
            mirror.push("bucket0.txt", b"a").unwrap();
            mirror.pull("bucket0.txt").unwrap();
        }
        assert_eq!(mirror.same_name_overlaps(), 0);
        assert_eq!(mirror.parallel_calls(), 0);
    }
}
