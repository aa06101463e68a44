//! Stress helpers for concurrent workloads.
//!
//! These helpers drive a shared [`Manager`] from several threads and report
//! throughput along with operation counts.

use hashkv_core::Manager;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the run.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {name} ===");
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress runs.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Operations per thread.
    pub ops_per_thread: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Value size in bytes.
    pub value_size: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            ops_per_thread: 100,
            threads: 4,
            value_size: 32,
        }
    }
}

/// Runs `threads` workers that start together and call `op(thread, i)` for
/// each of their operations. `op` returns whether the operation succeeded.
fn run_workers<F>(config: &StressConfig, op: F) -> StressTestResult
where
    F: Fn(usize, usize) -> bool + Send + Sync + 'static,
{
    let op = Arc::new(op);
    let barrier = Arc::new(Barrier::new(config.threads));
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let op = Arc::clone(&op);
            let barrier = Arc::clone(&barrier);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let ops = config.ops_per_thread;
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ops {
                    if op(t, i) {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("stress worker panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// All threads insert distinct keys that route to bucket 0.
///
/// Every insert should succeed; the bucket ends up with
/// `threads * ops_per_thread` keys.
pub fn stress_same_bucket(manager: Arc<Manager>, config: &StressConfig) -> StressTestResult {
    let buckets = manager.bucket_count() as i64;
    let per_thread = config.ops_per_thread;
    let value = "v".repeat(config.value_size);

    run_workers(config, move |t, i| {
        let key = ((t * per_thread + i) as i64) * buckets;
        manager.insert(key, value.clone()).succeeded
    })
}

/// Each thread inserts keys into its own bucket (thread `t` uses bucket
/// `t mod N`).
pub fn stress_cross_bucket(manager: Arc<Manager>, config: &StressConfig) -> StressTestResult {
    let buckets = manager.bucket_count() as i64;
    let value = "v".repeat(config.value_size);

    run_workers(config, move |t, i| {
        let key = (i as i64) * buckets * 1_000 + (t as i64);
        manager.insert(key, value.clone()).succeeded
    })
}

/// All threads race insert, search and delete over a small shared keyspace.
///
/// Failures are expected here (duplicates, missing keys); the run checks
/// that the store stays consistent, not that every call succeeds.
pub fn stress_mixed_operations(manager: Arc<Manager>, config: &StressConfig) -> StressTestResult {
    let value = "v".repeat(config.value_size);

    run_workers(config, move |t, i| {
        let key = ((t + i) % 16) as i64;
        match i % 3 {
            0 => manager.insert(key, value.clone()).succeeded,
            1 => manager.search(key).succeeded,
            _ => manager.delete(key).succeeded,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashkv_core::Config;

    fn manager() -> Arc<Manager> {
        Arc::new(Manager::open(Config::default()).unwrap())
    }

    #[test]
    fn same_bucket_all_succeed() {
        let manager = manager();
        let config = StressConfig {
            ops_per_thread: 20,
            threads: 4,
            value_size: 8,
        };

        let result = stress_same_bucket(Arc::clone(&manager), &config);
        assert_eq!(result.successful_ops, 80);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(manager.list_entries(0).unwrap().len(), 80);
    }

    #[test]
    fn cross_bucket_all_succeed() {
        let manager = manager();
        let config = StressConfig {
            ops_per_thread: 20,
            threads: 4,
            value_size: 8,
        };

        let result = stress_cross_bucket(Arc::clone(&manager), &config);
        assert_eq!(result.successful_ops, 80);
        for index in 0..4 {
            assert_eq!(manager.list_entries(index).unwrap().len(), 20);
        }
    }

    #[test]
    fn mixed_keeps_store_consistent() {
        let manager = manager();
        let result = stress_mixed_operations(Arc::clone(&manager), &StressConfig::default());
        assert_eq!(result.total_ops, 400);

        let listed: usize = (0..4).map(|i| manager.list_entries(i).unwrap().len()).sum();
        assert!(listed <= 16);
    }
}
