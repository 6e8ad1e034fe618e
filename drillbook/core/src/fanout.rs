//! Completion-Ordered Fan-Out
//!
//! Launch several randomized delays at once and collect their results in
//! the order they finish, not the order they were started. Since every
//! delay starts at (almost) the same instant, completion order is also
//! ascending delay order, up to the timer's millisecond resolution.
//!
//! Two flavours are provided:
//!
//! - [`task_wait_n`] spawns each delay as its own [`DelayTask`]
//! - [`wait_n`] polls plain futures on the caller's task, with no spawning

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::delay::wait_random;
use crate::tasks::{task_wait_random, DelayTask, TaskError};

/// Drain a set of in-flight futures in completion order.
///
/// The caller is suspended once per completed item.
async fn collect_as_completed<S, T>(mut pending: S, n: usize) -> Vec<T>
where
    S: futures::Stream<Item = T> + Unpin,
{
    let mut completed = Vec::with_capacity(n);
    while let Some(item) = pending.next().await {
        completed.push(item);
    }
    completed
}

/// Schedule `n` delay tasks and return their delays in completion order.
///
/// Fails only if a task was cancelled or panicked; the remaining tasks are
/// still awaited before the error is returned so none outlive the call.
pub async fn task_wait_n(n: usize, max_delay: f64) -> Result<Vec<f64>, TaskError> {
    debug!(n, max_delay, "Fanning out delay tasks");
    let pending: FuturesUnordered<DelayTask> =
        (0..n).map(|_| task_wait_random(max_delay)).collect();

    let results = collect_as_completed(pending, n).await;
    results.into_iter().collect()
}

/// Run `n` delays concurrently on the current task, in completion order.
pub async fn wait_n(n: usize, max_delay: f64) -> Vec<f64> {
    debug!(n, max_delay, "Fanning out delays");
    let pending: FuturesUnordered<_> = (0..n).map(|_| wait_random(max_delay)).collect();
    collect_as_completed(pending, n).await
}

/// Average wall time per delay of a [`wait_n`] run, in seconds.
///
/// Because the delays overlap, the result is at most `max_delay / n` plus
/// scheduling overhead, well below the mean of the delays themselves.
pub async fn measure_time(n: usize, max_delay: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }

    let start = Instant::now();
    wait_n(n, max_delay).await;
    let total = start.elapsed().as_secs_f64();

    #[allow(clippy::cast_precision_loss)]
    let per_delay = total / n as f64;
    info!(n, max_delay, total, per_delay, "Measured fan-out");
    per_delay
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Completion order can only swap values that land in the same timer tick
    fn assert_completion_ordered(delays: &[f64]) {
        for pair in delays.windows(2) {
            assert!(
                pair[1] >= pair[0] - 0.001,
                "{} completed after {}",
                pair[1],
                pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_wait_n_returns_n_bounded_values() {
        let delays = task_wait_n(8, 5.0).await.unwrap();
        assert_eq!(delays.len(), 8);
        assert!(delays.iter().all(|d| (0.0..=5.0).contains(d)));
        assert_completion_ordered(&delays);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_n_returns_n_bounded_values() {
        let delays = wait_n(12, 3.0).await;
        assert_eq!(delays.len(), 12);
        assert!(delays.iter().all(|d| (0.0..=3.0).contains(d)));
        assert_completion_ordered(&delays);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_count_is_empty() {
        assert!(task_wait_n(0, 10.0).await.unwrap().is_empty());
        assert!(wait_n(0, 10.0).await.is_empty());
        assert_eq!(measure_time(0, 10.0).await, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_runs_concurrently() {
        let start = Instant::now();
        let delays = task_wait_n(20, 4.0).await.unwrap();
        let elapsed = start.elapsed().as_secs_f64();

        let longest = delays.iter().copied().fold(0.0, f64::max);
        let sum: f64 = delays.iter().sum();
        // Bounded by the slowest delay, not their sum
        assert!(elapsed <= longest + 0.01, "elapsed {elapsed}, longest {longest}");
        assert!(elapsed < sum);
    }

    #[tokio::test(start_paused = true)]
    async fn test_measure_time_is_bounded() {
        let per_delay = measure_time(5, 2.0).await;
        assert!(per_delay >= 0.0);
        assert!(per_delay <= 2.0 / 5.0 + 0.01, "per_delay {per_delay}");
    }
}
