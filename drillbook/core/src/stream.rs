//! Async Random Streams
//!
//! A paced stream of random numbers: each item is preceded by a fixed
//! suspension, so consumers see values trickle in over time.

use std::time::Duration;

use futures::future::join_all;
use rand::Rng;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

/// Items produced by [`random_stream`]
pub const STREAM_LEN: usize = 10;

/// Pause before each item of [`random_stream`]
pub const STREAM_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound of the values produced by [`random_stream`]
pub const STREAM_MAX_VALUE: f64 = 10.0;

/// Comprehensions run side by side in [`measure_runtime`]
const PARALLEL_COMPREHENSIONS: usize = 4;

/// Shortest accepted pause between items
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A stream of `count` values in `[0, max_value]`, one per `interval`.
///
/// The first value arrives one `interval` after the stream is created.
/// Intervals below one millisecond are rounded up.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn random_stream_with(
    count: usize,
    interval: Duration,
    max_value: f64,
) -> impl Stream<Item = f64> {
    let max_value = if max_value.is_finite() && max_value > 0.0 {
        max_value
    } else {
        0.0
    };
    let interval = interval.max(MIN_INTERVAL);

    let mut ticks = interval_at(Instant::now() + interval, interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    IntervalStream::new(ticks)
        .take(count)
        .map(move |_| rand::thread_rng().gen_range(0.0..=max_value))
}

/// Ten values in `[0, 10]`, one per second.
pub fn random_stream() -> impl Stream<Item = f64> {
    random_stream_with(STREAM_LEN, STREAM_INTERVAL, STREAM_MAX_VALUE)
}

/// Collect every value of [`random_stream`].
pub async fn async_comprehension() -> Vec<f64> {
    random_stream().collect().await
}

/// Run four comprehensions concurrently and return the elapsed seconds.
///
/// The streams overlap, so this takes about as long as one of them.
pub async fn measure_runtime() -> f64 {
    let start = Instant::now();
    let runs = join_all((0..PARALLEL_COMPREHENSIONS).map(|_| async_comprehension())).await;
    let elapsed = start.elapsed().as_secs_f64();

    info!(
        comprehensions = runs.len(),
        elapsed, "Measured parallel comprehensions"
    );
    elapsed
}
