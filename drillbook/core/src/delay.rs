//! Randomized Delay Suspension
//!
//! The smallest unit of cooperative work in this crate: draw a random
//! duration, suspend the current task for that long on the runtime timer,
//! and hand the duration back. Other tasks on the same runtime keep running
//! while this one is parked.

use std::time::Duration;

use rand::Rng;
use tracing::{trace, warn};

/// Upper bound used when the caller does not pick one (seconds)
pub const DEFAULT_MAX_DELAY: f64 = 10.0;

/// Normalise a caller-supplied bound.
///
/// Negative, zero, and non-finite bounds all collapse to `0.0`.
fn effective_bound(max_delay: f64) -> f64 {
    if max_delay.is_finite() && max_delay > 0.0 {
        return max_delay;
    }
    if max_delay != 0.0 {
        warn!(max_delay, "Unusable delay bound, waiting zero seconds");
    }
    0.0
}

/// Draw a delay uniformly from `[0, max_delay]` without suspending.
pub fn sample_delay<R: Rng + ?Sized>(rng: &mut R, max_delay: f64) -> f64 {
    let bound = effective_bound(max_delay);
    if bound == 0.0 {
        return 0.0;
    }
    rng.gen_range(0.0..=bound)
}

/// Suspend for `delay` seconds on the runtime timer.
///
/// Delays too long for a [`Duration`] saturate; the timer already treats
/// anything past its horizon as "far future".
async fn suspend_for(delay: f64) {
    trace!(delay, "Suspending");
    let duration = Duration::try_from_secs_f64(delay).unwrap_or(Duration::MAX);
    tokio::time::sleep(duration).await;
}

/// Wait a random number of seconds in `[0, max_delay]` and return it.
///
/// # Example
///
/// ```ignore
/// let waited = drillbook_core::delay::wait_random(3.0).await;
/// assert!((0.0..=3.0).contains(&waited));
/// ```
pub async fn wait_random(max_delay: f64) -> f64 {
    // ThreadRng is !Send; keep it out of scope across the await
    let delay = sample_delay(&mut rand::thread_rng(), max_delay);
    suspend_for(delay).await;
    delay
}

/// [`wait_random`] with [`DEFAULT_MAX_DELAY`]
pub async fn wait_random_default() -> f64 {
    wait_random(DEFAULT_MAX_DELAY).await
}

/// Wait a random delay drawn from a caller-supplied generator.
///
/// Useful for reproducible runs with a seeded RNG. The generator is only
/// borrowed for the draw, not across the suspension.
pub async fn wait_random_with<R: Rng + ?Sized>(rng: &mut R, max_delay: f64) -> f64 {
    let delay = sample_delay(rng, max_delay);
    suspend_for(delay).await;
    delay
}
