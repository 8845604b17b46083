//! Poll delay schedule
//!
//! Deterministic Fibonacci-style backoff for result polling: quick early
//! retries that settle at a fixed ceiling, so a session stays responsive
//! while its worst-case latency remains bounded. There is no jitter and no
//! state shared between sessions; every call to [`delays`] produces a
//! fresh, finite schedule.

use std::time::Duration;

/// First seed of the delay pair, in milliseconds
const SEED_A_MS: u64 = 1_000;
/// Second seed of the delay pair, in milliseconds; also the first delay yielded
const SEED_B_MS: u64 = 2_000;

/// Default number of schedule entries (one per poll attempt)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Default ceiling for a single delay, in milliseconds
pub const DEFAULT_CAP_MS: u64 = 15_000;

/// Returns the poll delay schedule as a lazy iterator
///
/// The first two attempts both observe the initial 2000 ms delay; from the
/// third attempt on, the pair advances `(a, b) = (b, a + b)` and each delay
/// is clamped to `cap_ms`. With the defaults the schedule starts
/// `2000, 2000, 3000, 5000, 8000, 13000, 15000, 15000, ...` and contains
/// exactly `max_attempts` entries.
///
/// Exhausting the schedule is how a polling session times out; it is a
/// distinct condition from any server-reported state.
pub fn delays(max_attempts: u32, cap_ms: u64) -> impl Iterator<Item = Duration> {
    let mut pair = (SEED_A_MS, SEED_B_MS);
    (0..max_attempts).map(move |attempt| {
        if attempt > 1 {
            // saturating: sums past the cap are clamped anyway
            pair = (pair.1, pair.0.saturating_add(pair.1));
        }
        Duration::from_millis(pair.1.min(cap_ms))
    })
}
