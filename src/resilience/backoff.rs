//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retry `attempt` (1-based): `base_ms * 2^(attempt-1)`, capped at
/// `max_ms`, plus up to 10% jitter. Attempt 0 waits nothing.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_then_caps() {
        let b1 = calculate_backoff(1, 200, 5000);
        assert!(b1.as_millis() >= 200 && b1.as_millis() < 220);

        let b2 = calculate_backoff(2, 200, 5000);
        assert!(b2.as_millis() >= 400 && b2.as_millis() < 440);

        let capped = calculate_backoff(20, 200, 5000);
        assert!(capped.as_millis() >= 5000 && capped.as_millis() < 5500);
    }

    #[test]
    fn test_zero_attempt_and_tiny_delays() {
        assert_eq!(calculate_backoff(0, 200, 5000), Duration::ZERO);
        assert_eq!(calculate_backoff(1, 5, 5000), Duration::from_millis(5));
    }
}
