//! Injectable time source for cache expiry.

use std::time::Instant;

/// Time source for expiry decisions.
///
/// The cache reads the current instant through this trait so tests can
/// advance time without sleeping.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall-clock time source backed by `Instant::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = manual::ManualClock::new();
        let before = clock.now();
        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.now() - before, Duration::from_secs(60));
    }
}
