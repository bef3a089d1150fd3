//! Fixed-window arithmetic
//!
//! Pure functions deciding when a counting window has elapsed and when it
//! will reset. Deterministic, no I/O, no error conditions — the rest of the
//! engine layers storage and retries on top of these two decisions.

use std::time::{Duration, SystemTime};

/// Returns true when the window that started at `window_start` has elapsed.
///
/// A window is expired once `now - window_start >= window`, so a check at
/// exactly `window_start + window` already starts a fresh window. A `now`
/// earlier than `window_start` (clock skew between callers) is not expired.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use turnstile::window;
///
/// let start = SystemTime::now();
/// let window_len = Duration::from_secs(60);
/// assert!(!window::is_expired(start, start + Duration::from_secs(59), window_len));
/// assert!(window::is_expired(start, start + Duration::from_secs(60), window_len));
/// ```
pub fn is_expired(window_start: SystemTime, now: SystemTime, window: Duration) -> bool {
    match now.duration_since(window_start) {
        Ok(elapsed) => elapsed >= window,
        Err(_) => false,
    }
}

/// The instant the window that started at `window_start` resets.
pub fn reset_at(window_start: SystemTime, window: Duration) -> SystemTime {
    window_start + window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive_at_the_boundary() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let window = Duration::from_millis(60_000);

        assert!(!is_expired(start, start, window));
        assert!(!is_expired(start, start + Duration::from_millis(59_999), window));
        assert!(is_expired(start, start + Duration::from_millis(60_000), window));
        assert!(is_expired(start, start + Duration::from_millis(60_001), window));
    }

    #[test]
    fn now_before_window_start_is_not_expired() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let earlier = start - Duration::from_secs(5);

        assert!(!is_expired(start, earlier, Duration::from_secs(1)));
    }

    #[test]
    fn reset_instant_is_start_plus_window() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let window = Duration::from_secs(60);

        assert_eq!(reset_at(start, window), start + window);
    }
}
