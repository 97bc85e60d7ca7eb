//! Email verification-code primitives.
//!
//! Codes are 6-digit numeric strings with a 15-minute validity window,
//! keyed by email (one outstanding code per address). This module owns the
//! generation and window arithmetic; storage lives in the repository layer.

use rand::Rng;

use crate::types::Timestamp;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Validity window of a stored code, in minutes.
pub const CODE_TTL_MINUTES: i64 = 15;

/// Generate a uniformly random 6-digit verification code.
///
/// The leading digit is never zero, matching the `100000..=999999` range the
/// signup emails have always carried.
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..1_000_000).to_string()
}

/// Minutes left on an unexpired code's resend cooldown, rounded up.
///
/// Returns `None` when the window has fully elapsed (the code is expired and
/// may be replaced). A just-issued code reports the full window.
pub fn minutes_remaining(created_at: Timestamp, now: Timestamp) -> Option<i64> {
    let elapsed_secs = now.signed_duration_since(created_at).num_seconds();
    let remaining_secs = CODE_TTL_MINUTES * 60 - elapsed_secs;
    if remaining_secs <= 0 {
        None
    } else {
        Some((remaining_secs + 59) / 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn generated_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn fresh_code_reports_full_window() {
        let now = Utc::now();
        assert_eq!(minutes_remaining(now, now), Some(CODE_TTL_MINUTES));
    }

    #[test]
    fn partially_elapsed_window_rounds_up() {
        let now = Utc::now();
        let created = now - Duration::minutes(5) - Duration::seconds(1);
        // 9 minutes 59 seconds left -> ceil to 10.
        assert_eq!(minutes_remaining(created, now), Some(10));
    }

    #[test]
    fn last_second_still_counts_as_one_minute() {
        let now = Utc::now();
        let created = now - Duration::seconds(CODE_TTL_MINUTES * 60 - 1);
        assert_eq!(minutes_remaining(created, now), Some(1));
    }

    #[test]
    fn expired_code_yields_none() {
        let now = Utc::now();
        let created = now - Duration::minutes(CODE_TTL_MINUTES);
        assert_eq!(minutes_remaining(created, now), None);

        let long_expired = now - Duration::hours(2);
        assert_eq!(minutes_remaining(long_expired, now), None);
    }
}
