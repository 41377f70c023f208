// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Human-readable timestamps for labels and tick marks.

/// Format a time in seconds as `H:MM:SS` (one hour or more) or `M:SS`.
///
/// `None`, negative and non-finite inputs all format as `0:00`.
pub fn sec_to_hms(t: Option<f64>) -> String {
    let t = match t {
        Some(t) if t.is_finite() => t.max(0.0),
        _ => 0.0,
    };
    let total = t as u64;
    let hrs = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hrs > 0 {
        format!("{}:{:02}:{:02}", hrs, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Shorthand for labels that always have a value.
pub fn format_hms(t: f64) -> String {
    sec_to_hms(Some(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(sec_to_hms(Some(0.0)), "0:00");
        assert_eq!(sec_to_hms(Some(65.0)), "1:05");
        assert_eq!(sec_to_hms(Some(59.99)), "0:59");
        assert_eq!(sec_to_hms(Some(3599.0)), "59:59");
    }

    #[test]
    fn test_hours() {
        assert_eq!(sec_to_hms(Some(3600.0)), "1:00:00");
        assert_eq!(sec_to_hms(Some(3661.0)), "1:01:01");
        assert_eq!(format_hms(36000.0), "10:00:00");
    }

    #[test]
    fn test_missing_or_negative() {
        assert_eq!(sec_to_hms(None), "0:00");
        assert_eq!(sec_to_hms(Some(-4.0)), "0:00");
        assert_eq!(sec_to_hms(Some(f64::NAN)), "0:00");
    }
}
