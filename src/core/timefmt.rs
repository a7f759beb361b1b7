//! Relative-time formatting for last-heard displays
//!
//! Output is time-dependent and never cached; callers re-evaluate on every
//! refresh pass.

/// Time units, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    const ALL: [Unit; 7] = [
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Week,
        Unit::Month,
        Unit::Year,
    ];

    /// Upper cutoff of the band this unit covers, in seconds.
    pub fn cutoff_secs(self) -> f64 {
        match self {
            Unit::Second => 59.0,
            Unit::Minute => 3_600.0,
            Unit::Hour => 86_400.0,
            Unit::Day => 86_400.0 * 7.0,
            Unit::Week => 86_400.0 * 30.0,
            Unit::Month => 86_400.0 * 365.0,
            Unit::Year => f64::INFINITY,
        }
    }

    /// Duration of one unit, in seconds.
    pub fn duration_secs(self) -> f64 {
        match self {
            Unit::Second => 1.0,
            Unit::Minute => 60.0,
            Unit::Hour => 3_600.0,
            Unit::Day => 86_400.0,
            Unit::Week => 86_400.0 * 7.0,
            Unit::Month => 86_400.0 * 30.0,
            Unit::Year => 86_400.0 * 365.0,
        }
    }

    fn label(self, count: i64) -> &'static str {
        match (self, count == 1) {
            (Unit::Second, true) => "second",
            (Unit::Second, false) => "seconds",
            (Unit::Minute, true) => "minute",
            (Unit::Minute, false) => "minutes",
            (Unit::Hour, true) => "hour",
            (Unit::Hour, false) => "hours",
            (Unit::Day, true) => "day",
            (Unit::Day, false) => "days",
            (Unit::Week, true) => "week",
            (Unit::Week, false) => "weeks",
            (Unit::Month, true) => "month",
            (Unit::Month, false) => "months",
            (Unit::Year, true) => "year",
            (Unit::Year, false) => "years",
        }
    }
}

/// Pick the unit and count for a signed delta (target minus now) in seconds.
///
/// `None` means the delta falls in the "just now" band (under 59 s).
pub fn relative_unit(delta_seconds: f64) -> Option<(i64, Unit)> {
    let abs = delta_seconds.abs();
    let unit = Unit::ALL
        .into_iter()
        .find(|u| u.cutoff_secs() > abs)
        .unwrap_or(Unit::Year);
    if unit == Unit::Second {
        return None;
    }
    let count = ((abs / unit.duration_secs()).floor() as i64).max(1);
    Some((count, unit))
}

/// Render a timestamp relative to `now_secs` as a short phrase.
///
/// Past timestamps read "N units ago", future ones "in N units"; anything
/// within 59 s is "just now"; non-finite inputs are "unknown".
pub fn relative_time_string(timestamp_secs: f64, now_secs: f64) -> String {
    if !timestamp_secs.is_finite() || !now_secs.is_finite() {
        return "unknown".to_string();
    }
    let delta = (timestamp_secs - now_secs).round();
    match relative_unit(delta) {
        None => "just now".to_string(),
        Some((count, unit)) => {
            let label = unit.label(count);
            if delta < 0.0 {
                format!("{count} {label} ago")
            } else {
                format!("in {count} {label}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_is_unknown() {
        assert_eq!(relative_time_string(f64::NAN, 0.0), "unknown");
        assert_eq!(relative_time_string(f64::INFINITY, 0.0), "unknown");
        assert_eq!(relative_time_string(0.0, f64::NAN), "unknown");
    }

    #[test]
    fn under_a_minute_is_just_now() {
        assert_eq!(relative_time_string(1000.0, 1000.0), "just now");
        assert_eq!(relative_time_string(1000.0 - 58.0, 1000.0), "just now");
        assert_eq!(relative_time_string(1000.0 + 30.0, 1000.0), "just now");
    }

    #[test]
    fn minute_band() {
        assert_eq!(relative_time_string(0.0, 90.0), "1 minute ago");
        assert_eq!(relative_time_string(0.0, 59.0 * 60.0), "59 minutes ago");
    }

    #[test]
    fn larger_bands() {
        let now = 1_000_000.0;
        assert_eq!(relative_time_string(now - 2.0 * 3_600.0, now), "2 hours ago");
        assert_eq!(relative_time_string(now - 3.0 * 86_400.0, now), "3 days ago");
        assert_eq!(
            relative_time_string(now - 2.0 * 7.0 * 86_400.0, now),
            "2 weeks ago"
        );
        assert_eq!(
            relative_time_string(now - 40.0 * 86_400.0, now),
            "1 month ago"
        );
        assert_eq!(
            relative_time_string(now - 2.0 * 365.0 * 86_400.0, now),
            "2 years ago"
        );
    }

    #[test]
    fn future_phrasing() {
        assert_eq!(relative_time_string(3.0 * 3_600.0, 0.0), "in 3 hours");
    }

    #[test]
    fn chosen_unit_matches_cutoff_band() {
        // For a sweep of deltas, the selected unit's cutoff must exceed the
        // absolute delta while every smaller unit's cutoff does not.
        let deltas = [
            -75.0,
            -3_599.0,
            -3_601.0,
            -90_000.0,
            -700_000.0,
            -3_000_000.0,
            -40_000_000.0,
            120.0,
            900_000.0,
        ];
        for delta in deltas {
            let (count, unit) = relative_unit(delta).expect("outside just-now band");
            assert!(unit.cutoff_secs() > delta.abs(), "delta {delta}");
            assert!(count >= 1, "delta {delta}");
            let smaller: Vec<Unit> = Unit::ALL
                .into_iter()
                .take_while(|&u| u != unit)
                .collect();
            for u in smaller {
                assert!(u.cutoff_secs() <= delta.abs(), "delta {delta}");
            }
        }
    }
}
