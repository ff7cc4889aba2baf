/// Compact human-readable duration used in heatmap labels and tooltips.
///
/// Below a minute only seconds are shown; below an hour minutes with a
/// seconds remainder; above an hour, hours and minutes.
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    if seconds < 60.0 {
        return format!("{}sec", seconds.round() as u64);
    }

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;

    if hours == 0 {
        let remaining = (seconds % 60.0).round() as u64;
        if remaining > 0 {
            format!("{minutes}min {remaining}sec")
        } else {
            format!("{minutes}min")
        }
    } else if minutes > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{hours}h")
    }
}

/// Seconds since midnight rendered as `HH:MM:SS` for the playback clock.
pub fn format_clock(seconds_since_midnight: f64) -> String {
    let total = seconds_since_midnight.max(0.0) as u64 % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::{format_clock, format_duration};

    #[test]
    fn sub_minute_durations_round_to_seconds() {
        assert_eq!(format_duration(0.0), "0sec");
        assert_eq!(format_duration(42.4), "42sec");
        assert_eq!(format_duration(59.4), "59sec");
    }

    #[test]
    fn sub_hour_durations_show_minutes_and_remainder() {
        assert_eq!(format_duration(60.0), "1min");
        assert_eq!(format_duration(90.0), "1min 30sec");
        assert_eq!(format_duration(600.0), "10min");
    }

    #[test]
    fn hour_durations_drop_seconds() {
        assert_eq!(format_duration(3600.0), "1h");
        assert_eq!(format_duration(3660.0), "1h 1min");
        assert_eq!(format_duration(7323.0), "2h 2min");
    }

    #[test]
    fn negative_input_clamps_to_zero() {
        assert_eq!(format_duration(-5.0), "0sec");
    }

    #[test]
    fn clock_wraps_at_midnight() {
        assert_eq!(format_clock(0.0), "00:00:00");
        assert_eq!(format_clock(3725.0), "01:02:05");
        assert_eq!(format_clock(86_400.0 + 60.0), "00:01:00");
    }
}
