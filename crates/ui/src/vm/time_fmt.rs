use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// Render a seconds count the way the cards show timing: sub-minute values
/// with one decimal ("2.5s"), longer ones as minutes and seconds ("1m 05s").
#[must_use]
pub fn format_seconds(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    if seconds < 60.0 {
        return format!("{seconds:.1}s");
    }

    let whole = seconds as u64;
    format!("{}m {:02}s", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_minute_uses_one_decimal() {
        assert_eq!(format_seconds(2.5), "2.5s");
        assert_eq!(format_seconds(0.0), "0.0s");
    }

    #[test]
    fn minutes_and_seconds_above_a_minute() {
        assert_eq!(format_seconds(65.4), "1m 05s");
        assert_eq!(format_seconds(120.0), "2m 00s");
    }

    #[test]
    fn negative_input_clamps_to_zero() {
        assert_eq!(format_seconds(-3.0), "0.0s");
    }
}
