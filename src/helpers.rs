use chrono::{DateTime, Utc};

/// Raw CPU counters at or above this value render as fractional cores,
/// below it as-is with an "m" suffix. The counter's unit comes from the
/// source telemetry and is not validated here.
pub const CPU_CORE_THRESHOLD: f64 = 1_000_000.0;

pub fn format_age(started_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - started_at).num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

pub fn format_memory(bytes: f64) -> String {
    if bytes > 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / 1024.0 / 1024.0)
    } else if bytes > 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_cpu(raw: f64) -> String {
    if raw >= CPU_CORE_THRESHOLD {
        format!("{:.2} cores", raw / CPU_CORE_THRESHOLD)
    } else {
        format!("{} m", raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn age_tiers_floor_without_rounding() {
        let start = at(0);
        assert_eq!(format_age(start, at(0)), "0s");
        assert_eq!(format_age(start, at(59)), "59s");
        assert_eq!(format_age(start, at(60)), "1m");
        assert_eq!(format_age(start, at(119)), "1m");
        assert_eq!(format_age(start, at(3599)), "59m");
        assert_eq!(format_age(start, at(3600)), "1h");
        assert_eq!(format_age(start, at(86399)), "23h");
        assert_eq!(format_age(start, at(86400)), "1d");
        assert_eq!(format_age(start, at(3 * 86400 + 7200)), "3d");
    }

    #[test]
    fn age_clamps_future_start_times() {
        assert_eq!(format_age(at(100), at(0)), "0s");
    }

    #[test]
    fn memory_tiers() {
        assert_eq!(format_memory(512.0), "512 B");
        assert_eq!(format_memory(1024.0), "1024 B");
        assert_eq!(format_memory(2048.0), "2.00 KB");
        assert_eq!(format_memory(2_097_152.0), "2.00 MB");
        assert_eq!(format_memory(1_048_576.0), "1024.00 KB");
        assert_eq!(format_memory(1_572_864.0), "1.50 MB");
    }

    #[test]
    fn cpu_threshold_is_inclusive() {
        assert_eq!(format_cpu(45.0), "45 m");
        assert_eq!(format_cpu(999_999.0), "999999 m");
        assert_eq!(format_cpu(1_000_000.0), "1.00 cores");
        assert_eq!(format_cpu(2_500_000.0), "2.50 cores");
    }
}
