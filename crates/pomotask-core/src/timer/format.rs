/// Format seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so 5999 seconds is `99:59`.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Percentage of `original_secs` already elapsed, rounded, in `0..=100`.
///
/// A zero-length countdown reports 0.
pub fn time_percentage(remaining_secs: u32, original_secs: u32) -> u32 {
    if original_secs == 0 {
        return 0;
    }
    let remaining = remaining_secs.min(original_secs) as f64;
    100 - (remaining / original_secs as f64 * 100.0).round() as u32
}
