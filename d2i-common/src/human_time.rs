//! Human-readable time formatting
//!
//! Release durations arrive from the backend in milliseconds and are shown
//! next to the track count in the disambiguation list.

const MS_PER_SECOND: u64 = 1000;
const SECONDS_PER_HOUR: u64 = 3600;

/// Format a release duration given in milliseconds.
///
/// - `HH:MM:SS` when the duration reaches one hour
/// - `MM:SS` otherwise
/// - empty string when the duration is absent or zero
///
/// Every component is zero-padded to two digits. Sub-second remainders are
/// truncated.
///
/// # Examples
///
/// ```
/// use d2i_common::human_time::format_release_duration;
///
/// assert_eq!(format_release_duration(Some(125_000)), "02:05");
/// assert_eq!(format_release_duration(Some(3_725_000)), "01:02:05");
/// assert_eq!(format_release_duration(None), "");
/// ```
pub fn format_release_duration(duration_ms: Option<u64>) -> String {
    let duration_ms = match duration_ms {
        Some(ms) if ms > 0 => ms,
        _ => return String::new(),
    };

    let total_seconds = duration_ms / MS_PER_SECOND;
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
