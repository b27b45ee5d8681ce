pub mod amikool;
pub mod ping;
pub mod seen;
pub mod vctime;
pub mod vctop;

pub use amikool::amikool;
pub use ping::ping;
pub use seen::seen;
pub use vctime::vctime;
pub use vctop::vctop;

pub(crate) fn format_duration(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

pub(crate) fn format_relative(elapsed: chrono::Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if hours > 0 {
        format!(
            "{} hour{} and {} minute{} ago",
            hours,
            if hours == 1 { "" } else { "s" },
            minutes % 60,
            if minutes % 60 == 1 { "" } else { "s" },
        )
    } else {
        format!("{} minute{} ago", minutes, if minutes == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
    }

    #[test]
    fn test_format_duration_clamps_negative() {
        assert_eq!(format_duration(-5), "0s");
    }

    #[test]
    fn test_format_relative() {
        assert_eq!(format_relative(chrono::Duration::seconds(30)), "0 minutes ago");
        assert_eq!(format_relative(chrono::Duration::minutes(1)), "1 minute ago");
        assert_eq!(
            format_relative(chrono::Duration::minutes(185)),
            "3 hours and 5 minutes ago"
        );
        assert_eq!(format_relative(chrono::Duration::days(2)), "2 days ago");
    }
}
