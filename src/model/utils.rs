use chrono::Duration as ChronoDuration;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Human wording for how long ago a record was touched, for the leaderboard footer.
#[must_use]
pub fn format_time_ago(td: ChronoDuration) -> String {
    let secs = td.num_seconds();

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;

    if secs < 0 {
        "in the future".to_string()
    } else if secs >= WEEK {
        plural(secs / WEEK, "week")
    } else if secs >= DAY {
        plural(secs / DAY, "day")
    } else if secs >= HOUR {
        plural(secs / HOUR, "hour")
    } else if secs >= MINUTE {
        plural(secs / MINUTE, "minute")
    } else if secs < 5 {
        "just now".to_string()
    } else {
        plural(secs, "second")
    }
}
