/// `H:MM:SS` once an hour has passed, `MM:SS` before that.
pub fn format_time(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    match hours {
        0 => format!("{minutes:02}:{seconds:02}"),
        h => format!("{h}:{minutes:02}:{seconds:02}"),
    }
}

/// `count` followed by `noun`, pluralized with a trailing `s` unless it is one.
pub fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
