use chrono::{Local, TimeZone};

/// Jenkins ball colors, matched by prefix so `_anime` variants (a build in
/// progress) map to the same status as the settled color.
const COLOR_STATUS: &[(&str, &str)] = &[
    ("blue", "SUCCESS"),
    ("red", "FAILURE"),
    ("yellow", "UNSTABLE"),
    ("grey", "PENDING"),
    ("aborted", "ABORTED"),
    ("notbuilt", "NOT_BUILT"),
    ("disabled", "DISABLED"),
];

/// Convert a Jenkins build color into a status string.
///
/// Unknown colors are upper-cased and passed through. Folders and other
/// non-buildable items have no color and map to an empty status.
pub fn status_from_color(color: &str) -> String {
    COLOR_STATUS
        .iter()
        .find(|(prefix, _)| color.starts_with(prefix))
        .map(|(_, status)| status.to_string())
        .unwrap_or_else(|| color.to_uppercase())
}

/// Status of a single build: `BUILDING` while running, else its result.
pub fn build_status(result: Option<&str>, building: bool) -> String {
    if building {
        return "BUILDING".to_string();
    }
    match result {
        Some(result) if !result.is_empty() => result.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Render a millisecond duration using the largest whole unit.
///
/// Picks days, hours, minutes or seconds, whichever is the largest unit with
/// a count of at least one. Sub-second durations render as `0 seconds`.
pub fn format_duration(milliseconds: u64) -> String {
    let seconds = milliseconds / 1000;
    if seconds < 60 {
        return plural(seconds, "second");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }

    plural(hours / 24, "day")
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Format an epoch-millisecond timestamp in local time.
///
/// Returns `None` for non-positive or out-of-range values, which Jenkins
/// uses for builds that have not started.
pub fn format_timestamp(milliseconds: i64) -> Option<String> {
    if milliseconds <= 0 {
        return None;
    }
    Local
        .timestamp_millis_opt(milliseconds)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// A job locator split into its leaf name and enclosing folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPath {
    /// Leaf job name, e.g. `master` in `team/job/api/job/master`
    pub name: String,
    /// Folder names from outermost to innermost
    pub parents: Vec<String>,
}

impl JobPath {
    /// All segments in order, folders first and the leaf last.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.parents
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
    }
}

/// Split a job locator on Jenkins' `/job/` folder separator.
///
/// A locator copied from a Jenkins URL path (`job/a/job/b/`) is accepted
/// too: the leading `job/` and surrounding slashes are dropped first.
pub fn parse_job_path(path: &str) -> JobPath {
    let trimmed = path.trim_matches('/');
    let trimmed = trimmed.strip_prefix("job/").unwrap_or(trimmed);

    let mut segments: Vec<String> = trimmed
        .split("/job/")
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    let name = segments.pop().unwrap_or_default();
    JobPath {
        name,
        parents: segments,
    }
}

/// Format a `Key: value` line with the key padded to a fixed column.
///
/// Multi-line values start on the line after the key and are indented to the
/// value column.
pub fn format_field(key: &str, value: &str) -> String {
    let label = format!("{}:", key);
    if !value.contains('\n') {
        return format!("{:<20} {}", label, value);
    }

    let mut out = format!("{:<20}", label);
    for line in value.lines() {
        out.push('\n');
        out.push_str(&format!("{:<20} {}", "", line));
    }
    out
}
