use colored::*;

/// Color a piece of text according to a build or job status.
///
/// `text` is usually the status itself, already padded to its column; the
/// escape codes would otherwise count towards the padding width.
pub fn status(status: &str, text: &str) -> ColoredString {
    match status {
        "SUCCESS" => text.green(),
        "FAILURE" => text.red(),
        "UNSTABLE" => text.yellow(),
        "BUILDING" => text.cyan(),
        "ABORTED" | "NOT_BUILT" | "PENDING" | "DISABLED" => text.dimmed(),
        _ => text.normal(),
    }
}

/// Color scheme for section headers such as `Found 3 job(s):`
pub fn section_header(text: &str) -> ColoredString {
    text.bold()
}

/// Color scheme for guidance printed to stderr
pub fn hint(text: &str) -> ColoredString {
    text.dimmed()
}

/// Color scheme for confirmations
pub fn success(text: &str) -> ColoredString {
    text.green()
}
