use chrono::NaiveDateTime;
use std::path::Path;

pub const PROJECT_FILE_EXTENSION: &str = "xml";
pub const DEFAULT_FILE_STEM: &str = "Project";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// Union of what Windows, macOS and Linux refuse in a file name, so project
// folders can be copied between machines.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

fn is_illegal(c: char) -> bool {
    c.is_control() || ILLEGAL_CHARS.contains(&c)
}

/// Strip illegal characters and replace spaces with underscores. Falls back
/// to [`DEFAULT_FILE_STEM`] when nothing usable is left.
pub fn sanitize_file_stem(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| !is_illegal(*c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if sanitized.trim().is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        sanitized
    }
}

/// `<sanitized-name>_<YYYYMMDD_HHMMSS>.xml`
pub fn project_file_name(name: &str, stamp: &NaiveDateTime) -> String {
    format!(
        "{}_{}.{PROJECT_FILE_EXTENSION}",
        sanitize_file_stem(name),
        stamp.format(TIMESTAMP_FORMAT)
    )
}

/// Same as [`project_file_name`] with a short token before the extension,
/// used when the timestamped name is already taken.
pub fn disambiguated_file_name(name: &str, stamp: &NaiveDateTime, token: &str) -> String {
    format!(
        "{}_{}_{token}.{PROJECT_FILE_EXTENSION}",
        sanitize_file_stem(name),
        stamp.format(TIMESTAMP_FORMAT)
    )
}

pub fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_FILE_EXTENSION))
}
