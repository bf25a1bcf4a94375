//! Export file names.

use std::path::Path;

use chrono::NaiveDateTime;

/// `strftime` pattern of the timestamp suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Characters of the text kept in the file name.
const TEXT_PREFIX_CHARS: usize = 10;

/// Build `label_<icon>_<text>_<YYYYMMDD_HHMMSS>.png`.
///
/// `<icon>` is the icon file stem or `no_icon`. `<text>` is the first ten
/// characters of the text with spaces replaced by underscores, or `no_text`.
/// Path separators and control characters are replaced too so the result
/// is always a single path component.
#[must_use]
pub fn export_filename(icon: Option<&Path>, text: &str, timestamp: NaiveDateTime) -> String {
    let icon_name = icon
        .and_then(Path::file_stem)
        .map_or_else(|| "no_icon".to_string(), |stem| stem.to_string_lossy().into_owned());

    let text_short = if text.is_empty() {
        "no_text".to_string()
    } else {
        text.chars()
            .take(TEXT_PREFIX_CHARS)
            .map(|ch| match ch {
                ' ' | '/' | '\\' => '_',
                ch if ch.is_control() => '_',
                ch => ch,
            })
            .collect()
    };

    format!(
        "label_{icon_name}_{text_short}_{}.png",
        timestamp.format(TIMESTAMP_FORMAT)
    )
}
