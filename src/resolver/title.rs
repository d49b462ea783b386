//! Title parsing: `app` or `app::file`.

use crate::{Error, Result};

/// Separator between the application name and the file token.
pub const TITLE_SEPARATOR: &str = "::";

/// A parsed title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub app: String,
    /// File name or relative path under the application's base directory
    pub file: Option<String>,
}

/// Split a title at the first separator.
///
/// Everything after the first `::` is the file token, so it may contain
/// further separators or path components. An empty file token (`app::`) is
/// the same as no file.
pub fn parse_title(title: &str) -> Result<Title> {
    let (app, file) = match title.split_once(TITLE_SEPARATOR) {
        Some((app, file)) => (app, Some(file)),
        None => (title, None),
    };

    if app.is_empty() {
        return Err(Error::InvalidTitle(title.to_string()));
    }

    Ok(Title {
        app: app.to_string(),
        file: file.filter(|f| !f.is_empty()).map(str::to_string),
    })
}
