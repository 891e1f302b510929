//! Report message scrubbing.
//!
//! Messages often come straight from log matches (fail2ban and the like),
//! so they can carry escape backslashes, our own addresses and mail
//! addresses that should not be published with a report.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder written over redacted substrings.
pub const REDACTION_MARKER: &str = "*";

/// Maximum report comment length, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 1024;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^@\s]*@[^@\s]*\.[^@\s]*").expect("email pattern is a valid regex")
});

/// Clean a report message before submission.
///
/// Removes backslashes, replaces every self identifier and anything that
/// looks like an email address with [`REDACTION_MARKER`], then truncates
/// to [`MAX_MESSAGE_LENGTH`] characters.
pub fn sanitize<S: AsRef<str>>(message: &str, self_identifiers: &[S]) -> String {
    let mut message = message.replace('\\', "");

    for identifier in self_identifiers {
        let identifier = identifier.as_ref();
        // str::replace with an empty pattern matches between every char
        if identifier.is_empty() {
            continue;
        }
        message = message.replace(identifier, REDACTION_MARKER);
    }

    let message = EMAIL_PATTERN.replace_all(&message, REDACTION_MARKER);

    message.chars().take(MAX_MESSAGE_LENGTH).collect()
}
