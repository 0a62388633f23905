//! HTTP date handling for `Last-Modified` / `If-Modified-Since`

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Whether a file modified at `modified` is unchanged since the client's
/// `If-Modified-Since` value
///
/// Comparison is at second precision, since that is all the header carries.
/// An unparsable header means "send the file".
pub fn not_modified_since(if_modified_since: &str, modified: SystemTime) -> bool {
    let Ok(since) = DateTime::parse_from_rfc2822(if_modified_since.trim()) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}
