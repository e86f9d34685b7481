use chrono::{DateTime, Utc};
use std::path::{Component, Path};

/// Name used for output files of devices without a hostname
pub const UNNAMED_DEVICE: &str = "unnamed-device";

/// Make a string safe to use as a file name.
/// Whitespace runs become `_`, anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn safe_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_whitespace = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}

/// Output file name for a rendered device config,
/// e.g. "NGA-AJO-CNA5130-01" -> "NGA-AJO-CNA5130-01_20260101T120000Z.txt"
pub fn output_filename(hostname: &str, timestamp: Option<DateTime<Utc>>) -> String {
    let hostname = hostname.trim();
    let base = if hostname.is_empty() { UNNAMED_DEVICE } else { hostname };
    let name = match timestamp {
        Some(ts) => format!("{}_{}.txt", base, ts.format("%Y%m%dT%H%M%SZ")),
        None => format!("{}.txt", base),
    };
    safe_filename(&name)
}

/// Accept only a single normal path component, so the name stays inside the
/// directory it is served from. `a..b.txt` is fine, `..` is not.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
