use regex_lite::Regex;
use std::sync::LazyLock;

/// Hard limit on interface names on the target devices
pub const MAX_LINK_ID_LEN: usize = 15;

/// Per-token length for the last-resort candidate (7 + 1 + 7 = 15)
const TRUNCATED_TOKEN_LEN: usize = 7;

/// Trailing run of model (`_3903`, `_51xx`, `_81xx`) and index (`_01`, `-01`) suffixes
static MODEL_SUFFIX_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:_(?:39|51|81)[0-9x]{2}|[_-]0[0-9])+$").ok()
});

static MODEL_NUMBER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").ok());

/// Site token of a hostname, tagged with the naming convention it matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteToken {
    /// `REGION-SITE-MODEL-INDEX`, e.g. `NGA-AJO-CNA5130-01` -> `AJO`
    Dashed(String),
    /// Underscore-delimited free text with model/index suffixes,
    /// e.g. `A_steel_sagamu_3903` -> `A_steel`
    Underscore(String),
}

impl SiteToken {
    pub fn parse(hostname: &str) -> Self {
        match match_dashed(hostname) {
            Some(site) => SiteToken::Dashed(site.to_string()),
            None => SiteToken::Underscore(match_underscore(hostname)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SiteToken::Dashed(s) | SiteToken::Underscore(s) => s,
        }
    }

    pub fn convention(&self) -> &'static str {
        match self {
            SiteToken::Dashed(_) => "dashed",
            SiteToken::Underscore(_) => "underscore",
        }
    }
}

/// Second dash-separated part when there are at least three parts and it is
/// exactly three letters
fn match_dashed(hostname: &str) -> Option<&str> {
    let parts: Vec<&str> = hostname.split('-').collect();
    if parts.len() < 3 {
        return None;
    }
    let site = parts[1];
    (site.len() == 3 && site.chars().all(|c| c.is_ascii_alphabetic())).then_some(site)
}

fn strip_model_suffixes(hostname: &str) -> &str {
    match MODEL_SUFFIX_RE.as_ref().and_then(|re| re.find(hostname)) {
        Some(m) => &hostname[..m.start()],
        None => hostname,
    }
}

/// Strip trailing model/index suffixes, then keep the first underscore part,
/// or the first two when the first is a single character (`A_steel`)
fn match_underscore(hostname: &str) -> String {
    let stem = strip_model_suffixes(hostname);
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() >= 2 && parts[0].chars().count() == 1 {
        format!("{}_{}", parts[0], parts[1])
    } else {
        parts[0].to_string()
    }
}

pub fn extract_site_token(hostname: &str) -> String {
    match SiteToken::parse(hostname) {
        SiteToken::Dashed(s) | SiteToken::Underscore(s) => s,
    }
}

/// First run of four consecutive digits, or an empty string
pub fn extract_model_token(hostname: &str) -> String {
    MODEL_NUMBER_RE
        .as_ref()
        .and_then(|re| re.find(hostname))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Synthesize a short link identifier from the local and remote hostnames.
///
/// Tries `LOCAL-REMOTEMODEL`, then `LOCAL-REMOTE`, then both tokens cut to
/// seven characters. The result never exceeds `MAX_LINK_ID_LEN` characters.
/// Distinct hostname pairs sharing seven-character prefixes collide in the
/// last form.
pub fn derive_link_id(local_host: &str, remote_host: &str) -> String {
    let local_host = local_host.trim();
    let remote_host = remote_host.trim();
    if local_host.is_empty() || remote_host.is_empty() {
        return String::new();
    }

    let local = extract_site_token(local_host);
    let remote = extract_site_token(remote_host);
    let remote_model = extract_model_token(remote_host);

    let fits = |s: &str| s.chars().count() <= MAX_LINK_ID_LEN;

    let full = format!("{}-{}{}", local, remote, remote_model);
    if fits(&full) {
        return full;
    }
    let short = format!("{}-{}", local, remote);
    if fits(&short) {
        return short;
    }
    format!(
        "{}-{}",
        truncate(&local, TRUNCATED_TOKEN_LEN),
        truncate(&remote, TRUNCATED_TOKEN_LEN)
    )
}
