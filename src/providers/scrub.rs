use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Key prefixes whose trailing token is always a credential.
const PREFIX_PATTERNS: [&str; 4] = ["sk-", "sk_live_", "ghp_", "AIza"];

/// Markers followed by a credential value.
const MARKER_PATTERNS: [&str; 10] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "\"authorization\":\"Bearer ",
    "api_key=",
    "access_token=",
    "private_key=",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "\"privateKey\":\"",
    "\"private_key\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|&(_, c)| !is_secret_char(c))
        .map_or(input.len(), |(i, _)| from + i)
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        // Bare marker without a value.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        scrubbed.replace_range(start..end, REDACTED);
        search_from = start + REDACTED.len();
    }
}

/// Redact `0x`-prefixed 64-hex-digit runs (signing keys for the ledger).
fn scrub_hex_private_keys(scrubbed: &mut String) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find("0x") {
        let start = search_from + rel;
        let digits = scrubbed[start + 2..]
            .chars()
            .take_while(char::is_ascii_hexdigit)
            .count();
        if digits == 64 {
            scrubbed.replace_range(start..start + 2 + digits, REDACTED);
            search_from = start + REDACTED.len();
        } else {
            search_from = start + 2 + digits;
        }
    }
}

fn needs_scrubbing(input: &str) -> bool {
    PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|pattern| input.contains(pattern))
        || input.contains("0x")
}

/// Scrub known secret-like token patterns from provider error strings.
///
/// Redacts API keys (`sk-…`), bearer headers, `api_key=`/`access_token=`
/// query and JSON forms, and 32-byte hex private keys. Wallet addresses
/// (20-byte hex) are left intact.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !needs_scrubbing(input) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for pattern in PREFIX_PATTERNS.iter().chain(MARKER_PATTERNS.iter()) {
        scrub_after_marker(&mut scrubbed, pattern);
    }
    scrub_hex_private_keys(&mut scrubbed);

    if scrubbed == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(scrubbed)
    }
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let scrubbed = scrubbed.as_ref();
    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &scrubbed[..end])
}

/// Sanitized `"<status>: <body>"` text for a failed HTTP response.
pub async fn response_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    format!("{status}: {}", sanitize_api_error(body.trim()))
}
