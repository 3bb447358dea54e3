//! Loose `"Name <addr>"` header parsing.
//!
//! These helpers never fail: malformed input is returned trimmed (or as-is)
//! rather than rejected.

/// Extract the bare address from a header value.
///
/// # Examples
/// - `"Felipe <felipe@example.com>"` → `"felipe@example.com"`
/// - `" plain@example.com "` → `"plain@example.com"`
pub fn extract_email(raw: &str) -> String {
    if let Some(start) = raw.find('<') {
        if let Some(end) = raw[start..].find('>') {
            return raw[start + 1..start + end].to_string();
        }
    }
    raw.trim().to_string()
}

/// Extract a human-readable name from a header value.
///
/// Prefers the display name segment (quotes stripped). Without one, falls back
/// to the local part of the address; without an `@`, returns the input.
///
/// # Examples
/// - `"\"Garcia, Felipe\" <felipe@example.com>"` → `"Garcia, Felipe"`
/// - `"felipe@example.com"` → `"felipe"`
pub fn extract_display_name(raw: &str) -> String {
    if let Some(idx) = raw.find('<') {
        if idx > 0 {
            let name = raw[..idx].trim().trim_matches('"');
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }

    let address = extract_email(raw);
    match address.find('@') {
        Some(at) if at > 0 => address[..at].to_string(),
        _ => raw.to_string(),
    }
}

/// Parse a comma-separated `To`/`Cc` value into bare addresses.
///
/// Splitting is naive: a quoted display name containing a comma yields a
/// stray fragment, which is kept as-is.
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|segment| extract_email(segment.trim()))
        .filter(|addr| !addr.is_empty())
        .collect()
}
