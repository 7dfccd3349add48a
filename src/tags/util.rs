//! Small parsing helpers for constrained tag values.

/// Parse strings like:
/// - "3" -> Some((3, None))
/// - "3/12" -> Some((3, Some(12)))
pub(crate) fn parse_slash_pair_u32(s: &str) -> Option<(u32, Option<u32>)> {
    let s = s.trim();
    match s.split_once('/') {
        None => parse_u32(s).map(|n| (n, None)),
        Some((n, total)) => Some((parse_u32(n)?, Some(parse_u32(total)?))),
    }
}

pub(crate) fn parse_u32(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

/// ID3 flags are stored as "0" or "1".
pub(crate) fn parse_flag(s: &str) -> Option<bool> {
    match s.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Multi-valued text frames separate values with NUL; keep the first.
pub(crate) fn first_value(raw: &str) -> Option<&str> {
    raw.split('\0').next().filter(|v| !v.is_empty())
}
