/// Flag-level checks for values the stores accept as-is. Bad input is
/// rejected here, at the edge, so the persisted records stay clean.

pub fn parse_http_link(value: &str) -> Result<String, String> {
    let link = value.trim();
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(link.to_string()),
        _ => Err(format!("not an http(s) link: {value}")),
    }
}

pub fn parse_hex_color(value: &str) -> Result<String, String> {
    let color = value.trim();
    let digits = color.strip_prefix('#').unwrap_or("");
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|ch| ch.is_ascii_hexdigit());
    if valid {
        Ok(color.to_string())
    } else {
        Err(format!("not a hex color like #7C3AED: {value}"))
    }
}

pub fn parse_non_empty(value: &str) -> Result<String, String> {
    let text = value.trim();
    if text.is_empty() {
        Err("value must not be blank".to_string())
    } else {
        Ok(text.to_string())
    }
}
