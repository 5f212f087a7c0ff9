pub fn trim_payload(raw: &str) -> &str {
    // Scanners like to append CR/LF and some prepend a BOM
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

pub fn normalize_mac(mac: &str) -> String {
    // AA:bb-CC... -> AABBCC...
    mac.chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Splits a `key: value` or `key=value` segment at the first separator.
/// Both halves are trimmed, a segment without separator or with an empty
/// half gives None.
pub fn split_key_value(segment: &str) -> Option<(&str, &str)> {
    let pos = segment.find(|c: char| c == ':' || c == '=')?;

    let key = segment[..pos].trim();
    let value = segment[pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_payload() {
        assert_eq!(trim_payload("  AST-9999 \r\n"), "AST-9999");
        assert_eq!(trim_payload("\u{FEFF}SN123456"), "SN123456");
        assert_eq!(trim_payload("   "), "");
    }

    #[test]
    fn test_normalize_mac() {
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee:ff"), "AABBCCDDEEFF");
        assert_eq!(normalize_mac("aa-bb-cc-dd-ee-ff"), "AABBCCDDEEFF");
        assert_eq!(normalize_mac("112233445566"), "112233445566");
    }

    #[test]
    fn test_split_key_value() {
        assert_eq!(split_key_value("SN:XYZ789"), Some(("SN", "XYZ789")));
        assert_eq!(split_key_value(" serial = 42 "), Some(("serial", "42")));
        assert_eq!(split_key_value("MAC: aa:bb:cc:dd:ee:ff"), Some(("MAC", "aa:bb:cc:dd:ee:ff")));
        assert_eq!(split_key_value("no separator"), None);
        assert_eq!(split_key_value("SN:"), None);
        assert_eq!(split_key_value(":value"), None);
    }
}
