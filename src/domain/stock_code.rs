//! Stock code normalisation.
//!
//! Corp detail and finance lookups are keyed by the `A`-prefixed corp code
//! ("A005930"); the price endpoint takes the bare six-digit code.

const CORP_CODE_PREFIX: char = 'A';

pub fn corp_code_for(stock_code: &str) -> String {
    let trimmed = stock_code.trim();
    if trimmed.starts_with(CORP_CODE_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", CORP_CODE_PREFIX, trimmed)
    }
}

/// Inverse of `corp_code_for`, used when a search hit only carries the corp code.
pub fn stock_code_for(corp_code: &str) -> &str {
    let trimmed = corp_code.trim();
    trimmed.strip_prefix(CORP_CODE_PREFIX).unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_added_once() {
        assert_eq!(corp_code_for("005930"), "A005930");
        assert_eq!(corp_code_for("A005930"), "A005930");
        assert_eq!(corp_code_for(" 000660 "), "A000660");
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(stock_code_for("A005930"), "005930");
        assert_eq!(stock_code_for("005930"), "005930");
    }
}
