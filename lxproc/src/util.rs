use std::num::ParseIntError;

/// Parses a hex address, with or without a `0x` prefix.
pub fn parse_addr(s: &str) -> Result<u64, ParseIntError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16)
}
