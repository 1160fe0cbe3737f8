//! Hex color parsing and `rgba()` formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Red, green and blue channels of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Bare channel triple, `"r, g, b"`, as stored in a digits variable.
    pub fn channels(&self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }
}

/// A parsed hex literal: channels plus the alpha byte if one was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub rgb: Rgb,
    pub alpha: Option<u8>,
}

/// Parse two hex digits.
pub fn parse_hex_pair(pair: &str) -> Option<u8> {
    if pair.len() != 2 || !pair.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(pair, 16).ok()
}

/// Parse `#RRGGBB` or `#RRGGBBAA`. Any other length or a non-hex digit
/// yields `None`.
pub fn parse_hex(text: &str) -> Option<HexColor> {
    let hex = text.strip_prefix('#')?;
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let rgb = Rgb {
        r: parse_hex_pair(&hex[0..2])?,
        g: parse_hex_pair(&hex[2..4])?,
        b: parse_hex_pair(&hex[4..6])?,
    };
    let alpha = if hex.len() == 8 {
        Some(parse_hex_pair(&hex[6..8])?)
    } else {
        None
    };
    Some(HexColor { rgb, alpha })
}

/// `alpha / 255` to four decimal places.
pub fn format_alpha(alpha: u8) -> String {
    let value = (Decimal::from(alpha) / Decimal::from(255u8))
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.4}", value)
}

/// `rgba(r, g, b)` for six-digit hex, `rgba(r, g, b, a)` for eight-digit.
pub fn hex_to_rgba(text: &str) -> Option<String> {
    let color = parse_hex(text)?;
    Some(match color.alpha {
        Some(a) => format!("rgba({}, {})", color.rgb.channels(), format_alpha(a)),
        None => format!("rgba({})", color.rgb.channels()),
    })
}

/// `rgba(<channels>, <alpha>)` where `channels` is a triple or a `var()`.
pub fn rgba_with_alpha(channels: &str, alpha: u8) -> String {
    format!("rgba({}, {})", channels, format_alpha(alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_hex_has_no_alpha_term() {
        assert_eq!(hex_to_rgba("#FF8000").as_deref(), Some("rgba(255, 128, 0)"));
        assert_eq!(hex_to_rgba("#0a0B0c").as_deref(), Some("rgba(10, 11, 12)"));
    }

    #[test]
    fn eight_digit_hex_normalizes_alpha() {
        assert_eq!(
            hex_to_rgba("#FF000080").as_deref(),
            Some("rgba(255, 0, 0, 0.5020)")
        );
        assert_eq!(
            hex_to_rgba("#00000033").as_deref(),
            Some("rgba(0, 0, 0, 0.2000)")
        );
        assert_eq!(
            hex_to_rgba("#123456ff").as_deref(),
            Some("rgba(18, 52, 86, 1.0000)")
        );
        assert_eq!(
            hex_to_rgba("#12345600").as_deref(),
            Some("rgba(18, 52, 86, 0.0000)")
        );
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(parse_hex("#FFF"), None);
        assert_eq!(parse_hex("FF0000"), None);
        assert_eq!(parse_hex("#GG0000"), None);
        assert_eq!(parse_hex("#FF00000"), None);
        assert_eq!(parse_hex("#ÿÿÿ"), None);
    }

    #[test]
    fn alpha_formatting() {
        assert_eq!(format_alpha(0xff), "1.0000");
        assert_eq!(format_alpha(0xcc), "0.8000");
        assert_eq!(format_alpha(0x80), "0.5020");
    }

    #[test]
    fn every_channel_value_maps_to_its_decimal() {
        for v in 0u8..=255 {
            let hex = format!("#{:02X}{:02x}00", v, v);
            let color = parse_hex(&hex).unwrap();
            assert_eq!(color.rgb.r, v);
            assert_eq!(color.rgb.g, v);
        }
    }
}
