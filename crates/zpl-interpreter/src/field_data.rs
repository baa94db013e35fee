//! `^FD` text decoding: `^FH` escapes and `^CI` character sets.

/// First and last `^CI` numbers that select a UTF-8 encoding.
const UTF8_CHARSETS: std::ops::RangeInclusive<u8> = 28..=30;

/// Active `^CI` character set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterSet {
    /// `^CI` number
    pub num: u8,
    /// Byte substitutions, source to destination
    pub mapping: Vec<(u8, u8)>,
}

impl CharacterSet {
    /// Whether field bytes are UTF-8 encoded.
    pub fn is_utf8(&self) -> bool {
        UTF8_CHARSETS.contains(&self.num)
    }

    fn remap(&self, byte: u8) -> u8 {
        self.mapping
            .iter()
            .find(|(from, _)| *from == byte)
            .map_or(byte, |(_, to)| *to)
    }
}

enum Unit {
    Char(char),
    Byte(u8),
}

fn split_escapes(data: &str, indicator: Option<char>) -> Vec<Unit> {
    let chars: Vec<char> = data.chars().collect();
    let mut units = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if Some(c) == indicator {
            let hi = chars.get(i + 1).and_then(|c| c.to_digit(16));
            let lo = chars.get(i + 2).and_then(|c| c.to_digit(16));
            if let (Some(hi), Some(lo)) = (hi, lo) {
                // both digits are < 16
                units.push(Unit::Byte((hi * 16 + lo) as u8));
                i += 3;
                continue;
            }
        }
        units.push(Unit::Char(c));
        i += 1;
    }

    units
}

/// Decodes field data: `^FH` escapes become bytes and bytes become text
/// through the character set. Malformed escapes are kept as written.
pub fn decode_field_data(data: &str, hex_indicator: Option<char>, charset: &CharacterSet) -> String {
    let units = split_escapes(data, hex_indicator);

    if charset.is_utf8() {
        let mut bytes = Vec::with_capacity(units.len());
        for unit in units {
            match unit {
                Unit::Char(c) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
                Unit::Byte(b) => bytes.push(b),
            }
        }
        return String::from_utf8_lossy(&bytes).into_owned();
    }

    units
        .into_iter()
        .map(|unit| match unit {
            Unit::Char(c) => match u8::try_from(u32::from(c)) {
                Ok(b) => char::from(charset.remap(b)),
                Err(_) => c,
            },
            Unit::Byte(b) => char::from(charset.remap(b)),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn utf8() -> CharacterSet {
        CharacterSet {
            num: 28,
            mapping: Vec::new(),
        }
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(
            decode_field_data("Hello", None, &CharacterSet::default()),
            "Hello"
        );
        assert_eq!(decode_field_data("Grüße", None, &utf8()), "Grüße");
    }

    #[test]
    fn test_hex_escapes_utf8() {
        assert_eq!(decode_field_data("Gr_C3_BC_C3_9Fe", Some('_'), &utf8()), "Grüße");
    }

    #[test]
    fn test_hex_escapes_latin1() {
        let charset = CharacterSet::default();
        assert_eq!(decode_field_data("Gr_FC_DFe", Some('_'), &charset), "Grüße");
        assert_eq!(decode_field_data("\\41\\42", Some('\\'), &charset), "AB");
    }

    #[test]
    fn test_escapes_ignored_without_indicator() {
        assert_eq!(
            decode_field_data("_41", None, &CharacterSet::default()),
            "_41"
        );
    }

    #[test]
    fn test_malformed_escape_kept() {
        let charset = CharacterSet::default();
        assert_eq!(decode_field_data("100_", Some('_'), &charset), "100_");
        assert_eq!(decode_field_data("a_Zb", Some('_'), &charset), "a_Zb");
        assert_eq!(decode_field_data("_4", Some('_'), &charset), "_4");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(decode_field_data("_FF", Some('_'), &utf8()), "\u{FFFD}");
    }

    #[test]
    fn test_charset_mapping() {
        let charset = CharacterSet {
            num: 0,
            mapping: vec![(b'#', b'$')],
        };
        assert_eq!(decode_field_data("#100", None, &charset), "$100");
        assert_eq!(decode_field_data("_23", Some('_'), &charset), "$");
    }

    proptest! {
        #[test]
        fn utf8_text_without_indicator_is_unchanged(text in "\\PC*") {
            prop_assert_eq!(decode_field_data(&text, None, &utf8()), text);
        }

        #[test]
        fn escaped_ascii_decodes(byte in 0x20u8..0x7f) {
            let data = format!("_{byte:02X}");
            let expected = char::from(byte).to_string();
            prop_assert_eq!(decode_field_data(&data, Some('_'), &CharacterSet::default()), expected);
        }
    }
}
