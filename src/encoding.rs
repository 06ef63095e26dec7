//! Character set decoding for strings read out of target memory
//!
//! A string is read as a run of code units whose width is the size of the
//! element type (1 for `char`, 2 for `char16_t`, 4 for `char32_t` and
//! `wchar_t` on LP64). [`Charset::resolve`] picks a charset by name and checks
//! it against that width. Names that are unknown, or that describe a different
//! unit width, fall back to the default for the width instead of failing.

use std::char::REPLACEMENT_CHARACTER;
use tracing::warn;

/// Supported target character sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Ascii,
    Latin1,
    Utf16,
    Utf32,
}

impl Charset {
    /// Parse a charset name as GDB spells it (case-insensitive, common aliases)
    pub fn from_name(name: &str) -> Option<Charset> {
        let normalized = name.trim().to_ascii_uppercase().replace('_', "-");
        match normalized.as_str() {
            "UTF-8" | "UTF8" => Some(Charset::Utf8),
            "ASCII" | "US-ASCII" | "ANSI-X3.4-1968" => Some(Charset::Ascii),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Some(Charset::Latin1),
            "UTF-16" | "UTF16" | "UTF-16LE" => Some(Charset::Utf16),
            "UTF-32" | "UTF32" | "UTF-32LE" | "UCS-4" | "UCS-4LE" => Some(Charset::Utf32),
            _ => None,
        }
    }

    /// Canonical name, accepted by [`Charset::from_name`]
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Ascii => "ASCII",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Utf16 => "UTF-16",
            Charset::Utf32 => "UTF-32",
        }
    }

    /// Width of one code unit in bytes
    pub fn unit_size(&self) -> usize {
        match self {
            Charset::Utf8 | Charset::Ascii | Charset::Latin1 => 1,
            Charset::Utf16 => 2,
            Charset::Utf32 => 4,
        }
    }

    pub fn default_for_width(width: usize) -> Charset {
        match width {
            1 => Charset::Utf8,
            2 => Charset::Utf16,
            _ => Charset::Utf32,
        }
    }

    /// Charset for units of `width` bytes, falling back when `name` does not fit
    pub fn resolve(name: &str, width: usize) -> Charset {
        let fallback = Charset::default_for_width(width);
        match Charset::from_name(name) {
            Some(charset) if charset.unit_size() == width => charset,
            Some(charset) => {
                warn!(
                    "Charset '{}' has {}-byte units, element type has {}; using {:?}",
                    name,
                    charset.unit_size(),
                    width,
                    fallback
                );
                fallback
            }
            None => {
                warn!("Unsupported charset '{}'; using {:?}", name, fallback);
                fallback
            }
        }
    }

    /// Decode code units; undecodable input becomes U+FFFD
    pub fn decode(&self, units: &[u32]) -> String {
        match self {
            Charset::Utf8 => {
                let bytes: Vec<u8> = units.iter().map(|&u| u as u8).collect();
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Charset::Ascii => units
                .iter()
                .map(|&u| {
                    if u < 0x80 {
                        char::from(u as u8)
                    } else {
                        REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
            Charset::Latin1 => units.iter().map(|&u| char::from(u as u8)).collect(),
            Charset::Utf16 => char::decode_utf16(units.iter().map(|&u| u as u16))
                .map(|c| c.unwrap_or(REPLACEMENT_CHARACTER))
                .collect(),
            Charset::Utf32 => units
                .iter()
                .map(|&u| char::from_u32(u).unwrap_or(REPLACEMENT_CHARACTER))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(Charset::from_name("utf-8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_name("ANSI_X3.4-1968"), Some(Charset::Ascii));
        assert_eq!(Charset::from_name("latin1"), Some(Charset::Latin1));
        assert_eq!(Charset::from_name("UCS-4"), Some(Charset::Utf32));
        assert_eq!(Charset::from_name("EBCDIC-US"), None);
    }

    #[test]
    fn test_resolve_falls_back_on_width_mismatch() {
        assert_eq!(Charset::resolve("UTF-8", 4), Charset::Utf32);
        assert_eq!(Charset::resolve("UTF-32", 1), Charset::Utf8);
        assert_eq!(Charset::resolve("KOI8-R", 2), Charset::Utf16);
        assert_eq!(Charset::resolve("ISO-8859-1", 1), Charset::Latin1);
    }

    #[test]
    fn test_decode() {
        let utf8: Vec<u32> = "héllo".bytes().map(u32::from).collect();
        assert_eq!(Charset::Utf8.decode(&utf8), "héllo");
        assert_eq!(Charset::Latin1.decode(&[0x68, 0xe9]), "hé");
        assert_eq!(Charset::Ascii.decode(&[0x61, 0xe9]), "a\u{fffd}");
        // U+1F600 as a surrogate pair
        assert_eq!(Charset::Utf16.decode(&[0xd83d, 0xde00]), "\u{1f600}");
        assert_eq!(Charset::Utf32.decode(&[0x41, 0x11_0000]), "A\u{fffd}");
    }
}
