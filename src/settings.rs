// Print settings shared by the registry and the renderer

use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_ELEMENTS, DEFAULT_MAX_STRING_CHARS, DEFAULT_TARGET_CHARSET,
    DEFAULT_TARGET_WIDE_CHARSET,
};

/// Limits and charsets applied while printing
///
/// Built once and handed to [`crate::registry::PrinterRegistry`]; printers and
/// the renderer only ever read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    /// Children printed per container before `...`
    pub max_elements: usize,
    /// Nesting depth before a value is shown as `{...}`
    pub max_depth: usize,
    /// Code units read from a NUL-terminated string
    pub max_string_chars: usize,
    /// Charset of `char` strings
    pub target_charset: String,
    /// Charset of `wchar_t` strings
    pub target_wide_charset: String,
}

impl Default for PrintSettings {
    fn default() -> Self {
        PrintSettings {
            max_elements: DEFAULT_MAX_ELEMENTS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_string_chars: DEFAULT_MAX_STRING_CHARS,
            target_charset: DEFAULT_TARGET_CHARSET.to_string(),
            target_wide_charset: DEFAULT_TARGET_WIDE_CHARSET.to_string(),
        }
    }
}

impl PrintSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_string_chars(mut self, max_string_chars: usize) -> Self {
        self.max_string_chars = max_string_chars;
        self
    }

    pub fn with_target_charset(mut self, charset: impl Into<String>) -> Self {
        self.target_charset = charset.into();
        self
    }

    pub fn with_target_wide_charset(mut self, charset: impl Into<String>) -> Self {
        self.target_wide_charset = charset.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gdb() {
        let settings = PrintSettings::default();
        assert_eq!(settings.max_elements, 200);
        assert_eq!(settings.max_depth, 20);
        assert_eq!(settings.target_charset, "UTF-8");
        assert_eq!(settings.target_wide_charset, "UTF-32");
    }

    #[test]
    fn test_builders_override_single_fields() {
        let settings = PrintSettings::new()
            .with_max_elements(3)
            .with_target_charset("ISO-8859-1");
        assert_eq!(settings.max_elements, 3);
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(settings.target_charset, "ISO-8859-1");
    }
}
