use super::{DisplayHint, Printer, Summary};
use crate::encoding::Charset;
use crate::errors::Result;
use crate::memory::value::{offset_address, Value};
use crate::settings::PrintSettings;
use crate::snapshot::Target;

/// Which charset a string type is decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEncoding {
    /// The target charset from the settings (`std::string`)
    Target,
    /// The target wide charset from the settings (`std::wstring`)
    TargetWide,
    Fixed(Charset),
}

/// `std::basic_string<CharT>`
///
/// Reads code units from `_M_dataplus._M_p` up to the first NUL, or up to
/// `max_string_chars` units.
#[derive(Debug, Clone)]
pub struct StringPrinter {
    value: Value,
    encoding: StringEncoding,
    charset_name: String,
    max_chars: usize,
}

impl StringPrinter {
    pub fn new(value: Value, encoding: StringEncoding, settings: &PrintSettings) -> Self {
        let charset_name = match encoding {
            StringEncoding::TargetWide => settings.target_wide_charset.clone(),
            _ => settings.target_charset.clone(),
        };
        StringPrinter {
            value,
            encoding,
            charset_name,
            max_chars: settings.max_string_chars,
        }
    }

    fn charset(&self, unit_size: usize) -> Charset {
        match self.encoding {
            StringEncoding::Fixed(charset) => Charset::resolve(charset.name(), unit_size),
            StringEncoding::Target | StringEncoding::TargetWide => {
                Charset::resolve(&self.charset_name, unit_size)
            }
        }
    }
}

impl Printer for StringPrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let data = self
            .value
            .field_path(target, "_M_dataplus._M_p")?
            .read_pointer(target)?;
        let unit_size = target.types().sizeof(&data.pointee)?;
        let first = data.dereference()?.address();

        let mut units = Vec::new();
        let mut truncated = false;
        loop {
            let address = offset_address(first, (units.len() * unit_size) as u64)?;
            let unit = target.read_uint(address, unit_size)? as u32;
            if unit == 0 {
                break;
            }
            if units.len() == self.max_chars {
                truncated = true;
                break;
            }
            units.push(unit);
        }

        Ok(Summary::String {
            text: self.charset(unit_size).decode(&units),
            truncated,
        })
    }

    fn display_hint(&self) -> Option<DisplayHint> {
        Some(DisplayHint::String)
    }
}
