//! Type-name based printer dispatch
//!
//! A [`PrinterRegistry`] is an ordered list of (pattern, [`PrinterKind`])
//! entries, built once and never modified afterwards. Lookup strips a value's
//! type down to its struct tag (reference followed, qualifiers dropped,
//! typedefs resolved) and picks the first entry whose pattern matches.
//!
//! ```text
//! const std::map<int, int>&  →  std::map<int, int>  →  PrinterKind::Map("std::map")
//! ```

use crate::encoding::Charset;
use crate::errors::Result;
use crate::memory::value::Value;
use crate::printers::{
    BitsetPrinter, DequeIteratorPrinter, DequePrinter, ListIteratorPrinter, ListPrinter,
    MapPrinter, Printer, RbTreeIteratorPrinter, SetPrinter, SharedPtrPrinter, SlistIteratorPrinter,
    SlistPrinter, StackOrQueuePrinter, StringEncoding, StringPrinter, UniquePtrPrinter,
    UnorderedMapPrinter, UnorderedSetPrinter, VectorIteratorPrinter, VectorPrinter,
};
use crate::settings::PrintSettings;
use crate::snapshot::Target;
use regex::Regex;
use tracing::{debug, trace};

/// Which printer to build for a matched type
///
/// Variants carrying a `String` hold the container name shown in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterKind {
    String(StringEncoding),
    Bitset,
    Deque,
    List,
    Map(String),
    Set(String),
    StackOrQueue(String),
    UniquePtr,
    Vector,
    SharedPtr(String),
    UnorderedMap(String),
    UnorderedSet(String),
    Slist,
    ListIterator,
    RbTreeIterator,
    DequeIterator,
    VectorIterator,
    SlistIterator,
}

#[derive(Debug, Clone)]
struct Entry {
    pattern: Regex,
    kind: PrinterKind,
}

/// Collects entries before compiling them into a [`PrinterRegistry`]
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    entries: Vec<(String, PrinterKind)>,
    settings: PrintSettings,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; earlier entries win
    pub fn register(mut self, pattern: impl Into<String>, kind: PrinterKind) -> Self {
        self.entries.push((pattern.into(), kind));
        self
    }

    pub fn settings(mut self, settings: PrintSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Append the libstdc++ printers
    pub fn libstdcxx(self) -> Self {
        use PrinterKind as K;

        let named = |name: &str| name.to_string();
        let mut builder = self
            .register(
                r"^std::basic_string<char(,.*)?>$",
                K::String(StringEncoding::Target),
            )
            .register(
                r"^std::basic_string<wchar_t(,.*)?>$",
                K::String(StringEncoding::TargetWide),
            )
            .register(
                r"^std::basic_string<char16_t(,.*)?>$",
                K::String(StringEncoding::Fixed(Charset::Utf16)),
            )
            .register(
                r"^std::basic_string<char32_t(,.*)?>$",
                K::String(StringEncoding::Fixed(Charset::Utf32)),
            )
            .register(r"^std::bitset<.*>$", K::Bitset)
            .register(r"^std::deque<.*>$", K::Deque)
            .register(r"^std::list<.*>$", K::List)
            .register(r"^std::map<.*>$", K::Map(named("std::map")))
            .register(r"^std::multimap<.*>$", K::Map(named("std::multimap")))
            .register(r"^std::multiset<.*>$", K::Set(named("std::multiset")))
            .register(
                r"^std::priority_queue<.*>$",
                K::StackOrQueue(named("std::priority_queue")),
            )
            .register(r"^std::queue<.*>$", K::StackOrQueue(named("std::queue")))
            .register(r"^std::set<.*>$", K::Set(named("std::set")))
            .register(r"^std::stack<.*>$", K::StackOrQueue(named("std::stack")))
            .register(r"^std::unique_ptr<.*>$", K::UniquePtr)
            .register(r"^std::vector<.*>$", K::Vector);

        for prefix in ["std", "std::tr1"] {
            builder = builder
                .register(
                    format!(r"^{}::shared_ptr<.*>$", prefix),
                    K::SharedPtr(format!("{}::shared_ptr", prefix)),
                )
                .register(
                    format!(r"^{}::weak_ptr<.*>$", prefix),
                    K::SharedPtr(format!("{}::weak_ptr", prefix)),
                );
            for map in ["unordered_map", "unordered_multimap"] {
                builder = builder.register(
                    format!(r"^{}::{}<.*>$", prefix, map),
                    K::UnorderedMap(format!("{}::{}", prefix, map)),
                );
            }
            for set in ["unordered_set", "unordered_multiset"] {
                builder = builder.register(
                    format!(r"^{}::{}<.*>$", prefix, set),
                    K::UnorderedSet(format!("{}::{}", prefix, set)),
                );
            }
        }

        builder
            .register(r"^__gnu_cxx::slist<.*>$", K::Slist)
            .register(r"^std::_List_iterator<.*>$", K::ListIterator)
            .register(r"^std::_List_const_iterator<.*>$", K::ListIterator)
            .register(r"^std::_Rb_tree_iterator<.*>$", K::RbTreeIterator)
            .register(r"^std::_Rb_tree_const_iterator<.*>$", K::RbTreeIterator)
            .register(r"^std::_Deque_iterator<.*>$", K::DequeIterator)
            .register(r"^std::_Deque_const_iterator<.*>$", K::DequeIterator)
            .register(r"^__gnu_cxx::__normal_iterator<.*>$", K::VectorIterator)
            .register(r"^__gnu_cxx::_Slist_iterator<.*>$", K::SlistIterator)
    }

    /// Compile every pattern; an invalid pattern fails the whole build
    pub fn build(self) -> Result<PrinterRegistry> {
        let entries = self
            .entries
            .into_iter()
            .map(|(pattern, kind)| {
                Ok(Entry {
                    pattern: Regex::new(&pattern)?,
                    kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("Printer registry built with {} entries", entries.len());
        Ok(PrinterRegistry {
            entries,
            settings: self.settings,
        })
    }
}

/// Immutable mapping from type names to printers
#[derive(Debug, Clone)]
pub struct PrinterRegistry {
    entries: Vec<Entry>,
    settings: PrintSettings,
}

impl PrinterRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry with the libstdc++ printers and default settings
    pub fn libstdcxx() -> Result<Self> {
        Self::builder().libstdcxx().build()
    }

    pub fn settings(&self) -> &PrintSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry matching a struct tag
    pub fn kind_for(&self, type_name: &str) -> Option<&PrinterKind> {
        self.entries
            .iter()
            .find(|entry| entry.pattern.is_match(type_name))
            .map(|entry| &entry.kind)
    }

    /// Printer for a value, or `None` when its type has no struct tag or no
    /// entry matches
    pub fn lookup(&self, target: &dyn Target, value: &Value) -> Result<Option<Box<dyn Printer>>> {
        let object = value.referent(target)?;
        let resolved = target.types().resolve(object.ty())?.unqualified();
        let Some(name) = resolved.struct_name() else {
            return Ok(None);
        };
        let Some(kind) = self.kind_for(name) else {
            trace!("No printer for '{}'", name);
            return Ok(None);
        };
        debug!("Printer {:?} selected for '{}'", kind, name);
        let object = object.cast(resolved.clone());
        self.instantiate(target, kind, object).map(Some)
    }

    fn instantiate(
        &self,
        target: &dyn Target,
        kind: &PrinterKind,
        value: Value,
    ) -> Result<Box<dyn Printer>> {
        Ok(match kind {
            PrinterKind::String(encoding) => {
                Box::new(StringPrinter::new(value, *encoding, &self.settings))
            }
            PrinterKind::Bitset => Box::new(BitsetPrinter::new(value)),
            PrinterKind::Deque => Box::new(DequePrinter::new(target, value)?),
            PrinterKind::List => Box::new(ListPrinter::new(value)),
            PrinterKind::Map(name) => Box::new(MapPrinter::new(name.as_str(), value)),
            PrinterKind::Set(name) => Box::new(SetPrinter::new(name.as_str(), value)),
            PrinterKind::StackOrQueue(name) => {
                let container = value.field(target, "c")?;
                let inner = self.lookup(target, &container)?;
                Box::new(StackOrQueuePrinter::new(name.as_str(), container, inner))
            }
            PrinterKind::UniquePtr => Box::new(UniquePtrPrinter::new(value)),
            PrinterKind::Vector => Box::new(VectorPrinter::new(value)),
            PrinterKind::SharedPtr(name) => Box::new(SharedPtrPrinter::new(name.as_str(), value)),
            PrinterKind::UnorderedMap(name) => {
                Box::new(UnorderedMapPrinter::new(name.as_str(), value))
            }
            PrinterKind::UnorderedSet(name) => {
                Box::new(UnorderedSetPrinter::new(name.as_str(), value))
            }
            PrinterKind::Slist => Box::new(SlistPrinter::new(value)),
            PrinterKind::ListIterator => Box::new(ListIteratorPrinter::new(value)),
            PrinterKind::RbTreeIterator => Box::new(RbTreeIteratorPrinter::new(value)),
            PrinterKind::DequeIterator => Box::new(DequeIteratorPrinter::new(value)),
            PrinterKind::VectorIterator => Box::new(VectorIteratorPrinter::new(value)),
            PrinterKind::SlistIterator => Box::new(SlistIteratorPrinter::new(value)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let registry = PrinterRegistry::builder()
            .register(r"^std::vector<int>$", PrinterKind::Slist)
            .libstdcxx()
            .build()
            .unwrap();
        assert_eq!(registry.kind_for("std::vector<int>"), Some(&PrinterKind::Slist));
        assert_eq!(registry.kind_for("std::vector<long>"), Some(&PrinterKind::Vector));
    }

    #[test]
    fn test_string_patterns_pick_encoding() {
        let registry = PrinterRegistry::libstdcxx().unwrap();
        assert_eq!(
            registry.kind_for("std::basic_string<char, std::char_traits<char>, std::allocator<char> >"),
            Some(&PrinterKind::String(StringEncoding::Target))
        );
        assert_eq!(
            registry.kind_for("std::basic_string<wchar_t>"),
            Some(&PrinterKind::String(StringEncoding::TargetWide))
        );
        assert_eq!(
            registry.kind_for("std::basic_string<char16_t>"),
            Some(&PrinterKind::String(StringEncoding::Fixed(Charset::Utf16)))
        );
        assert_eq!(registry.kind_for("std::basic_string<unsigned char>"), None);
    }

    #[test]
    fn test_patterns_are_anchored() {
        let registry = PrinterRegistry::libstdcxx().unwrap();
        assert_eq!(registry.kind_for("my::std::vector<int>"), None);
        assert_eq!(registry.kind_for("std::vector_like<int>"), None);
        assert_eq!(
            registry.kind_for("std::tr1::unordered_multiset<int>"),
            Some(&PrinterKind::UnorderedSet("std::tr1::unordered_multiset".to_string()))
        );
        assert_eq!(
            registry.kind_for("std::_Rb_tree_const_iterator<int>"),
            Some(&PrinterKind::RbTreeIterator)
        );
    }

    #[test]
    fn test_invalid_pattern_fails_build() {
        let result = PrinterRegistry::builder()
            .register("^std::vector<(.*$", PrinterKind::Vector)
            .build();
        assert!(matches!(result, Err(crate::errors::PrintError::Pattern(_))));
    }
}
