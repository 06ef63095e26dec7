//! Type model for values in a snapshot
//!
//! Types follow the shape a debugger sees after reading debug info: a base type
//! (scalar, struct or typedef) decorated with const/reference qualifiers,
//! pointer depth and array dimensions. Struct layouts live in a [`TypeTable`].
//!
//! # Layout rules
//!
//! Sizes and alignments follow the LP64 C ABI:
//! - `int`, `float`, `wchar_t`, `char32_t`: 4 bytes
//! - `long`, `long long`, `double`, pointers, references: 8 bytes
//! - struct fields are aligned to their natural alignment, and the struct size
//!   is rounded up to the largest field alignment
//! - an empty struct occupies 1 byte

pub mod table;

pub use table::{FieldLayout, TypeTable};

/// Base types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Void,
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    WChar,
    Char16,
    Char32,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    Struct(String),  // Struct name, resolved through the type table
    Typedef(String), // Typedef name, resolved through the type table
}

/// How a scalar base type is decoded from raw bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Signed,
    Unsigned,
    Character,
    Float,
}

impl BaseType {
    /// C++ spelling of the base type
    pub fn name(&self) -> &str {
        match self {
            BaseType::Void => "void",
            BaseType::Bool => "bool",
            BaseType::Char => "char",
            BaseType::SignedChar => "signed char",
            BaseType::UnsignedChar => "unsigned char",
            BaseType::WChar => "wchar_t",
            BaseType::Char16 => "char16_t",
            BaseType::Char32 => "char32_t",
            BaseType::Short => "short",
            BaseType::UnsignedShort => "unsigned short",
            BaseType::Int => "int",
            BaseType::UnsignedInt => "unsigned int",
            BaseType::Long => "long",
            BaseType::UnsignedLong => "unsigned long",
            BaseType::LongLong => "long long",
            BaseType::UnsignedLongLong => "unsigned long long",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::Struct(name) | BaseType::Typedef(name) => name,
        }
    }

    /// Size in bytes of a scalar base type; `None` for void, structs and typedefs
    pub fn scalar_size(&self) -> Option<usize> {
        match self {
            BaseType::Bool | BaseType::Char | BaseType::SignedChar | BaseType::UnsignedChar => {
                Some(1)
            }
            BaseType::Char16 | BaseType::Short | BaseType::UnsignedShort => Some(2),
            BaseType::WChar
            | BaseType::Char32
            | BaseType::Int
            | BaseType::UnsignedInt
            | BaseType::Float => Some(4),
            BaseType::Long
            | BaseType::UnsignedLong
            | BaseType::LongLong
            | BaseType::UnsignedLongLong
            | BaseType::Double => Some(8),
            BaseType::Void | BaseType::Struct(_) | BaseType::Typedef(_) => None,
        }
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            BaseType::Bool => Some(ScalarKind::Bool),
            BaseType::Char
            | BaseType::SignedChar
            | BaseType::UnsignedChar
            | BaseType::WChar
            | BaseType::Char16
            | BaseType::Char32 => Some(ScalarKind::Character),
            BaseType::Short | BaseType::Int | BaseType::Long | BaseType::LongLong => {
                Some(ScalarKind::Signed)
            }
            BaseType::UnsignedShort
            | BaseType::UnsignedInt
            | BaseType::UnsignedLong
            | BaseType::UnsignedLongLong => Some(ScalarKind::Unsigned),
            BaseType::Float | BaseType::Double => Some(ScalarKind::Float),
            BaseType::Void | BaseType::Struct(_) | BaseType::Typedef(_) => None,
        }
    }

    /// Character types are signed when their numeric value is shown
    pub fn is_signed_char(&self) -> bool {
        matches!(self, BaseType::Char | BaseType::SignedChar | BaseType::WChar)
    }
}

/// Type representation with qualifiers, pointers, and arrays
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    pub base: BaseType,
    pub is_const: bool,
    pub is_reference: bool,
    pub pointer_depth: usize,   // 0 = not pointer, 1 = *, 2 = **, etc.
    pub array_dims: Vec<usize>, // Outermost dimension first
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type {
            base,
            is_const: false,
            is_reference: false,
            pointer_depth: 0,
            array_dims: Vec::new(),
        }
    }

    pub fn named_struct(name: impl Into<String>) -> Self {
        Type::new(BaseType::Struct(name.into()))
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointer_depth += 1;
        self
    }

    pub fn with_reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn with_array(mut self, size: usize) -> Self {
        self.array_dims.push(size);
        self
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0 && self.array_dims.is_empty() && !self.is_reference
    }

    pub fn is_array(&self) -> bool {
        !self.array_dims.is_empty() && !self.is_reference
    }

    /// Struct name when this is a plain (non-pointer, non-array) struct
    pub fn struct_name(&self) -> Option<&str> {
        match &self.base {
            BaseType::Struct(name) if self.pointer_depth == 0 && self.array_dims.is_empty() => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Type pointed to; `None` if this is not a pointer
    pub fn pointee(&self) -> Option<Type> {
        if !self.is_pointer() {
            return None;
        }
        let mut t = self.clone();
        t.pointer_depth -= 1;
        Some(t)
    }

    /// Element type of an array; `None` if this is not an array
    pub fn element(&self) -> Option<Type> {
        if !self.is_array() {
            return None;
        }
        let mut t = self.clone();
        t.array_dims.remove(0);
        Some(t)
    }

    /// Type referred to by a reference; other types are returned unchanged
    pub fn unreferenced(&self) -> Type {
        let mut t = self.clone();
        t.is_reference = false;
        t
    }

    /// Type with const and reference qualifiers removed
    pub fn unqualified(&self) -> Type {
        let mut t = self.clone();
        t.is_const = false;
        t.is_reference = false;
        t
    }

    /// C++ spelling, used for diagnostics and node type lookups
    pub fn name(&self) -> String {
        let mut s = String::new();
        if self.is_const {
            s.push_str("const ");
        }
        s.push_str(self.base.name());
        for _ in 0..self.pointer_depth {
            s.push('*');
        }
        if self.is_reference {
            s.push('&');
        }
        for dim in &self.array_dims {
            s.push_str(&format!("[{}]", dim));
        }
        s
    }
}

/// Struct field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        Field {
            name: name.into(),
            field_type,
        }
    }
}

/// Struct definition
///
/// Inherited members are flattened into `fields` in declaration order, which
/// matches how single non-virtual inheritance is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub template_args: Vec<Type>,
    pub fields: Vec<Field>,
}

impl StructDef {
    pub fn new(name: impl Into<String>) -> Self {
        StructDef {
            name: name.into(),
            template_args: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_template_arg(mut self, arg: Type) -> Self {
        self.template_args.push(arg);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, field_type: Type) -> Self {
        self.fields.push(Field::new(name, field_type));
        self
    }
}

/// Spell a template instantiation: `name<arg, arg>`
pub fn template_name(name: &str, args: &[&Type]) -> String {
    let args: Vec<String> = args.iter().map(|t| t.name()).collect();
    format!("{}<{}>", name, args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Type::new(BaseType::Int).name(), "int");
        assert_eq!(Type::new(BaseType::Int).with_const().name(), "const int");
        assert_eq!(
            Type::new(BaseType::UnsignedLong).with_array(2).name(),
            "unsigned long[2]"
        );
        assert_eq!(
            Type::named_struct("std::string").with_pointer().with_pointer().name(),
            "std::string**"
        );
        let key = Type::new(BaseType::Int).with_const();
        let value = Type::new(BaseType::Double);
        assert_eq!(
            template_name("std::pair", &[&key, &value]),
            "std::pair<const int, double>"
        );
    }

    #[test]
    fn test_pointee_and_element() {
        let p = Type::new(BaseType::Char).with_pointer();
        assert!(p.is_pointer());
        assert_eq!(p.pointee(), Some(Type::new(BaseType::Char)));
        assert_eq!(Type::new(BaseType::Char).pointee(), None);

        let a = Type::new(BaseType::Int).with_array(2).with_array(3);
        assert_eq!(a.element(), Some(Type::new(BaseType::Int).with_array(3)));
        assert!(!a.is_pointer());
    }

    #[test]
    fn test_struct_name_only_for_plain_structs() {
        let s = Type::named_struct("Point");
        assert_eq!(s.struct_name(), Some("Point"));
        assert_eq!(s.clone().with_pointer().struct_name(), None);
        assert_eq!(s.with_array(4).struct_name(), None);
    }
}
