//! Typed views into target memory
//!
//! This module defines the three ways a printer sees data in a snapshot:
//!
//! - [`Value`]: an lvalue, i.e. an address plus the type stored there. Creating
//!   a value or taking a field never touches memory; bytes are read only when a
//!   scalar or pointer is decoded.
//! - [`Pointer`]: an rvalue pointer (the result of reading or adjusting a
//!   pointer), which may be null and may be dereferenced into a [`Value`].
//! - [`Scalar`]: a decoded leaf value.
//!
//! All reads go through [`Target`], so a stale or unmapped address surfaces as
//! a [`PrintError`] at the point of the read.

use crate::errors::{PrintError, Result};
use crate::snapshot::Target;
use crate::types::{ScalarKind, Type};

/// Memory address type (64-bit)
pub type Address = u64;

/// Decoded leaf values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Char(i64), // Numeric value of a character type
    Float(f64),
    Pointer(Address),
}

impl Scalar {
    /// Get the value as a signed integer, returns None for floats
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Bool(b) => Some(i64::from(*b)),
            Scalar::Int(n) | Scalar::Char(n) => Some(*n),
            Scalar::UInt(n) | Scalar::Pointer(n) => i64::try_from(*n).ok(),
            Scalar::Float(_) => None,
        }
    }

    /// Get the value as an unsigned integer, returns None for floats and negatives
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Bool(b) => Some(u64::from(*b)),
            Scalar::Int(n) | Scalar::Char(n) => u64::try_from(*n).ok(),
            Scalar::UInt(n) | Scalar::Pointer(n) => Some(*n),
            Scalar::Float(_) => None,
        }
    }
}

/// An object of a known type at a known address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    address: Address,
    ty: Type,
}

impl Value {
    pub fn new(address: Address, ty: Type) -> Self {
        Value { address, ty }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Pointer to this value
    pub fn address_of(&self) -> Pointer {
        Pointer::new(self.address, self.ty.unreferenced())
    }

    /// Reinterpret the bytes at this address as another type
    pub fn cast(&self, ty: Type) -> Value {
        Value::new(self.address, ty)
    }

    /// Follow a reference to the object it refers to; other values are returned as is
    pub fn referent(&self, target: &dyn Target) -> Result<Value> {
        if !self.ty.is_reference {
            return Ok(self.clone());
        }
        let referred = self.ty.unreferenced();
        let address = target.read_u64(self.address)?;
        if address == 0 {
            return Err(PrintError::NullDereference {
                type_name: referred.name(),
            });
        }
        Ok(Value::new(address, referred))
    }

    /// Member access (references are followed first)
    pub fn field(&self, target: &dyn Target, name: &str) -> Result<Value> {
        let object = self.referent(target)?;
        let layout = target.types().field(&object.ty, name)?;
        Ok(Value::new(
            offset_address(object.address, layout.offset as u64)?,
            layout.field_type,
        ))
    }

    /// Member access along a dotted path, e.g. `_M_impl._M_start`
    pub fn field_path(&self, target: &dyn Target, path: &str) -> Result<Value> {
        path.split('.')
            .try_fold(self.clone(), |value, name| value.field(target, name))
    }

    /// Array element access
    pub fn index(&self, target: &dyn Target, index: usize) -> Result<Value> {
        let resolved = target.types().resolve(&self.ty)?;
        let elem_type = resolved.element().ok_or_else(|| PrintError::TypeMismatch {
            expected: "array".to_string(),
            got: resolved.name(),
        })?;
        let len = resolved.array_dims[0];
        if index >= len {
            return Err(PrintError::IndexOutOfBounds { index, len });
        }
        let elem_size = target.types().sizeof(&elem_type)?;
        Ok(Value::new(
            offset_address(self.address, (index * elem_size) as u64)?,
            elem_type,
        ))
    }

    /// Number of elements if this is an array
    pub fn array_len(&self, target: &dyn Target) -> Result<Option<usize>> {
        let resolved = target.types().resolve(&self.ty)?;
        Ok(resolved.array_dims.first().copied())
    }

    /// Template argument of this value's struct type
    pub fn template_argument(&self, target: &dyn Target, index: usize) -> Result<Type> {
        let resolved = target.types().resolve(&self.ty.unreferenced())?;
        let name = resolved
            .struct_name()
            .ok_or_else(|| PrintError::TypeMismatch {
                expected: "template instance".to_string(),
                got: resolved.name(),
            })?;
        let def = target.types().struct_def(name)?;
        def.template_args
            .get(index)
            .cloned()
            .ok_or_else(|| PrintError::MissingTemplateArgument {
                type_name: name.to_string(),
                index,
            })
    }

    /// Read a pointer stored in this value
    pub fn read_pointer(&self, target: &dyn Target) -> Result<Pointer> {
        let object = self.referent(target)?;
        let resolved = target.types().resolve(&object.ty)?;
        let pointee = resolved.pointee().ok_or_else(|| PrintError::TypeMismatch {
            expected: "pointer".to_string(),
            got: resolved.name(),
        })?;
        let address = target.read_u64(object.address)?;
        Ok(Pointer::new(address, pointee))
    }

    /// Decode a scalar or pointer stored in this value
    pub fn read_scalar(&self, target: &dyn Target) -> Result<Scalar> {
        let object = self.referent(target)?;
        let resolved = target.types().resolve(&object.ty)?;
        if resolved.is_pointer() {
            return Ok(Scalar::Pointer(target.read_u64(object.address)?));
        }

        let mismatch = || PrintError::TypeMismatch {
            expected: "scalar".to_string(),
            got: resolved.name(),
        };
        if resolved.is_array() {
            return Err(mismatch());
        }
        let kind = resolved.base.scalar_kind().ok_or_else(mismatch)?;
        let size = resolved.base.scalar_size().ok_or_else(mismatch)?;
        let raw = target.read_uint(object.address, size)?;

        Ok(match kind {
            ScalarKind::Bool => Scalar::Bool(raw != 0),
            ScalarKind::Signed => Scalar::Int(sign_extend(raw, size)),
            ScalarKind::Unsigned => Scalar::UInt(raw),
            ScalarKind::Character => {
                if resolved.base.is_signed_char() {
                    Scalar::Char(sign_extend(raw, size))
                } else {
                    Scalar::Char(raw as i64)
                }
            }
            ScalarKind::Float => {
                if size == 4 {
                    Scalar::Float(f64::from(f32::from_bits(raw as u32)))
                } else {
                    Scalar::Float(f64::from_bits(raw))
                }
            }
        })
    }

    /// Read an integer, expecting an integral type
    pub fn read_int(&self, target: &dyn Target) -> Result<i64> {
        let scalar = self.read_scalar(target)?;
        scalar.as_i64().ok_or_else(|| PrintError::TypeMismatch {
            expected: "integer".to_string(),
            got: format!("{:?}", scalar),
        })
    }

    /// Read an unsigned integer, expecting a non-negative integral value
    pub fn read_uint(&self, target: &dyn Target) -> Result<u64> {
        let scalar = self.read_scalar(target)?;
        scalar.as_u64().ok_or_else(|| PrintError::TypeMismatch {
            expected: "unsigned integer".to_string(),
            got: format!("{:?}", scalar),
        })
    }
}

/// `base + offset`; a sum past the end of the address space is an invalid address
pub fn offset_address(base: Address, offset: u64) -> Result<Address> {
    base.checked_add(offset)
        .ok_or(PrintError::InvalidAddress { address: base })
}

fn sign_extend(raw: u64, size: usize) -> i64 {
    let bits = (size * 8) as u32;
    if bits >= 64 {
        raw as i64
    } else {
        let shift = 64 - bits;
        ((raw << shift) as i64) >> shift
    }
}

/// A pointer value, not necessarily stored anywhere
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    pub address: Address,
    pub pointee: Type,
}

impl Pointer {
    pub fn new(address: Address, pointee: Type) -> Self {
        Pointer { address, pointee }
    }

    pub fn is_null(&self) -> bool {
        self.address == 0
    }

    /// Reinterpret as a pointer to another type
    pub fn cast(&self, pointee: Type) -> Pointer {
        Pointer::new(self.address, pointee)
    }

    /// The object pointed to
    pub fn dereference(&self) -> Result<Value> {
        if self.is_null() {
            return Err(PrintError::NullDereference {
                type_name: self.pointee.name(),
            });
        }
        Ok(Value::new(self.address, self.pointee.clone()))
    }

    /// Pointer arithmetic: `ptr + n`, scaled by pointee size
    pub fn add(&self, target: &dyn Target, n: i64) -> Result<Pointer> {
        let size = target.types().sizeof(&self.pointee)? as i64;
        let address = self.address.wrapping_add_signed(n.wrapping_mul(size));
        Ok(Pointer::new(address, self.pointee.clone()))
    }

    /// Pointer difference in elements: `self - other`
    pub fn diff(&self, target: &dyn Target, other: &Pointer) -> Result<i64> {
        let size = target.types().sizeof(&self.pointee)? as i64;
        if size == 0 {
            return Err(PrintError::IncompleteType(self.pointee.name()));
        }
        Ok((self.address as i64).wrapping_sub(other.address as i64) / size)
    }

    /// `ptr[n]`
    pub fn index(&self, target: &dyn Target, n: i64) -> Result<Value> {
        self.add(target, n)?.dereference()
    }
}
