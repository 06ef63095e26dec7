use super::{BaseType, StructDef, Type};
use crate::constants::POINTER_SIZE;
use crate::errors::{PrintError, Result};
use rustc_hash::FxHashMap;

/// Typedef chains longer than this are treated as cycles
const MAX_TYPEDEF_DEPTH: usize = 32;

/// Position of one field inside its struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    pub offset: usize,
    pub size: usize,
    pub field_type: Type,
}

/// Struct and typedef definitions known to a snapshot
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    structs: FxHashMap<String, StructDef>,
    typedefs: FxHashMap<String, Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a struct, replacing any previous definition with the same name
    pub fn define_struct(&mut self, def: StructDef) -> Type {
        let ty = Type::named_struct(def.name.clone());
        self.structs.insert(def.name.clone(), def);
        ty
    }

    /// Register a typedef
    pub fn define_typedef(&mut self, name: impl Into<String>, target: Type) -> Type {
        let name = name.into();
        self.typedefs.insert(name.clone(), target);
        Type::new(BaseType::Typedef(name))
    }

    pub fn contains_struct(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn struct_def(&self, name: &str) -> Result<&StructDef> {
        self.structs
            .get(name)
            .ok_or_else(|| PrintError::UnknownType(name.to_string()))
    }

    /// Look up a type by name, the way a debugger resolves `lookup_type`
    pub fn lookup(&self, name: &str) -> Option<Type> {
        if self.structs.contains_key(name) {
            Some(Type::named_struct(name))
        } else if self.typedefs.contains_key(name) {
            Some(Type::new(BaseType::Typedef(name.to_string())))
        } else {
            None
        }
    }

    /// Strip typedefs, keeping the qualifiers, pointers and arrays applied on top
    pub fn resolve(&self, ty: &Type) -> Result<Type> {
        let mut current = ty.clone();
        for _ in 0..MAX_TYPEDEF_DEPTH {
            let name = match &current.base {
                BaseType::Typedef(name) => name.clone(),
                _ => return Ok(current),
            };
            let target = self
                .typedefs
                .get(&name)
                .ok_or_else(|| PrintError::UnknownType(name.clone()))?;
            if !target.array_dims.is_empty() && current.pointer_depth > 0 {
                return Err(PrintError::TypeMismatch {
                    expected: "pointer to a non-array typedef".to_string(),
                    got: current.name(),
                });
            }
            let mut resolved = target.clone();
            resolved.is_const |= current.is_const;
            resolved.is_reference |= current.is_reference;
            resolved.pointer_depth += current.pointer_depth;
            let mut dims = current.array_dims.clone();
            dims.extend(target.array_dims.iter().copied());
            resolved.array_dims = dims;
            current = resolved;
        }
        Err(PrintError::UnknownType(format!(
            "{} (typedef chain too deep)",
            ty.name()
        )))
    }

    /// Size of a type in bytes
    pub fn sizeof(&self, ty: &Type) -> Result<usize> {
        let ty = self.resolve(ty)?;
        if ty.is_reference {
            return Ok(POINTER_SIZE);
        }

        let element_size = if ty.pointer_depth > 0 {
            POINTER_SIZE
        } else {
            match &ty.base {
                BaseType::Struct(name) => {
                    let def = self.struct_def(name)?;
                    self.struct_size(def)?
                }
                base => base
                    .scalar_size()
                    .ok_or_else(|| PrintError::IncompleteType(ty.name()))?,
            }
        };

        Ok(ty.array_dims.iter().product::<usize>() * element_size)
    }

    /// Alignment of a type in bytes
    pub fn alignof(&self, ty: &Type) -> Result<usize> {
        let ty = self.resolve(ty)?;
        if ty.is_reference || ty.pointer_depth > 0 {
            return Ok(POINTER_SIZE);
        }
        match &ty.base {
            BaseType::Struct(name) => {
                let def = self.struct_def(name)?;
                let mut align = 1;
                for field in &def.fields {
                    align = align.max(self.alignof(&field.field_type)?);
                }
                Ok(align)
            }
            base => base
                .scalar_size()
                .ok_or_else(|| PrintError::IncompleteType(ty.name())),
        }
    }

    /// Calculate field offsets, sizes and types for a struct
    pub fn field_offsets(&self, def: &StructDef) -> Result<Vec<FieldLayout>> {
        let mut current_offset = 0;
        let mut result = Vec::with_capacity(def.fields.len());

        for field in &def.fields {
            let size = self.sizeof(&field.field_type)?;
            let align = self.alignof(&field.field_type)?;
            current_offset = align_up(current_offset, align);
            result.push(FieldLayout {
                name: field.name.clone(),
                offset: current_offset,
                size,
                field_type: field.field_type.clone(),
            });
            current_offset += size;
        }

        Ok(result)
    }

    /// Layout of a named field of a struct type
    pub fn field(&self, ty: &Type, name: &str) -> Result<FieldLayout> {
        let resolved = self.resolve(ty)?;
        let struct_name = resolved
            .struct_name()
            .ok_or_else(|| PrintError::TypeMismatch {
                expected: format!("struct with field '{}'", name),
                got: resolved.name(),
            })?;
        let def = self.struct_def(struct_name)?;
        self.field_offsets(def)?
            .into_iter()
            .find(|f| f.name == name)
            .ok_or_else(|| PrintError::MissingField {
                type_name: struct_name.to_string(),
                field: name.to_string(),
            })
    }

    fn struct_size(&self, def: &StructDef) -> Result<usize> {
        let layout = self.field_offsets(def)?;
        let Some(last) = layout.last() else {
            return Ok(1);
        };
        let mut align = 1;
        for field in &def.fields {
            align = align.max(self.alignof(&field.field_type)?);
        }
        Ok(align_up(last.offset + last.size, align))
    }
}

fn align_up(offset: usize, align: usize) -> usize {
    if align <= 1 {
        offset
    } else {
        offset.div_ceil(align) * align
    }
}
