// Snapshot of a paused process: memory plus the types describing it

use crate::errors::{PrintError, Result};
use crate::memory::image::MemoryImage;
use crate::memory::value::{Address, Pointer, Value};
use crate::memory::{le_bytes, le_uint};
use crate::types::{Type, TypeTable};

/// Read access to an inspected process
///
/// This is the seam a debugger host implements: raw memory reads plus the type
/// information recovered from debug info. Printers never see anything else.
pub trait Target {
    /// Read `len` bytes at `address`; a bad address is a fault, never retried
    fn read_bytes(&self, address: Address, len: usize) -> Result<Vec<u8>>;

    /// Types known to the inspected program
    fn types(&self) -> &TypeTable;

    /// Read a little-endian unsigned integer of `size` bytes
    fn read_uint(&self, address: Address, size: usize) -> Result<u64> {
        let bytes = self.read_bytes(address, size)?;
        Ok(le_uint(&bytes))
    }

    /// Read a 64-bit word (pointers, `size_t`)
    fn read_u64(&self, address: Address) -> Result<u64> {
        self.read_uint(address, 8)
    }
}

/// In-memory snapshot
///
/// Besides implementing [`Target`], a snapshot can be written to, which is how
/// synthetic process images are put together.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub image: MemoryImage,
    pub types: TypeTable,
}

impl Snapshot {
    pub fn new(types: TypeTable) -> Self {
        Snapshot {
            image: MemoryImage::new(),
            types,
        }
    }

    /// Allocate a zero-filled object of the given type
    pub fn place(&mut self, ty: &Type) -> Result<Value> {
        let size = self.types.sizeof(ty)?;
        let align = self.types.alignof(ty)?;
        let address = self.image.allocate_zeroed(size, align);
        Ok(Value::new(address, ty.clone()))
    }

    /// Allocate zero-filled storage for `count` contiguous elements
    pub fn place_array(&mut self, elem: &Type, count: usize) -> Result<Pointer> {
        let size = self.types.sizeof(elem)?;
        let align = self.types.alignof(elem)?;
        let address = self.image.allocate_zeroed(size * count, align);
        Ok(Pointer::new(address, elem.clone()))
    }

    /// Overwrite the bytes of a value; the length must match its type
    pub fn write_bytes(&mut self, value: &Value, bytes: &[u8]) -> Result<()> {
        let size = self.types.sizeof(value.ty())?;
        if bytes.len() != size {
            return Err(PrintError::TypeMismatch {
                expected: format!("{} bytes for '{}'", size, value.ty().name()),
                got: format!("{} bytes", bytes.len()),
            });
        }
        self.image.write_bytes_at(value.address(), bytes)
    }

    /// Store an address into a pointer or reference
    pub fn write_pointer(&mut self, value: &Value, address: Address) -> Result<()> {
        let resolved = self.types.resolve(value.ty())?;
        if !resolved.is_pointer() && !resolved.is_reference {
            return Err(PrintError::TypeMismatch {
                expected: "pointer".to_string(),
                got: resolved.name(),
            });
        }
        self.image.write_bytes_at(value.address(), &address.to_le_bytes())
    }

    /// Store a signed integer, truncated to the width of the value's type
    pub fn write_int(&mut self, value: &Value, n: i64) -> Result<()> {
        self.write_uint(value, n as u64)
    }

    /// Store an unsigned integer, truncated to the width of the value's type
    pub fn write_uint(&mut self, value: &Value, n: u64) -> Result<()> {
        let size = self.types.sizeof(value.ty())?;
        if size > 8 {
            return Err(PrintError::TypeMismatch {
                expected: "scalar".to_string(),
                got: value.ty().name(),
            });
        }
        self.image.write_bytes_at(value.address(), &le_bytes(n, size))
    }

    /// Release the allocation starting at `address`; later reads are stale
    pub fn release(&mut self, address: Address) -> Result<()> {
        self.image.release(address)
    }
}

impl Target for Snapshot {
    fn read_bytes(&self, address: Address, len: usize) -> Result<Vec<u8>> {
        self.image.read_bytes_at(address, len)
    }

    fn types(&self) -> &TypeTable {
        &self.types
    }
}
