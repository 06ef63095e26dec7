// Constants for snapshot layout and print defaults

/// Starting address for regions handed out by `MemoryImage::allocate`
/// Addresses start at 0x10000000 so that small integers never look like valid pointers
pub const IMAGE_ADDRESS_START: u64 = 0x1000_0000;

/// Size of a data pointer on the LP64 targets libstdc++ v6 is laid out for
pub const POINTER_SIZE: usize = 8;

/// Byte budget of one std::deque node buffer
pub const DEQUE_BUFFER_BYTES: usize = 512;

/// Default cap on children printed per container (GDB's `print elements`)
pub const DEFAULT_MAX_ELEMENTS: usize = 200;

/// Default nesting depth before a value is elided as `{...}`
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Default cap on code units read from a NUL-terminated string
pub const DEFAULT_MAX_STRING_CHARS: usize = 200;

/// Default charset for `char` strings
pub const DEFAULT_TARGET_CHARSET: &str = "UTF-8";

/// Default charset for `wchar_t` strings
pub const DEFAULT_TARGET_WIDE_CHARSET: &str = "UTF-32";
