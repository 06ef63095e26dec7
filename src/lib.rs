//! # Introduction
//!
//! stlview prints libstdc++ (v6 ABI, LP64) containers the way the debugger
//! pretty-printers shipped with the library do, but against a frozen
//! [`snapshot::Snapshot`] of process memory instead of a live debugger
//! session. Every read goes through the [`snapshot::Target`] trait, so a
//! debugger host can plug in its own memory and type access.
//!
//! ## Printing pipeline
//!
//! ```text
//! Value → PrinterRegistry::lookup → Printer → Renderer → text / ratatui lines
//! ```
//!
//! 1. [`registry`] matches the value's struct tag against anchored patterns
//!    and builds a [`printers::Printer`].
//! 2. [`printers`] decode container layouts (see [`layouts`]) into a summary
//!    and a lazy list of children. Ordered containers use the red-black tree
//!    successor walk and unordered ones the bucket-chain walk from [`walk`].
//! 3. [`render`] turns printers and raw values into a [`render::RenderNode`]
//!    tree and GDB-style text, honoring the limits in [`settings`].
//! 4. [`ui`] lays a rendered tree out as styled lines for a terminal pane.
//!
//! ## Supported types
//!
//! `basic_string` (char, wchar_t, char16_t, char32_t), `vector`, `list`,
//! `deque`, `map`/`multimap`, `set`/`multiset`, the `unordered_*` family (std
//! and tr1), `bitset`, `shared_ptr`/`weak_ptr`, `unique_ptr`, `stack`,
//! `queue`, `priority_queue`, `__gnu_cxx::slist`, and the list, tree, deque,
//! vector and slist iterators.

pub mod constants;
pub mod encoding;
pub mod errors;
pub mod layouts;
pub mod memory;
pub mod printers;
pub mod registry;
pub mod render;
pub mod settings;
pub mod snapshot;
pub mod types;
pub mod ui;
pub mod walk;

pub use errors::{PrintError, Result};
pub use registry::PrinterRegistry;
pub use render::Renderer;
pub use snapshot::{Snapshot, Target};
