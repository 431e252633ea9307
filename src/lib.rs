//! Purpose: Buffered SQL result sets with typed accessors, shared by the `rowset` CLI and tests.
//! Exports: `api` (public surface), `core` (classification, coercion, errors), `json` (dump format).
//! Role: Library backing the binary; callers normally go through `api`.
//! Invariants: A loaded table never touches the driver again; all reads are served from memory.
//! Invariants: Conversions either return a value or an error naming the column.
pub mod api;
pub mod core;
pub mod json;
