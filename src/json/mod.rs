//! Purpose: JSON boundary for result-set dumps read by the CLI and tests.
//! Exports: `dump` module with the document reader.
//! Role: Single seam for turning JSON text into a `MemoryStream`.
//! Invariants: Malformed documents surface as usage errors with a hint.

pub mod dump;
