// Core modules implementing buffering, classification, coercion, and error modeling.
pub mod casing;
pub mod cell;
pub mod classify;
pub mod error;
pub mod options;
pub mod record;
pub mod stream;
pub mod table;
pub(crate) mod temporal;
