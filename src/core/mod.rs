//! Clave generation, consecutivo numbering, and document state types.
//!
//! Everything in this module is pure: no I/O, no clock reads, no global
//! state. The issue date is always passed in by the caller.

mod clave;
mod error;
pub mod luhn;
mod numbering;
mod types;

pub use clave::*;
pub use error::*;
pub use numbering::*;
pub use types::*;
