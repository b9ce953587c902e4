//! # factura-cr
//!
//! Costa Rica electronic invoicing: generation of the 50-digit document key
//! ("clave") required by Hacienda, and submission of signed documents to the
//! Hacienda reception API with the offline fallback the regulation requires.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use factura_cr::core::*;
//!
//! let mut numbering = ConsecutivoSequence::new(1, 1, DocumentKind::FacturaElectronica).unwrap();
//! let consecutivo = numbering.next_consecutivo().unwrap();
//!
//! let clave = generate_clave(
//!     CR_COUNTRY_CODE,
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     "3101123456",
//!     &consecutivo,
//!     Situation::Normal,
//! )
//! .unwrap();
//!
//! assert_eq!(clave.as_str().len(), 50);
//! assert_eq!(clave.issuer(), "003101123456");
//! assert_eq!(Clave::parse(clave.as_str()).unwrap(), clave);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Clave generation and parsing, consecutivo numbering, status types |
//! | `reception` (default) | Submission to the Hacienda reception API, token cache, collaborator traits |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "reception")]
pub mod reception;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
