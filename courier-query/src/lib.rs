//! # Courier Query
//!
//! Flattens nested values into `application/x-www-form-urlencoded` query
//! strings using bracket notation (`key[sub]=value`, `key[]=value`).
//!
//! Input is an explicit tagged value, [`QueryValue`], so the encoder never has
//! to guess whether something is a scalar, a sequence or a mapping.
//!
//! ## Quick Start
//!
//! ```rust
//! use courier_query::{NestedKeyOrder, QueryEncoder, QueryValue};
//!
//! let query = QueryValue::map([
//!     ("ids", QueryValue::from(vec![1, 2])),
//!     ("active", QueryValue::from(true)),
//! ]);
//!
//! let encoder = QueryEncoder::new().with_nested_keys(NestedKeyOrder::Forward);
//! assert_eq!(encoder.encode(&query), "ids%5B%5D=1&ids%5B%5D=2&active=true");
//! ```
//!
//! ## Nested key order
//!
//! Existing servers were built against a client that walked nested mappings
//! backwards and never emitted their first key. [`NestedKeyOrder::LegacyReverse`]
//! (the default) reproduces those payloads byte for byte;
//! [`NestedKeyOrder::Forward`] emits every key in insertion order.

mod encoder;
mod error;
mod value;

pub use encoder::{NestedKeyOrder, QueryEncoder, encode};
pub use error::{QueryError, Result};
pub use value::{Deferred, QueryValue};
