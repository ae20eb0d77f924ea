#![cfg_attr(not(feature = "std"), no_std)]

//! Parsec-style parser combinators.
//!
//! The engine lives in `lite-parsec-core` and is re-exported here as a
//! whole; [`chars`] adds parsers over `char` streams on top of it.

#[cfg(not(feature = "std"))]
extern crate alloc;

pub use lite_parsec_core::*;

#[doc(hidden)]
pub use paste;

pub mod chars;
