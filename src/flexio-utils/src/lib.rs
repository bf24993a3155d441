//! Build-time configuration helpers shared by the FlexIO crates.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(clippy::pedantic)]

/// Environment variable parsing, used by the exported macros.
#[doc(hidden)]
pub mod env;
