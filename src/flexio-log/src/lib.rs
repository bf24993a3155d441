//! Provides logging facilities for the FlexIO driver crates.
//!
//! The macros forward to [`defmt`](https://docs.rs/defmt) when the `defmt` feature is
//! enabled, to the [`log`](https://docs.rs/log) facade when the `log` feature is enabled,
//! and compile to nothing otherwise. Arguments are still evaluated in the no-op case so
//! that variables only used for logging do not trigger unused warnings.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(clippy::pedantic)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!(r#"feature "defmt" and feature "log" cannot be enabled at the same time"#);

#[cfg(feature = "defmt")]
pub mod defmt {
    //! Selected [`defmt`] items.

    // Hidden in the docs, but still imported by a wildcard import of this crate's items.
    #[doc(hidden)]
    pub mod hidden {
        // Required so the macros can access it.
        #[doc(hidden)]
        pub use defmt;
    }

    pub use defmt::{Debug2Format, Display2Format, Format};
}

#[cfg(feature = "log")]
#[doc(hidden)]
pub mod log {
    pub use log::{debug, error, info, trace, warn};
}

// The declarative macros are required because the defmt macros expect defmt to be in scope.
macro_rules! define_log_macro {
    ($name:ident, $level:literal, $d:tt) => {
        #[doc = concat!("Logs a message at the ", $level, " level.")]
        #[cfg(feature = "defmt")]
        #[macro_export]
        macro_rules! $name {
            ($d($d arg:tt)*) => {{
                use $d crate::defmt::hidden::defmt;
                defmt::$name!($d($d arg)*);
            }};
        }

        #[doc = concat!("Logs a message at the ", $level, " level.")]
        #[cfg(feature = "log")]
        #[macro_export]
        macro_rules! $name {
            ($d($d arg:tt)*) => {{
                $d crate::log::$name!($d($d arg)*);
            }};
        }

        #[doc = concat!("No-op ", $level, " log macro.")]
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        #[macro_export]
        macro_rules! $name {
            ($d fmt:literal $d(, $d arg:expr)* $d(,)?) => {{
                let _ = ($d fmt, $d(&$d arg),*);
            }};
        }
    };
}

define_log_macro!(trace, "trace", $);
define_log_macro!(debug, "debug", $);
define_log_macro!(info, "info", $);
define_log_macro!(warn, "warn", $);
define_log_macro!(error, "error", $);
