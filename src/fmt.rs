//! Logging macros.
//!
//! With the `use-defmt` feature these forward to `defmt`. Without it they expand to nothing, but
//! still borrow their arguments so that values only used for logging don't trigger warnings.
#![allow(unused_macros)]

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::error!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}
