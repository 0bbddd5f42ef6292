#![forbid(unsafe_code)]

#[cfg(feature = "context")]
pub mod context;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "prelude")]
pub mod prelude;
#[cfg(feature = "signal")]
pub mod signal;
