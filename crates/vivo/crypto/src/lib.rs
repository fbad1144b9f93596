//! Vivo Crypto Utilities
//!
//! Request signing for the vivo push gateway.

mod signature;

pub use signature::*;
