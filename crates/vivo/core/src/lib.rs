//! Vivo Push Core Types
//!
//! Configuration, request/report types and wire contracts for the vivo push gateway.

mod config;
mod credentials;
mod error;
mod report;
mod request;
mod statistics;
mod token;
mod wire;

pub use config::*;
pub use credentials::*;
pub use error::*;
pub use report::*;
pub use request::*;
pub use statistics::*;
pub use token::*;
pub use wire::*;
