//! Vivo Push Delivery
//!
//! Batched delivery and statistics aggregation against the vivo push gateway.

mod chunk;
mod client;
mod dispatch;
mod events;
mod gateway;
mod router;
mod statistics;
mod token;
mod traits;
mod transport;

#[cfg(test)]
mod testing;

pub use chunk::chunk;
pub use client::VivoClient;
pub use dispatch::Dispatcher;
pub use router::DeliveryRouter;
pub use statistics::StatisticsAggregator;
pub use token::TokenCache;
pub use traits::*;
pub use transport::*;

// Re-export for convenience
pub use vivo_core;
