//! Typed client for the public [Sumo API](https://sumo-api.com).
//!
//! [`SumoClient`] is async, [`BlockingSumoClient`] blocks the calling
//! thread; both expose the same `get_*` methods and return the same models.
//! Arguments are checked before anything is sent and every response is
//! decoded into an immutable model from [`types`].

mod blocking;
mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod params;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use blocking::BlockingSumoClient;
pub use client::SumoClient;
pub use config::ClientConfig;
pub use error::{Error, InvalidArgument, Result, TransportError, ValidationError};
pub use params::{
    BashoId, Division, HistoryQuery, KimariteMatchesQuery, KimariteQuery, KimariteSortField,
    RikishiQuery, SortOrder,
};
pub use transport::{BlockingHttpTransport, BlockingTransport, HttpTransport, Transport};
