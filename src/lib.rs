//! # rylv-dogstatsd
//!
//! A `DogStatsD` client for Rust that encodes metrics and events into the
//! `DogStatsD` datagram format and sends each one as its own UDP packet.
//!
//! ## Features
//!
//! - **Exact wire output**: `[namespace.]name:value|type[|@rate][|#tags]` and `_e{..}` events
//! - **Client state**: a namespace and de-duplicated instance tags merged into every packet
//! - **Packet guard**: oversized packets are either cut to the limit or rejected
//! - **Sync and fire-and-forget sends**: the same encode path runs inline or as a [`SendTask`]
//! - **Custom transports** through the [`Writer`] trait
//!
//! ## Quick Start
//!
//! ```no_run
//! use rylv_dogstatsd::{AsyncClient, Client, ClientOptions, EventFields, NO_TAGS};
//! use rylv_dogstatsd::{gauge, incr};
//!
//! let options = ClientOptions {
//!     namespace: "myapp".to_string(),
//!     tags: vec!["env:prod".to_string()],
//!     ..ClientOptions::default()
//! };
//! let client = Client::with_options(options)?;
//!
//! client.incr("request.count", &["endpoint:api"])?;
//! client.timing("request.latency", 42.5, NO_TAGS)?;
//! client.event("deploy", "version 2 is live", Some(&EventFields::new().alert_type("info")), NO_TAGS)?;
//!
//! // Convenience macros
//! incr!(client, "request.count", "endpoint:api")?;
//! gauge!(client, "connections.active", 100, "pool:main")?;
//!
//! // Fire-and-forget sends, waited on through a group
//! let async_client = AsyncClient::from_client(client);
//! let group = async_client.group();
//! async_client.histogram("payload.size", 512, NO_TAGS, group).spawn();
//! group.wait();
//! # Ok::<(), rylv_dogstatsd::MetricsError>(())
//! ```

// #![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

// https://docs.datadoghq.com/developers/dogstatsd/datagram_shell/?tab=metrics
mod dogstats;
mod error;

pub use dogstats::async_client::{AsyncClient, SendGroup, SendTask};
pub use dogstats::client::Client;
pub use dogstats::encoder::{encode_event, encode_metric, EventFields, MetricType, MetricValue};
pub use dogstats::guard::{guard, MAX_PACKET_SIZE};
pub use dogstats::options::{ClientOptions, DEFAULT_HOST, DEFAULT_PORT};
pub use dogstats::tags::{merge_tags, TagSet};
pub use dogstats::writer::{UdpSocketWriter, Writer};
pub use dogstats::NO_TAGS;
pub use error::MetricsError;

/// Result type for metric operations.
///
/// Wraps errors that can occur while encoding and transmitting metrics and events.
pub type MetricResult<T> = Result<T, MetricsError>;
