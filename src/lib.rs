//! An in-memory test double for a Redis-style key-value client.
//!
//! `kvdouble` models string, hash and set values across numbered databases,
//! with per-key expiry applied lazily on access. Commands are `async` to match
//! the shape of a real client, but never touch the network.
//!
//! ```
//! use kvdouble::{Config, Factory, Ttl};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), kvdouble::Error> {
//! let mut client = Factory::connect(Config::default()).await;
//! client.hmset("user:1", [("name", "ada"), ("age", "36")]).await?;
//! client.expire("user:1", 60).await?;
//! let name = client.hget("user:1", "name").await?;
//! assert_eq!(name.and_then(|f| f.get("name").cloned()).as_deref(), Some("ada"));
//! assert_eq!(client.ttl("user:1").await?, Some(Ttl::Seconds(60)));
//! assert!(client.get("user:1").await.is_err());
//! # Ok(())
//! # }
//! ```

mod client;
mod commands;
mod config;
mod error;
mod factory;
mod pattern;
mod store;
mod telemetry;

pub use client::Client;
pub use config::{Config, DEFAULT_DATABASE, ErrorPolicy, TextEncoding};
pub use error::{Error, Result};
pub use factory::Factory;
pub use pattern::KeyPattern;
pub use store::{Kind, Ttl};
pub use telemetry::describe_metrics;
