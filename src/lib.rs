//! # klvgen
//!
//! A MISB ST 601.2-style KLV (Key-Length-Value) metadata generator.
//!
//! klvgen renders a fixed 78-byte UAS Local Data Set packet (Universal Key,
//! timestamp, mission id, platform designation, sensor position, LDS version,
//! checksum) and streams it over UDP at a configurable rate. Receivers such as
//! video overlay tools or loggers decode the stream independently; this crate
//! only produces it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use klvgen::config::SessionConfig;
//! use klvgen::sink::UdpSink;
//! use klvgen::stream::StreamLoop;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = SessionConfig::default();
//! config.validate()?;
//!
//! let sink = UdpSink::connect(config.destination())?;
//! let cancel = CancellationToken::new();
//! StreamLoop::new(config, sink).run(cancel).await?;
//! ```
//!
//! The wire layout is fixed: every packet is exactly 78 bytes, multi-byte
//! fields are big-endian, and the trailing 16-bit checksum covers bytes
//! 0..=75. See [`packet`] for the full layout.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checksum;
pub mod clock;
pub mod config;
pub mod error;
pub mod packet;
pub mod scale;
pub mod sink;
pub mod stream;

pub use error::{Error, Result};
