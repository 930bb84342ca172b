//! Over-the-air firmware uploads for ESPHome devices
//!
//! This crate implements the client side of the ESPHome OTA upload protocol
//! in [ota], and the wire codec of the native API in [api]. The API message
//! types are generated from `api.proto` by `cargo xtask generate-api`.
//!
//! ## As an application
//!
//! With the `cli` feature enabled (the default) the `espota` binary is built:
//!
//! ```bash
//! espota upload firmware.bin --host living-room.local --password hunter2
//! ```
//!
//! ## As a library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use espota::{ota::try_run_ota, progress::TextProgress};
//!
//! let mut progress = TextProgress::stderr();
//! let address = try_run_ota(
//!     &["living-room.local"],
//!     3232,
//!     Some("hunter2"),
//!     Path::new("firmware.bin"),
//!     &mut progress,
//! )?;
//! println!("Uploaded to {address}");
//! # Ok::<(), espota::OtaError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use self::error::{DeviceErrorKind, Error, OtaError};

pub mod api;
#[cfg(feature = "cli")]
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub mod cli;
pub mod error;
#[cfg(feature = "cli")]
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub mod logging;
pub mod ota;
pub mod progress;
