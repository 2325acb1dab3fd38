//! Device fingerprinting protocol.
//!
//! A [`Fingerprinter`] drives a session through prompt detection, paging
//! disable, version retrieval and (optionally) neighbor discovery, then
//! matches what it read against the template repository.
//!
//! ```rust,no_run
//! use netprint::{FingerprinterBuilder, Target, TemplateRepository};
//! use netprint::transport::SshConnector;
//!
//! # async fn example() -> Result<(), netprint::Error> {
//! let fingerprinter = FingerprinterBuilder::new()
//!     .repository(TemplateRepository::from_dir("templates")?)
//!     .build()?;
//!
//! let target = Target::new("192.168.1.1", "admin", "secret");
//! let result = fingerprinter.fingerprint(&SshConnector::new(), &target).await?;
//! println!("{} {:?} ({:.0}%)", result.device_type, result.vendor, result.confidence);
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod hint;
mod paging;
mod protocol;
mod result;
mod state;

pub use builder::FingerprinterBuilder;
pub use config::FingerprintConfig;
pub use hint::{BROADENED_VERSION_HINT, GENERIC_VERSION_HINT, TemplateHint};
pub use protocol::Fingerprinter;
pub use result::{FingerprintResult, device_type};
pub use state::ProtocolState;
