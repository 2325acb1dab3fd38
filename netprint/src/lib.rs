//! # netprint
//!
//! Template-driven fingerprinting of network devices over their CLI.
//!
//! netprint logs into an unknown device, works out its prompt, finds which
//! vendor's paging commands it accepts, reads its `show version` output and
//! picks the TextFSM template that parses that output best. The result names
//! the vendor and platform, carries the parsed version facts, and scores how
//! confident the match is.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, behind a small [`Session`]/[`Connector`]
//!   interface so other transports (or recorded transcripts) plug in
//! - Template repositories loaded from an ntc-templates style directory or a
//!   JSON export
//! - Scored best-match selection over TextFSM templates
//! - Optional CDP/LLDP neighbor discovery after a confident match
//! - Concurrent fingerprinting of many devices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netprint::transport::SshConnector;
//! use netprint::{FingerprinterBuilder, Target, TemplateRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netprint::Error> {
//!     let fingerprinter = FingerprinterBuilder::new()
//!         .repository(TemplateRepository::from_dir("ntc-templates/templates")?)
//!         .build()?;
//!
//!     let target = Target::new("192.168.1.1", "admin", "secret");
//!     let result = fingerprinter.fingerprint(&SshConnector::new(), &target).await?;
//!
//!     println!("{:?} {} via {}", result.vendor, result.device_type, result.template_id);
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod fingerprint;
pub mod template;
pub mod transport;
pub mod vendor;

// Re-export main types for convenience
pub use channel::{Connector, Session, SessionCloser, Target};
pub use error::{Error, Result};
pub use fingerprint::{
    FingerprintConfig, FingerprintResult, Fingerprinter, FingerprinterBuilder, ProtocolState,
};
pub use template::{MatchOutcome, Template, TemplateMatcher, TemplateRepository};
pub use vendor::{Vendor, VendorRegistry};
