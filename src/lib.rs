#![warn(missing_docs)]
//! # fabric_status
//!
//! Reconstructs SAN fabric topology from Fibre Channel switch diagnostic
//! dumps. Given a manifest of per-switch text dumps, the pipeline:
//!
//! 1. parses each dump's command sections into structured records
//!    ([`parser`]),
//! 2. decodes the free-text symbolic descriptors into device attributes
//!    ([`decode`]),
//! 3. classifies each connected device ([`classify`]),
//! 4. aggregates per-switch tables into fabric-wide Port / ISLLink /
//!    ConnectedDeviceRecord collections ([`aggregate`]), and
//! 5. resolves which switches form redundant pairs ([`pairing`]).
//!
//! Processing is best-effort throughout: bad lines are skipped, absent
//! sections flagged, unreadable dumps isolated to their one switch, and
//! everything that needs operator attention lands in the discrepancy
//! report.
//!
//! ## Example
//!
//! ```no_run
//! use fabric_status::{run_analysis, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         manifest: "bundle.txt".into(),
//!         ..Default::default()
//!     };
//!     let report = run_analysis(config).await?;
//!     println!("{} ports", report.ports.len());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod decode;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod inputs;
pub mod models;
pub mod pairing;
pub mod parser;
pub mod report;
pub mod utils;

mod run;

pub use config::{Config, ExportFormat, LogFormat, LogLevel};
pub use report::AnalysisReport;
pub use run::run_analysis;
