//! # meshsnr - Direct-Link SNR Measurement for Meshtastic Meshes
//!
//! meshsnr measures the signal-to-noise ratio between the local radio and one
//! neighboring node by sending repeated traceroutes and keeping only readings
//! taken over a single radio hop. A companion converter turns the printed run
//! log into CSV for offline analysis.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                `meshtastic` client (external)                │
//! │          --nodes                  --traceroute <id>          │
//! └──────────────┬──────────────────────────────┬────────────────┘
//!                │ node table text              │ route text
//!                ▼                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    meshsnr (This Crate)                      │
//! │                                                              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//! │  │ node_table  │──▶│  preflight  │──▶│  scheduler  │         │
//! │  │  (parser)   │   │ (0 hops?)   │   │ (N traces)  │         │
//! │  └─────────────┘   └─────────────┘   └──────┬──────┘         │
//! │                                             │                │
//! │                    ┌─────────────┐   ┌──────▼──────┐         │
//! │                    │  analysis   │◀──│    route    │         │
//! │                    │ (averages)  │   │  (parser)   │         │
//! │                    └─────────────┘   └─────────────┘         │
//! │                                                              │
//! │  run log ──▶ ┌─────────────┐ ──▶ <log>.csv                   │
//! │              │   export    │                                 │
//! │              └─────────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`link`]: the [`link::RadioLink`] seam and its `meshtastic` process backend
//! - [`node_table`]: header-driven parsing of the box-drawn node table
//! - [`preflight`]: direct-neighbor verification before any probe is sent
//! - [`route`]: return-path parsing with strict single-hop validation
//! - [`scheduler`]: sequential, timed repetitions with per-attempt reporting
//! - [`analysis`]: sample accumulation and final averages
//! - [`export`]: run log → CSV conversion
//! - [`cli`]: command-line argument parsing and configuration
//! - [`domain`]: core types (`NodeId`, `Snr`, `ProbeOutcome`) and errors
//!
//! ## Two Notions of "Direct"
//!
//! The node table's `Hops` column gates the run: anything other than `0` stops
//! it before probing. After that, each traceroute's own hop count decides
//! whether that single reading is kept. A relayed response is dropped and
//! logged as a warning, but does not end the run.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Eight traces, fifteen minutes apart, keeping the log
//! meshsnr probe '!ba4bf9d0' --port /dev/ttyUSB0 | tee pepper.log
//!
//! # Later: structured output for analysis
//! meshsnr convert pepper.log
//! ```

pub mod analysis;
pub mod cli;
pub mod domain;
pub mod export;
pub mod link;
pub mod node_table;
pub mod preflight;
pub mod route;
pub mod scheduler;
