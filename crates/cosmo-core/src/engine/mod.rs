//! # Engine Module
//!
//! The execution layer of cosmoprop: everything needed to run the external
//! solvation tool safely on a conformer, short of the workflow that strings it
//! together.
//!
//! - **Configuration** ([`config`]) - Execution prefix, tool flags and the input deck
//! - **Execution** ([`executor`]) - The external tool abstraction and its process-backed implementation
//! - **Geometry Guard** ([`geometry`]) - Bit-exact snapshots proving a step left coordinates alone
//! - **Progress Monitoring** ([`progress`]) - Callbacks for per-conformer progress
//! - **Error Handling** ([`error`]) - Step errors annotated with the conformer they belong to

pub mod config;
pub mod error;
pub mod executor;
pub mod geometry;
pub mod progress;
