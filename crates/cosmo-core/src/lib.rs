//! # cosmoprop Core Library
//!
//! Runs COSMOtherm solvation calculations on molecular conformers and turns the
//! tool's free-form text report into named thermodynamic properties attached back
//! to the conformer that was calculated.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split used across our tooling:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Compound`, `Conformer`,
//!   `PropertyStore`), the pure report parser and SDF I/O.
//!
//! - **[`engine`]: The Execution Layer.** Step configuration, the external tool
//!   executor, the geometry invariance guard and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into the
//!   COSMO calculation step that annotates a batch of compounds.

pub mod core;
pub mod engine;
pub mod workflows;
