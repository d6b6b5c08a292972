//! # Workflows Module
//!
//! High-level steps that bind the engine to concrete external tools.
//!
//! The [`cosmo`] step runs COSMOtherm on every conformer of a batch and attaches
//! the parsed solvation properties, leaving geometries untouched.

pub mod cosmo;
