//! # Core Module
//!
//! The stateless building blocks of cosmoprop.
//!
//! - **Molecular Representation** ([`models`]) - Compounds, enumerations, conformers
//!   and the per-conformer property store
//! - **Report Parsing** ([`report`]) - Turning a COSMOtherm report into parsed properties
//! - **File I/O** ([`io`]) - Reading and writing conformers as SDF records
//!
//! Nothing in this module spawns processes or touches shared state; the parser in
//! particular is a pure function of the report lines it is given.

pub mod io;
pub mod models;
pub mod report;
