//! # Core Models Module
//!
//! Data structures describing the molecules a calculation step works on.
//!
//! ## Key Components
//!
//! - [`atom`] - Element symbol and 3D position of a single atom
//! - [`conformer`] - One 3D geometry with its attached property store
//! - [`compound`] - Compounds and their stereochemical/tautomeric enumerations
//! - [`properties`] - The string-keyed property and payload store
//! - [`ids`] - Positional identity of a conformer within a batch
//! - [`topology`] - Bonds and bond orders
//!
//! ## Usage
//!
//! ```ignore
//! use cosmoprop::core::models::{atom::Atom, compound::Compound, conformer::Conformer};
//!
//! let conformer = Conformer::new(vec![Atom::new("C", Point3::new(0.0, 0.0, 0.0))]);
//! let mut compound = Compound::new("paracetamol");
//! compound.add_enumeration().add_conformer(conformer);
//! ```

pub mod atom;
pub mod compound;
pub mod conformer;
pub mod ids;
pub mod properties;
pub mod topology;
