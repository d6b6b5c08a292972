//! Reading and writing conformers as molecular files.
//!
//! The only format is MDL SDF (V2000 connection tables). Scalar properties
//! travel as SDF data items, so a processed batch can be written out with
//! every committed property attached.

pub mod sdf;
pub mod traits;
