use nalgebra::Point3;

/// Represents a single atom of a conformer geometry.
///
/// Atoms carry only what a solvation step and the SDF serializer need: the
/// element symbol and the Cartesian position. Everything else about a molecule
/// lives in the conformer's property store.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "C", "N", "Cl").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` from an element symbol and a position.
    ///
    /// # Arguments
    ///
    /// * `element` - The element symbol of the atom.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            position,
        }
    }

    /// Returns the coordinates as a plain `[x, y, z]` array.
    pub fn coordinates(&self) -> [f64; 3] {
        [self.position.x, self.position.y, self.position.z]
    }
}
