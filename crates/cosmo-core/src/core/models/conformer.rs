use super::atom::Atom;
use super::properties::PropertyStore;
use super::topology::Bond;
use nalgebra::Point3;

/// A single 3D geometry of an enumeration together with its annotations.
///
/// Atoms and bonds are fixed at construction and only exposed through shared
/// references; the property store is the one part of a conformer a calculation
/// step is allowed to change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conformer {
    /// Record title (first line of an SDF record).
    title: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    properties: PropertyStore,
}

impl Conformer {
    /// Creates a conformer from its atoms, with no bonds and an empty store.
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self {
            atoms,
            ..Default::default()
        }
    }

    pub fn with_bonds(mut self, bonds: Vec<Bond>) -> Self {
        self.bonds = bonds;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Returns the atom positions in atom order.
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.atoms.iter().map(|a| &a.position)
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::BondOrder;

    fn water() -> Conformer {
        Conformer::new(vec![
            Atom::new("O", Point3::new(0.0, 0.0, 0.0)),
            Atom::new("H", Point3::new(0.96, 0.0, 0.0)),
            Atom::new("H", Point3::new(-0.24, 0.93, 0.0)),
        ])
        .with_bonds(vec![
            Bond::new(0, 1, BondOrder::Single),
            Bond::new(0, 2, BondOrder::Single),
        ])
        .with_title("water")
    }

    #[test]
    fn new_conformer_has_empty_store() {
        let conformer = water();
        assert_eq!(conformer.atom_count(), 3);
        assert_eq!(conformer.bonds().len(), 2);
        assert_eq!(conformer.title(), "water");
        assert!(conformer.properties().is_empty());
    }

    #[test]
    fn positions_follow_atom_order() {
        let conformer = water();
        let positions: Vec<_> = conformer.positions().copied().collect();
        assert_eq!(positions[1], Point3::new(0.96, 0.0, 0.0));
    }

    #[test]
    fn writing_properties_leaves_atoms_untouched() {
        let mut conformer = water();
        let before = conformer.atoms().to_vec();
        conformer.properties_mut().set("E_cosmo", "-1.0");
        assert_eq!(conformer.atoms(), before.as_slice());
    }
}
