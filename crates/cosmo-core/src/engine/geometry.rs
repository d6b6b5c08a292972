use super::error::StepError;
use crate::core::models::conformer::Conformer;
use crate::core::models::ids::ConformerId;

/// Bit-exact copy of a conformer's atom coordinates.
///
/// Coordinates are compared through `f64::to_bits`, so `0.0` and `-0.0` differ and
/// NaN payloads are compared exactly; "close enough" does not count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometrySnapshot {
    coordinates: Vec<[u64; 3]>,
}

impl GeometrySnapshot {
    pub fn capture(conformer: &Conformer) -> Self {
        Self {
            coordinates: conformer
                .positions()
                .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
                .collect(),
        }
    }

    pub fn atom_count(&self) -> usize {
        self.coordinates.len()
    }

    /// Index of the first atom whose coordinates differ from the snapshot, or
    /// `None` if the geometry is identical. A change in atom count reports the
    /// first index present in only one of the two.
    pub fn first_difference(&self, conformer: &Conformer) -> Option<usize> {
        let current = Self::capture(conformer);
        self.coordinates
            .iter()
            .zip(&current.coordinates)
            .position(|(a, b)| a != b)
            .or_else(|| {
                (self.atom_count() != current.atom_count())
                    .then(|| self.atom_count().min(current.atom_count()))
            })
    }

    /// Checks that `conformer` still has exactly the captured geometry.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::GeometryMutated`] naming the first differing atom.
    pub fn verify(&self, id: &ConformerId, conformer: &Conformer) -> Result<(), StepError> {
        match self.first_difference(conformer) {
            None => Ok(()),
            Some(atom) => Err(StepError::GeometryMutated {
                id: id.clone(),
                atom,
            }),
        }
    }
}

/// Runs `action` on a conformer and verifies afterwards that its geometry is
/// untouched. The action's own error takes precedence over the geometry check.
pub fn guard<F, R>(id: &ConformerId, conformer: &mut Conformer, action: F) -> Result<R, StepError>
where
    F: FnOnce(&mut Conformer) -> Result<R, StepError>,
{
    let snapshot = GeometrySnapshot::capture(conformer);
    let result = action(conformer);
    let verified = snapshot.verify(id, conformer);
    let value = result?;
    verified.map(|()| value)
}
