use super::conformer::Conformer;
use super::ids::ConformerId;

/// One stereochemical or tautomeric variant of a compound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumeration {
    conformers: Vec<Conformer>,
}

impl Enumeration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a conformer and returns its index within this enumeration.
    pub fn add_conformer(&mut self, conformer: Conformer) -> usize {
        self.conformers.push(conformer);
        self.conformers.len() - 1
    }

    pub fn conformer(&self, index: usize) -> Option<&Conformer> {
        self.conformers.get(index)
    }

    pub fn conformer_mut(&mut self, index: usize) -> Option<&mut Conformer> {
        self.conformers.get_mut(index)
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn conformers_mut(&mut self) -> &mut [Conformer] {
        &mut self.conformers
    }

    pub fn len(&self) -> usize {
        self.conformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conformers.is_empty()
    }
}

/// A molecule identity, the top-level unit a calculation step is run on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    name: String,
    enumerations: Vec<Enumeration>,
}

impl Compound {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enumerations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an empty enumeration and returns it for filling.
    pub fn add_enumeration(&mut self) -> &mut Enumeration {
        self.enumerations.push(Enumeration::new());
        let last = self.enumerations.len() - 1;
        &mut self.enumerations[last]
    }

    pub fn enumeration(&self, index: usize) -> Option<&Enumeration> {
        self.enumerations.get(index)
    }

    pub fn enumeration_mut(&mut self, index: usize) -> Option<&mut Enumeration> {
        self.enumerations.get_mut(index)
    }

    pub fn enumerations(&self) -> &[Enumeration] {
        &self.enumerations
    }

    /// Total number of conformers across all enumerations.
    pub fn conformer_count(&self) -> usize {
        self.enumerations.iter().map(Enumeration::len).sum()
    }

    /// Iterates over every conformer in enumeration order, paired with its
    /// positional identity. `compound_index` is this compound's position in
    /// the batch it belongs to.
    pub fn conformers_with_ids_mut(
        &mut self,
        compound_index: usize,
    ) -> impl Iterator<Item = (ConformerId, &mut Conformer)> {
        let name = self.name.as_str();
        self.enumerations
            .iter_mut()
            .enumerate()
            .flat_map(move |(e_idx, enumeration)| {
                enumeration
                    .conformers
                    .iter_mut()
                    .enumerate()
                    .map(move |(c_idx, conformer)| {
                        (ConformerId::new(name, compound_index, e_idx, c_idx), conformer)
                    })
            })
    }
}
