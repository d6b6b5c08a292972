use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
    Aromatic = 4,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid CTfile bond order code: {0}")]
pub struct ParseBondOrderError(pub u8);

impl BondOrder {
    /// Converts a CTfile (MOL/SDF) bond type code.
    pub fn from_ctfile(code: u8) -> Result<Self, ParseBondOrderError> {
        match code {
            1 => Ok(Self::Single),
            2 => Ok(Self::Double),
            3 => Ok(Self::Triple),
            4 => Ok(Self::Aromatic),
            other => Err(ParseBondOrderError(other)),
        }
    }

    pub fn to_ctfile(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize, // Zero-based index of the first atom
    pub atom2: usize, // Zero-based index of the second atom
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctfile_codes_roundtrip() {
        for order in [
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
            BondOrder::Aromatic,
        ] {
            assert_eq!(BondOrder::from_ctfile(order.to_ctfile()), Ok(order));
        }
    }

    #[test]
    fn unknown_ctfile_code_is_rejected() {
        assert_eq!(BondOrder::from_ctfile(8), Err(ParseBondOrderError(8)));
        assert_eq!(BondOrder::from_ctfile(0), Err(ParseBondOrderError(0)));
    }
}
