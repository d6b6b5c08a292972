use phf::{Map, phf_map};

/// Name of the general-block energy property.
pub const E_COSMO_KEY: &str = "E_cosmo";

/// A solvent block kind the parser knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolventBlockKind {
    /// Phrase in the block header identifying the kind.
    pub header_phrase: &'static str,
    /// Label of the line carrying the value.
    pub value_label: &'static str,
    /// Property key prefix; the solvent token is appended after an underscore.
    pub key_prefix: &'static str,
}

/// Literal markers of a COSMOtherm report.
///
/// The parser never embeds a marker string of its own; everything it looks for
/// comes from one of these tables.
#[derive(Debug, Clone, Copy)]
pub struct ReportLabels {
    /// Phrase starting the general block.
    pub general_header: &'static str,
    /// Label of the general-block line holding the total COSMO energy.
    pub e_cosmo: &'static str,
    /// Leading whitespace-separated words of a solvent block header.
    pub solvent_header: &'static [&'static str],
    /// Marker in a solvent block header after which the solvent name follows.
    pub solvent_marker: &'static str,
    /// Recognised solvent block kinds, checked in order.
    pub solvent_kinds: &'static [SolventBlockKind],
    /// Short tokens for solvents whose COSMO database names are long.
    pub solvent_aliases: &'static Map<&'static str, &'static str>,
}

#[rustfmt::skip]
static SOLVENT_ALIASES: Map<&'static str, &'static str> = phf_map! {
    "methanol"          => "meoh",
    "water"             => "h2o",
    "1-octanol"         => "octanol",
    "dimethylsulfoxide" => "dmso",
    "acetone"           => "propanone",
};

static SOLVENT_BLOCK_KINDS: [SolventBlockKind; 2] = [
    SolventBlockKind {
        header_phrase: "Gibbs free energy of solvation",
        value_label: "Free energy of solvation",
        key_prefix: "Gsolv",
    },
    SolventBlockKind {
        header_phrase: "Free energy in solution",
        value_label: "Free energy of molecule in mix",
        key_prefix: "G",
    },
];

/// Labels of the COSMOtherm 20 `.out` report.
pub static COSMOTHERM_LABELS: ReportLabels = ReportLabels {
    general_header: "Compound properties",
    e_cosmo: "Total COSMO energy",
    solvent_header: &["Property", "job"],
    solvent_marker: "solvent:",
    solvent_kinds: &SOLVENT_BLOCK_KINDS,
    solvent_aliases: &SOLVENT_ALIASES,
};

impl ReportLabels {
    pub fn is_general_header(&self, line: &str) -> bool {
        line.contains(self.general_header)
    }

    pub fn is_solvent_header(&self, line: &str) -> bool {
        let mut words = line.split_whitespace();
        self.solvent_header
            .iter()
            .all(|expected| words.next() == Some(*expected))
    }

    /// Returns the first solvent block kind whose phrase appears in `header`.
    pub fn solvent_kind(&self, header: &str) -> Option<&'static SolventBlockKind> {
        self.solvent_kinds
            .iter()
            .find(|kind| header.contains(kind.header_phrase))
    }

    /// Extracts the solvent name following the solvent marker, translated
    /// through the alias table.
    pub fn solvent_token<'a>(&self, header: &'a str) -> Option<&'a str> {
        let (_, rest) = header.split_once(self.solvent_marker)?;
        let name = rest.split_whitespace().next()?;
        Some(self.solvent_aliases.get(name).copied().unwrap_or(name))
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        COSMOTHERM_LABELS
    }
}
