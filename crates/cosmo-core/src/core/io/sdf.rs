use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::conformer::Conformer;
use crate::core::models::topology::{Bond, BondOrder};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

const RECORD_SEPARATOR: &str = "$$$$";
const PROPERTY_BLOCK_END: &str = "M  END";
const PROGRAM_LINE: &str = "  cosmoprop";
/// Largest atom or bond count the three-column V2000 counts line can hold.
const MAX_V2000_COUNT: usize = 999;

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: SdfParseErrorKind },
    #[error("Record '{title}' cannot be written as V2000: {kind}")]
    Unwritable {
        title: String,
        kind: SdfWriteErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdfWriteErrorKind {
    #[error("{count} {section} exceed the V2000 limit of 999")]
    CountOverflow {
        section: &'static str,
        count: usize,
    },
    #[error("Data item name '{key}' contains '<', '>' or a line break")]
    InvalidKey { key: String },
    #[error("Value of '{key}' contains a blank line, which would end the data item")]
    BlankLineInValue { key: String },
    #[error("Value of '{key}' has a line starting with '>' or '$$$$'")]
    ReservedLineInValue { key: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdfParseErrorKind {
    #[error("Record ends before its counts line")]
    MissingCountsLine,
    #[error("Only V2000 connection tables are supported")]
    UnsupportedVersion,
    #[error("Invalid {field} (value: '{value}')")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Record ends before all {expected} {section} lines were read")]
    TruncatedRecord {
        section: &'static str,
        expected: usize,
    },
    #[error("Atom line has no element symbol")]
    MissingElement,
    #[error("Bond references atom {atom}, but the record has {atom_count} atoms")]
    BondAtomOutOfRange { atom: usize, atom_count: usize },
    #[error("Unsupported bond order code {0}")]
    UnsupportedBondOrder(u8),
    #[error("Data header has no <name> field")]
    MalformedDataHeader,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("").trim()
}

fn parse_error(line: usize, kind: SdfParseErrorKind) -> SdfError {
    SdfError::Parse { line, kind }
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    field: &'static str,
    value: &str,
) -> Result<T, SdfError> {
    value.parse().map_err(|_| {
        parse_error(
            line,
            SdfParseErrorKind::InvalidNumber {
                field,
                value: value.to_string(),
            },
        )
    })
}

/// MDL SDF reader and writer.
///
/// Data items are read into the conformer's property store as text. Multi-line
/// data values are joined with `\n`.
pub struct SdfFile;

impl MolecularFile for SdfFile {
    type Error = SdfError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Conformer>, Self::Error> {
        let mut conformers = Vec::new();
        let mut record: Vec<(usize, String)> = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim_end() == RECORD_SEPARATOR {
                conformers.push(parse_record(&record)?);
                record.clear();
            } else {
                record.push((idx + 1, line));
            }
        }
        if record.iter().any(|(_, l)| !l.trim().is_empty()) {
            conformers.push(parse_record(&record)?);
        }

        debug!(records = conformers.len(), "Read SDF records.");
        Ok(conformers)
    }

    fn write_to<'a>(
        conformers: impl IntoIterator<Item = &'a Conformer>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for conformer in conformers {
            write_record(conformer, writer)?;
        }
        Ok(())
    }
}

fn parse_record(lines: &[(usize, String)]) -> Result<Conformer, SdfError> {
    let last_line = lines.last().map_or(0, |(n, _)| *n);
    let Some((counts_no, counts)) = lines.get(3) else {
        return Err(parse_error(last_line, SdfParseErrorKind::MissingCountsLine));
    };
    if counts.contains("V3000") {
        return Err(parse_error(*counts_no, SdfParseErrorKind::UnsupportedVersion));
    }
    let atom_count: usize = parse_number(*counts_no, "atom count", slice_and_trim(counts, 0, 3))?;
    let bond_count: usize = parse_number(*counts_no, "bond count", slice_and_trim(counts, 3, 6))?;

    let atom_lines = lines.get(4..4 + atom_count).ok_or_else(|| {
        parse_error(
            last_line,
            SdfParseErrorKind::TruncatedRecord {
                section: "atom",
                expected: atom_count,
            },
        )
    })?;
    let bond_start = 4 + atom_count;
    let bond_lines = lines
        .get(bond_start..bond_start + bond_count)
        .ok_or_else(|| {
            parse_error(
                last_line,
                SdfParseErrorKind::TruncatedRecord {
                    section: "bond",
                    expected: bond_count,
                },
            )
        })?;

    let atoms = atom_lines
        .iter()
        .map(|(n, l)| parse_atom(*n, l))
        .collect::<Result<Vec<_>, _>>()?;
    let bonds = bond_lines
        .iter()
        .map(|(n, l)| parse_bond(*n, l, atom_count))
        .collect::<Result<Vec<_>, _>>()?;

    let title = lines[0].1.trim();
    let mut conformer = Conformer::new(atoms).with_bonds(bonds).with_title(title);

    let trailer = &lines[bond_start + bond_count..];
    let data_start = trailer
        .iter()
        .position(|(_, l)| l.trim_end() == PROPERTY_BLOCK_END)
        .map_or(trailer.len(), |p| p + 1);
    for (key, value) in parse_data_items(&trailer[data_start..])? {
        conformer.properties_mut().set(&key, value);
    }
    Ok(conformer)
}

fn parse_atom(line_no: usize, line: &str) -> Result<Atom, SdfError> {
    let x = parse_number(line_no, "x coordinate", slice_and_trim(line, 0, 10))?;
    let y = parse_number(line_no, "y coordinate", slice_and_trim(line, 10, 20))?;
    let z = parse_number(line_no, "z coordinate", slice_and_trim(line, 20, 30))?;
    let element = slice_and_trim(line, 31, 34);
    if element.is_empty() {
        return Err(parse_error(line_no, SdfParseErrorKind::MissingElement));
    }
    Ok(Atom::new(element, Point3::new(x, y, z)))
}

fn parse_bond(line_no: usize, line: &str, atom_count: usize) -> Result<Bond, SdfError> {
    let a1: usize = parse_number(line_no, "first bond atom", slice_and_trim(line, 0, 3))?;
    let a2: usize = parse_number(line_no, "second bond atom", slice_and_trim(line, 3, 6))?;
    let code: u8 = parse_number(line_no, "bond order", slice_and_trim(line, 6, 9))?;

    for atom in [a1, a2] {
        if atom == 0 || atom > atom_count {
            return Err(parse_error(
                line_no,
                SdfParseErrorKind::BondAtomOutOfRange { atom, atom_count },
            ));
        }
    }
    let order = BondOrder::from_ctfile(code)
        .map_err(|e| parse_error(line_no, SdfParseErrorKind::UnsupportedBondOrder(e.0)))?;
    Ok(Bond::new(a1 - 1, a2 - 1, order))
}

fn parse_data_items(lines: &[(usize, String)]) -> Result<Vec<(String, String)>, SdfError> {
    let mut items = Vec::new();
    let mut iter = lines.iter().peekable();

    while let Some((line_no, line)) = iter.next() {
        if !line.starts_with('>') {
            continue;
        }
        let key = line
            .split_once('<')
            .and_then(|(_, rest)| rest.split_once('>'))
            .map(|(name, _)| name.to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| parse_error(*line_no, SdfParseErrorKind::MalformedDataHeader))?;

        let mut value = Vec::new();
        while let Some((_, next)) = iter.peek() {
            if next.trim().is_empty() {
                iter.next();
                break;
            }
            if next.starts_with('>') {
                break;
            }
            value.push(next.as_str());
            iter.next();
        }
        items.push((key, value.join("\n")));
    }
    Ok(items)
}

/// Rejects records the reader could not read back as written.
fn check_writable(conformer: &Conformer) -> Result<(), SdfError> {
    let unwritable = |kind| SdfError::Unwritable {
        title: conformer.title().to_string(),
        kind,
    };
    for (section, count) in [
        ("atoms", conformer.atom_count()),
        ("bonds", conformer.bonds().len()),
    ] {
        if count > MAX_V2000_COUNT {
            return Err(unwritable(SdfWriteErrorKind::CountOverflow { section, count }));
        }
    }
    for (key, value) in conformer.properties().iter() {
        if key.contains(['<', '>', '\n', '\r']) {
            return Err(unwritable(SdfWriteErrorKind::InvalidKey { key: key.to_string() }));
        }
        let value = value.as_str();
        if value.is_empty() {
            continue;
        }
        for line in value.split('\n') {
            if line.trim().is_empty() {
                return Err(unwritable(SdfWriteErrorKind::BlankLineInValue {
                    key: key.to_string(),
                }));
            }
            if line.starts_with('>') || line.trim_end() == RECORD_SEPARATOR {
                return Err(unwritable(SdfWriteErrorKind::ReservedLineInValue {
                    key: key.to_string(),
                }));
            }
        }
    }
    Ok(())
}

fn write_record(conformer: &Conformer, writer: &mut impl Write) -> Result<(), SdfError> {
    check_writable(conformer)?;
    writeln!(writer, "{}", conformer.title())?;
    writeln!(writer, "{PROGRAM_LINE}")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        conformer.atom_count(),
        conformer.bonds().len()
    )?;

    for atom in conformer.atoms() {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.position.x, atom.position.y, atom.position.z, atom.element
        )?;
    }
    for bond in conformer.bonds() {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.atom1 + 1,
            bond.atom2 + 1,
            bond.order.to_ctfile()
        )?;
    }
    writeln!(writer, "{PROPERTY_BLOCK_END}")?;

    for (key, value) in conformer.properties().iter() {
        writeln!(writer, ">  <{key}>")?;
        writeln!(writer, "{value}")?;
        writeln!(writer)?;
    }
    writeln!(writer, "{RECORD_SEPARATOR}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::properties::PropertyValue;
    use std::io::Cursor;

    const FIXTURE: &str = include_str!("../../../tests/data/paracetamol.sdf");

    fn read(text: &str) -> Result<Vec<Conformer>, SdfError> {
        SdfFile::read_from(&mut Cursor::new(text.as_bytes()))
    }

    fn write(conformers: &[Conformer]) -> String {
        let mut buf = Vec::new();
        SdfFile::write_to(conformers, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn parse_kind(result: Result<Vec<Conformer>, SdfError>) -> SdfParseErrorKind {
        match result {
            Err(SdfError::Parse { kind, .. }) => kind,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    mod reading {
        use super::*;

        #[test]
        fn fixture_records_are_read_in_order() {
            let conformers = read(FIXTURE).unwrap();
            assert_eq!(conformers.len(), 2);
            for conformer in &conformers {
                assert_eq!(conformer.title(), "paracetamol");
                assert_eq!(conformer.atom_count(), 11);
                assert_eq!(conformer.bonds().len(), 11);
            }
            let first = &conformers[0];
            assert_eq!(first.atoms()[0].element, "O");
            assert_eq!(first.atoms()[0].coordinates(), [5.3347, 12.9328, 24.6745]);
            assert_eq!(first.bonds()[1], Bond::new(1, 2, BondOrder::Double));
        }

        #[test]
        fn data_items_become_text_properties() {
            let conformers = read(FIXTURE).unwrap();
            let store = conformers[0].properties();
            assert_eq!(
                store.get("smiles").unwrap(),
                &PropertyValue::Text("CC(=O)Nc1ccc(O)cc1".into())
            );
            assert_eq!(store.get("conformer_energy").unwrap().as_str(), "-12.5");
            assert_eq!(conformers[1].properties().len(), 1);
        }

        #[test]
        fn multi_line_data_values_are_joined() {
            let text = "t\n\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0  0\nM  END\n>  <note>\nfirst\nsecond\n\n$$$$\n";
            let conformers = read(text).unwrap();
            assert_eq!(
                conformers[0].properties().get("note").unwrap().as_str(),
                "first\nsecond"
            );
        }

        #[test]
        fn missing_trailing_separator_still_yields_record() {
            let text = "t\n\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    1.0000    2.0000    3.0000 N   0  0\nM  END\n";
            let conformers = read(text).unwrap();
            assert_eq!(conformers.len(), 1);
            assert_eq!(conformers[0].atoms()[0].coordinates(), [1.0, 2.0, 3.0]);
        }

        #[test]
        fn empty_input_yields_no_records() {
            assert!(read("").unwrap().is_empty());
            assert!(read("\n\n").unwrap().is_empty());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn v3000_is_rejected() {
            let text = "t\n\n\n  0  0  0     0  0            999 V3000\nM  END\n$$$$\n";
            assert_eq!(parse_kind(read(text)), SdfParseErrorKind::UnsupportedVersion);
        }

        #[test]
        fn record_without_counts_line_is_rejected() {
            assert_eq!(
                parse_kind(read("title\nprogram\n$$$$\n")),
                SdfParseErrorKind::MissingCountsLine
            );
        }

        #[test]
        fn truncated_atom_block_is_rejected() {
            let text = "t\n\n\n  3  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0  0\n$$$$\n";
            assert!(matches!(
                parse_kind(read(text)),
                SdfParseErrorKind::TruncatedRecord { section: "atom", expected: 3 }
            ));
        }

        #[test]
        fn invalid_coordinate_reports_line() {
            let text = "t\n\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    abcdef    0.0000    0.0000 C   0  0\nM  END\n$$$$\n";
            match read(text) {
                Err(SdfError::Parse { line, kind }) => {
                    assert_eq!(line, 5);
                    assert!(matches!(
                        kind,
                        SdfParseErrorKind::InvalidNumber { field: "x coordinate", .. }
                    ));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[test]
        fn bond_to_missing_atom_is_rejected() {
            let text = "t\n\n\n  1  1  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0  0\n  1  2  1  0  0  0  0\nM  END\n$$$$\n";
            assert_eq!(
                parse_kind(read(text)),
                SdfParseErrorKind::BondAtomOutOfRange {
                    atom: 2,
                    atom_count: 1
                }
            );
        }

        #[test]
        fn unknown_bond_order_is_rejected() {
            let text = "t\n\n\n  2  1  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0  0\n    1.0000    0.0000    0.0000 C   0  0\n  1  2  8  0  0  0  0\nM  END\n$$$$\n";
            assert_eq!(
                parse_kind(read(text)),
                SdfParseErrorKind::UnsupportedBondOrder(8)
            );
        }
    }

    mod writing {
        use super::*;

        #[test]
        fn writer_emits_every_committed_property() {
            let mut conformer = read(FIXTURE).unwrap().remove(0);
            conformer.properties_mut().commit(vec![
                ("E_cosmo".to_string(), PropertyValue::Numeric("-406899.0254".into())),
                ("Gsolv_h2o".to_string(), PropertyValue::Numeric("-10.51388".into())),
                ("G_propanone".to_string(), PropertyValue::Numeric("-406899.11871".into())),
            ]);
            let text = write(std::slice::from_ref(&conformer));

            for key in conformer.properties().keys() {
                assert!(text.contains(&format!(">  <{key}>\n")), "missing {key}");
            }
            assert!(text.contains(">  <Gsolv_h2o>\n-10.51388\n"));
            assert!(text.trim_end().ends_with(RECORD_SEPARATOR));
        }

        #[test]
        fn written_records_read_back_with_geometry_and_properties() {
            let conformers = read(FIXTURE).unwrap();
            let reread = read(&write(&conformers)).unwrap();

            assert_eq!(reread.len(), conformers.len());
            for (a, b) in conformers.iter().zip(&reread) {
                assert_eq!(a.title(), b.title());
                assert_eq!(a.bonds(), b.bonds());
                assert_eq!(a.properties(), b.properties());
                for (x, y) in a.atoms().iter().zip(b.atoms()) {
                    assert_eq!(x.element, y.element);
                    assert!((x.position - y.position).norm() < 1e-4);
                }
            }
        }

        fn write_err(conformer: &Conformer) -> SdfWriteErrorKind {
            let mut buf = Vec::new();
            match SdfFile::write_to(std::iter::once(conformer), &mut buf) {
                Err(SdfError::Unwritable { kind, .. }) => {
                    assert!(buf.is_empty(), "partial record written");
                    kind
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[test]
        fn more_than_999_atoms_is_rejected() {
            let atoms = (0..1000)
                .map(|i| Atom::new("C", Point3::new(i as f64, 0.0, 0.0)))
                .collect();
            let conformer = Conformer::new(atoms).with_title("big");
            assert_eq!(
                write_err(&conformer),
                SdfWriteErrorKind::CountOverflow {
                    section: "atoms",
                    count: 1000
                }
            );
        }

        #[test]
        fn value_with_blank_line_is_rejected() {
            let mut conformer = read(FIXTURE).unwrap().remove(0);
            conformer.properties_mut().set("comment", "first\n\nsecond");
            assert_eq!(
                write_err(&conformer),
                SdfWriteErrorKind::BlankLineInValue {
                    key: "comment".into()
                }
            );
        }

        #[test]
        fn value_with_record_separator_is_rejected() {
            let mut conformer = read(FIXTURE).unwrap().remove(0);
            conformer.properties_mut().set("comment", "first\n$$$$");
            assert_eq!(
                write_err(&conformer),
                SdfWriteErrorKind::ReservedLineInValue {
                    key: "comment".into()
                }
            );
        }

        #[test]
        fn multi_line_value_reads_back_intact() {
            let mut conformer = read(FIXTURE).unwrap().remove(0);
            conformer.properties_mut().set("comment", "first\nsecond");
            let reread = read(&write(std::slice::from_ref(&conformer))).unwrap();
            assert_eq!(
                reread[0].properties().get("comment").unwrap().as_str(),
                "first\nsecond"
            );
        }

        #[test]
        fn write_to_path_creates_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("out.sdf");
            let conformers = read(FIXTURE).unwrap();
            SdfFile::write_to_path(&conformers, &path).unwrap();
            assert_eq!(SdfFile::read_from_path(&path).unwrap().len(), 2);
        }
    }
}
