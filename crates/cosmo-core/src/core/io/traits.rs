use crate::core::models::conformer::Conformer;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface for multi-record molecular file formats.
///
/// A file holds an ordered sequence of conformer records. Readers keep each
/// record's title and data items; writers emit every scalar property a
/// conformer carries.
pub trait MolecularFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every record from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is malformed or reading fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Conformer>, Self::Error>;

    /// Writes the given conformers, one record each.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to<'a>(
        conformers: impl IntoIterator<Item = &'a Conformer>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Conformer>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<'a, P: AsRef<Path>>(
        conformers: impl IntoIterator<Item = &'a Conformer>,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(conformers, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
