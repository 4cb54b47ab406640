use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for parsing a structure file format.
///
/// Implementors carry their own layout configuration, so reading is a method
/// on a configured reader rather than a free function.
pub trait StructureReader {
    /// The in-memory representation produced by this format.
    type Output;

    /// The error type for parse and I/O failures.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the document violates the format's layout or the
    /// reader fails.
    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}

/// Defines the interface for serializing a structure in a given format.
pub trait StructureWriter {
    /// The representation this format serializes.
    type Input;

    /// The error type for I/O failures.
    type Error: Error + From<io::Error>;

    /// Renders the complete document into a string.
    fn render(&self, input: &Self::Input) -> String;

    /// Writes a structure to a writer.
    ///
    /// The document is rendered completely before the first byte reaches
    /// `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(&self, input: &Self::Input, writer: &mut impl Write) -> Result<(), Self::Error> {
        let document = self.render(input);
        writer.write_all(document.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a structure to a file path.
    ///
    /// The file is only created once the document has been rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(&self, input: &Self::Input, path: P) -> Result<(), Self::Error> {
        let document = self.render(input);
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(document.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
