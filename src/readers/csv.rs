use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use csv::{ByteRecord, Reader, ReaderBuilder};
use tracing::debug;

use crate::types::{CellValue, Result};

use super::{Record, RowSource};

/// Streaming CSV/TSV row source.
///
/// Every field is a string cell; rows shorter than the header read as null
/// for the missing columns and extra trailing fields are ignored.
pub struct CsvSource<R: Read> {
    reader: Reader<R>,
    headers: Arc<[String]>,
    record: ByteRecord,
}

impl CsvSource<BufReader<File>> {
    /// Open a delimited file with a header row
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path)?;
        debug!(path = %path.display(), delimiter = %(delimiter as char), "opening delimited file");
        Self::from_reader(BufReader::new(file), delimiter)
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Arc<[String]> = reader
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        Ok(Self {
            reader,
            headers,
            record: ByteRecord::new(),
        })
    }
}

impl<R: Read> RowSource for CsvSource<R> {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn next_row(&mut self) -> Option<Result<Record>> {
        match self.reader.read_byte_record(&mut self.record) {
            Ok(true) => {
                // Invalid UTF-8 stays a scannable string rather than failing the row
                let values = (0..self.headers.len())
                    .map(|idx| match self.record.get(idx) {
                        Some(field) => CellValue::String(String::from_utf8_lossy(field).into_owned()),
                        None => CellValue::Null,
                    })
                    .collect();
                Some(Ok(Record::new(Arc::clone(&self.headers), values)))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn collect(source: &mut dyn RowSource) -> Vec<Record> {
        let mut rows = Vec::new();
        while let Some(row) = source.next_row() {
            rows.push(row.unwrap());
        }
        rows
    }

    #[test]
    fn test_basic_csv_read() {
        let file = create_test_csv("id,name,age\n1,Alice,30\n2,Bob,25\n3,Charlie,35\n");

        let mut source = CsvSource::open(file.path(), b',').unwrap();
        assert_eq!(source.headers(), &["id", "name", "age"]);

        let rows = collect(&mut source);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].get("name"), &CellValue::from("Bob"));
        assert_eq!(rows[2].get("age"), &CellValue::from("35"));
    }

    #[test]
    fn test_short_rows_read_as_null() {
        let file = create_test_csv("a,b,c\n1,2\n4,5,6,7\n");

        let mut source = CsvSource::open(file.path(), b',').unwrap();
        let rows = collect(&mut source);

        assert_eq!(rows[0].get("c"), &CellValue::Null);
        assert_eq!(rows[1].get("c"), &CellValue::from("6"));
    }

    #[test]
    fn test_empty_fields_are_empty_strings() {
        let file = create_test_csv("a,b\n,x\n");

        let mut source = CsvSource::open(file.path(), b',').unwrap();
        let rows = collect(&mut source);
        assert_eq!(rows[0].get("a"), &CellValue::from(""));
    }

    #[test]
    fn test_tab_delimiter() {
        let data = "pc\tnote\nLE1 5WW\thello, world\n";
        let mut source = CsvSource::from_reader(data.as_bytes(), b'\t').unwrap();
        let rows = collect(&mut source);
        assert_eq!(rows[0].get("note"), &CellValue::from("hello, world"));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let data: &[u8] = b"name\nsm\xffith\n";
        let mut source = CsvSource::from_reader(data, b',').unwrap();
        let rows = collect(&mut source);
        assert_eq!(rows[0].get("name"), &CellValue::from("sm\u{fffd}ith"));
    }

    #[test]
    fn test_header_only_file() {
        let file = create_test_csv("a,b\n");
        let mut source = CsvSource::open(file.path(), b',').unwrap();
        assert_eq!(source.headers().len(), 2);
        assert!(source.next_row().is_none());
    }
}
