use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Comment marker for GAF header and annotation lines.
const COMMENT_MARKER: char = '!';

/// GAF 2.x files carry 17 tab-delimited columns; the last two are optional
/// in older files, so 15 is the required minimum per record.
const REQUIRED_COLUMNS: usize = 15;

const COLUMN_SYMBOL: usize = 2;
const COLUMN_GO_ID: usize = 4;
const COLUMN_ASPECT: usize = 8;

/// One valid data line from a GAF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GafRecord {
    /// Database object symbol (column 3).
    pub symbol: String,
    /// GO term identifier (column 5).
    pub go_id: String,
    /// Aspect code (column 9): P, F, or C.
    pub aspect: String,
}

/// A GAF file on disk that can be re-read from the top.
///
/// Each call to [`GafSource::records`] opens the file again and yields the
/// same sequence, which keeps ingestion restartable without materializing
/// large association files in memory.
#[derive(Debug, Clone)]
pub struct GafSource {
    path: PathBuf,
}

impl GafSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file and returns a fresh lazy record iterator.
    ///
    /// # Errors
    /// Returns an `io::Error` if the file cannot be opened.
    pub fn records(&self) -> io::Result<GafRecords<BufReader<File>>> {
        let file = File::open(&self.path)?;
        Ok(GafRecords::from_reader(BufReader::new(file)))
    }
}

/// Lazy iterator over valid GAF records.
///
/// Comment lines are skipped silently; malformed data lines (too few
/// columns, empty symbol, or a non-GO identifier) are skipped and counted.
/// I/O errors are yielded to the caller.
pub struct GafRecords<R: BufRead> {
    lines: Lines<R>,
    skipped: usize,
}

impl<R: BufRead> GafRecords<R> {
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            skipped: 0,
        }
    }

    /// Number of malformed data lines skipped so far.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for GafRecords<R> {
    type Item = io::Result<GafRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }
            match parse_line(&line) {
                Some(record) => return Some(Ok(record)),
                None => self.skipped += 1,
            }
        }
    }
}

fn parse_line(line: &str) -> Option<GafRecord> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < REQUIRED_COLUMNS {
        return None;
    }
    let symbol = columns[COLUMN_SYMBOL].trim();
    let go_id = columns[COLUMN_GO_ID].trim();
    let aspect = columns[COLUMN_ASPECT].trim();
    if symbol.is_empty() || !go_id.starts_with("GO:") {
        return None;
    }
    Some(GafRecord {
        symbol: symbol.to_string(),
        go_id: go_id.to_string(),
        aspect: aspect.to_string(),
    })
}
