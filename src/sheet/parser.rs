//! CSV parsing using the csv crate
//!
//! RFC 4180 compliant parsing with support for quoted fields,
//! escaped quotes, and custom delimiters.

use serde::{Deserialize, Serialize};

/// Field delimiter of a CSV file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Candidates tried by [`detect_delimiter`], in tie-break order
    pub const ALL: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Tab,
        Delimiter::Pipe,
        Delimiter::Semicolon,
    ];

    pub fn byte(self) -> u8 {
        self.char() as u8
    }

    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// Detect delimiter from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "tsv" => Delimiter::Tab,
            "psv" => Delimiter::Pipe,
            _ => Delimiter::Comma,
        }
    }
}

/// Error type for CSV parsing
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "CSV parse error at line {}: {}", line, self.message),
            None => write!(f, "CSV parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse CSV content into raw records
///
/// A leading byte order mark is dropped. Error lines are the physical line
/// reported by the reader, so quoted multi-line fields are counted correctly.
pub fn parse_records(content: &str, delimiter: Delimiter) -> Result<Vec<Vec<String>>, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
        .into_records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(|e| ParseError {
                    line: e.position().map(|pos| pos.line() as usize),
                    message: e.to_string(),
                })
        })
        .collect()
}

/// Serialize records, quoting fields only where needed
pub fn write_records<'a, I>(records: I, delimiter: Delimiter) -> anyhow::Result<String>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .flexible(true)
        .from_writer(Vec::new());

    for record in records {
        writer.write_record(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Guess the delimiter from the first non-blank lines
///
/// A candidate that splits every sampled line into the same number of fields
/// beats one that does not; after that the most frequent wins. Comma when no
/// candidate occurs at all.
pub fn detect_delimiter(content: &str) -> Delimiter {
    let sample: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(5)
        .collect();

    let mut best = (Delimiter::Comma, false, 0usize);
    for delimiter in Delimiter::ALL {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| line.matches(delimiter.char()).count())
            .collect();
        let total: usize = counts.iter().sum();
        if total == 0 {
            continue;
        }
        let consistent = counts.windows(2).all(|pair| pair[0] == pair[1]);
        if (consistent, total) > (best.1, best.2) {
            best = (delimiter, consistent, total);
        }
    }
    best.0
}
