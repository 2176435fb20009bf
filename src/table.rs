#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot use '{0}' as delimiter")]
    InvalidDelimiter(char),
    #[error("Could not read the CSV data")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("The CSV data did not start with a header line")]
    NoHeader,
}

/// A rectangular table of string cells, as read from a ledger export.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Normalized column names, unique within the table.
    pub headers: Vec<String>,
    /// All rows in file order. Rows may be shorter than `headers`.
    pub rows: Vec<csv::StringRecord>,
}

#[derive(Clone, Debug)]
pub struct Options {
    pub delimiter: char,
    /// If true, accented letters in header names are folded to their ASCII counterpart.
    pub fold_accents: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            delimiter: ';',
            fold_accents: true,
        }
    }
}

/// Turn a raw header `name` into the form it is looked up by: trimmed, lower-cased and, if
/// `fold_accents` is set, with accents removed.
pub fn normalize_header(name: &str, fold_accents: bool) -> String {
    let name = name.trim_start_matches('\u{feff}').trim().to_lowercase();
    if fold_accents {
        name.chars().map(fold_accent).collect()
    } else {
        name
    }
}

/// Make repeated header names unique by appending `.1`, `.2` and so forth to each repetition,
/// leaving the first occurrence untouched.
pub fn disambiguate(headers: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashMap::<String, usize>::new();
    headers
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_default();
            let unique = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

pub(crate) mod function {
    use crate::table::{disambiguate, normalize_header, Error, Options, Table};

    /// Read all of `csv_data` into a [`Table`], decoding it as UTF-8 or, failing that, as Windows-1252.
    pub fn read_table(
        mut csv_data: impl std::io::Read,
        Options {
            delimiter,
            fold_accents,
        }: Options,
    ) -> Result<Table, Error> {
        let delimiter: u8 = delimiter
            .try_into()
            .map_err(|_| Error::InvalidDelimiter(delimiter))?;
        let mut bytes = Vec::new();
        csv_data.read_to_end(&mut bytes)?;
        let text = decode(bytes);

        let mut csv = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = csv.headers()?;
        if headers.is_empty() {
            return Err(Error::NoHeader);
        }
        let headers = disambiguate(
            headers
                .iter()
                .map(|name| normalize_header(name, fold_accents))
                .collect(),
        );
        let rows = csv.into_records().collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(columns = headers.len(), rows = rows.len(), "read table");

        Ok(Table { headers, rows })
    }

    fn decode(bytes: Vec<u8>) -> String {
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!("input is not valid UTF-8, decoding it as Windows-1252");
                let bytes = err.into_bytes();
                let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
                text.into_owned()
            }
        }
    }
}
