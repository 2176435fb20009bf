use crate::reconcile::Status;
use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot use '{0}' as delimiter")]
    InvalidDelimiter(char),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Could not write the report")]
    Write(#[from] std::io::Error),
}

/// How monetary values are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain decimals with all their digits, like `-1234.5`.
    #[default]
    Raw,
    /// Brazilian currency, like `R$ -1.234,50`.
    Brl,
}

impl Format {
    pub fn render(&self, value: Decimal) -> String {
        match self {
            Format::Raw => value.to_string(),
            Format::Brl => crate::format_brl(value),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "raw" => Format::Raw,
            "brl" => Format::Brl,
            _ => return Err(format!("Unknown format '{s}', expected 'raw' or 'brl'")),
        })
    }
}

/// Which records to write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Divergent records first, then the correct ones.
    #[default]
    All,
    Correct,
    Divergent,
}

impl Selection {
    fn statuses(&self) -> &'static [Status] {
        match self {
            Selection::All => &[Status::Divergent, Status::Correct],
            Selection::Correct => &[Status::Correct],
            Selection::Divergent => &[Status::Divergent],
        }
    }
}

impl std::str::FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => Selection::All,
            "correct" => Selection::Correct,
            "divergent" => Selection::Divergent,
            _ => {
                return Err(format!(
                    "Unknown selection '{s}', expected 'all', 'correct' or 'divergent'"
                ))
            }
        })
    }
}

#[derive(Clone, Debug)]
pub struct Options {
    pub delimiter: char,
    pub format: Format,
    pub selection: Selection,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            delimiter: ';',
            format: Format::default(),
            selection: Selection::default(),
        }
    }
}

/// The header line of every report.
pub const HEADERS: [&str; 6] = [
    "mask",
    "creditor",
    "value_group7",
    "value_group8",
    "difference",
    "status",
];

pub(crate) mod function {
    use crate::export::{Error, Options, HEADERS};
    use crate::reconcile::Outcome;

    /// Write the records of `outcome` picked by `selection` as CSV to `out`, returning the amount of records written.
    pub fn write_report(
        outcome: &Outcome,
        out: impl std::io::Write,
        Options {
            delimiter,
            format,
            selection,
        }: Options,
    ) -> Result<usize, Error> {
        let delimiter: u8 = delimiter
            .try_into()
            .map_err(|_| Error::InvalidDelimiter(delimiter))?;
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(out);
        out.write_record(HEADERS)?;

        let mut num_records = 0;
        for status in selection.statuses() {
            for record in outcome.with_status(*status) {
                let value_group7 = format.render(record.value_group7);
                let value_group8 = format.render(record.value_group8);
                let difference = format.render(record.difference);
                out.write_record([
                    record.key.mask.as_str(),
                    record.key.creditor.as_str(),
                    value_group7.as_str(),
                    value_group8.as_str(),
                    difference.as_str(),
                    record.status.as_str(),
                ])?;
                num_records += 1;
            }
        }
        out.flush()?;
        Ok(num_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selections_parse_from_their_lowercase_names() {
        assert_eq!("divergent".parse::<Selection>(), Ok(Selection::Divergent));
        assert_eq!("brl".parse::<Format>(), Ok(Format::Brl));
        assert!("BRL".parse::<Format>().is_err());
    }
}
