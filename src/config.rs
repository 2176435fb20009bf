//! The configuration of a run, usually read from a RON file.
use crate::columns::Strategy;
use rust_decimal::Decimal;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to open configuration file for reading")]
    Open(#[from] std::io::Error),
    #[error("Could not decode the configuration")]
    Decode(#[from] ron::de::SpannedError),
    #[error("A tolerance of {0} is not allowed, it must be positive")]
    Tolerance(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// The delimiter of the input and the report.
    pub delimiter: char,
    /// Compare header names with accents removed, so `máscara` and `mascara` are the same.
    pub fold_accents: bool,
    /// The amount of mask segments after the group which make two accounts the same.
    ///
    /// Exports were seen to need 5 or 6 here, verify it against the chart of accounts in use.
    pub depth: usize,
    pub tolerance: Decimal,
    pub columns: Strategy,
}

impl Default for Config {
    fn default() -> Self {
        let table = crate::table::Options::default();
        let reconcile = crate::reconcile::Options::default();
        Config {
            delimiter: table.delimiter,
            fold_accents: table.fold_accents,
            depth: reconcile.depth,
            tolerance: reconcile.tolerance,
            columns: Strategy::default(),
        }
    }
}

impl Config {
    /// Read a configuration from the RON file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config: Config = ron::de::from_reader(std::fs::File::open(path)?)?;
        config.validated()
    }

    /// Parse a configuration from RON `text`.
    pub fn from_ron(text: &str) -> Result<Self, Error> {
        let config: Config = ron::from_str(text)?;
        config.validated()
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new().struct_names(true))
    }

    pub fn table_options(&self) -> crate::table::Options {
        crate::table::Options {
            delimiter: self.delimiter,
            fold_accents: self.fold_accents,
        }
    }

    pub fn reconcile_options(&self) -> crate::reconcile::Options {
        crate::reconcile::Options {
            depth: self.depth,
            tolerance: self.tolerance,
        }
    }

    fn validated(self) -> Result<Self, Error> {
        if self.tolerance <= Decimal::ZERO {
            return Err(Error::Tolerance(self.tolerance));
        }
        Ok(self)
    }
}
