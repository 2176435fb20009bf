//! Find the columns the reconciliation needs in the header line of a ledger export.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not find the {} column(s) in the header line", .names.join(", "))]
    Unresolved { names: Vec<&'static str> },
}

/// The four logical columns the reconciliation reads, identified by `T`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Columns<T> {
    /// The sparse hierarchical account code.
    pub mask: T,
    /// The description, which names the creditor on detail rows.
    pub description: T,
    /// The current balance.
    pub balance: T,
    /// The debit/credit indicator of the current balance.
    pub balance_type: T,
}

impl<T> Columns<T> {
    pub fn as_ref(&self) -> Columns<&T> {
        Columns {
            mask: &self.mask,
            description: &self.description,
            balance: &self.balance,
            balance_type: &self.balance_type,
        }
    }

    /// Call `f` with the name and value of each column, in declaration order.
    pub fn map<U>(self, mut f: impl FnMut(&'static str, T) -> U) -> Columns<U> {
        Columns {
            mask: f("mask", self.mask),
            description: f("description", self.description),
            balance: f("balance", self.balance),
            balance_type: f("balance type", self.balance_type),
        }
    }
}

impl Columns<Option<usize>> {
    fn into_resolved(self) -> Result<Columns<usize>, Error> {
        let mut names = Vec::new();
        let resolved = self.map(|name, index| {
            if index.is_none() {
                names.push(name);
            }
            index.unwrap_or_default()
        });
        if names.is_empty() {
            Ok(resolved)
        } else {
            Err(Error::Unresolved { names })
        }
    }
}

/// The way logical columns are identified in the header line.
///
/// Names and keywords are normalized like the headers themselves before comparing them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Strategy {
    /// Candidate header names per column, the first one present wins.
    FixedName(Columns<Vec<String>>),
    /// Keywords per column, the first header containing any of them wins.
    KeywordSearch(Columns<Vec<String>>),
    /// A header name or a zero-based column index per column.
    ExplicitMapping(Columns<String>),
}

impl Default for Strategy {
    /// The layout of the usual PCASP balance export, where `tipo saldo` appears twice and
    /// the second one belongs to the current balance.
    fn default() -> Self {
        fn names(names: &[&str]) -> Vec<String> {
            names.iter().map(|n| n.to_string()).collect()
        }
        Strategy::FixedName(Columns {
            mask: names(&["máscara"]),
            description: names(&["descrição"]),
            balance: names(&["saldo atual"]),
            balance_type: names(&["tipo saldo.1", "tipo saldo"]),
        })
    }
}

impl Strategy {
    /// Keywords that find the usual columns even if the export names them slightly differently.
    pub fn keywords() -> Self {
        fn words(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Strategy::KeywordSearch(Columns {
            mask: words(&["mascara", "conta"]),
            description: words(&["descri", "credor"]),
            balance: words(&["saldo atual", "saldo"]),
            balance_type: words(&["tipo saldo.1", "tipo saldo", "d/c", "natureza"]),
        })
    }
}

pub(crate) mod function {
    use crate::columns::{Columns, Error, Strategy};
    use crate::table::normalize_header;

    /// Return the column indices of all logical columns in `headers`, which are expected to be normalized.
    ///
    /// All columns that could not be found are reported at once.
    pub fn resolve_columns(
        strategy: &Strategy,
        headers: &[String],
        fold_accents: bool,
    ) -> Result<Columns<usize>, Error> {
        let found = match strategy {
            Strategy::FixedName(candidates) => candidates.as_ref().map(|_, candidates| {
                candidates.iter().find_map(|name| {
                    let name = normalize_header(name, fold_accents);
                    headers.iter().position(|header| *header == name)
                })
            }),
            Strategy::KeywordSearch(keywords) => keywords.as_ref().map(|_, keywords| {
                let keywords: Vec<_> = keywords
                    .iter()
                    .map(|keyword| normalize_header(keyword, fold_accents))
                    .filter(|keyword| !keyword.is_empty())
                    .collect();
                keywords.iter().find_map(|keyword| {
                    headers
                        .iter()
                        .position(|header| header.contains(keyword.as_str()))
                })
            }),
            Strategy::ExplicitMapping(columns) => columns
                .as_ref()
                .map(|_, name_or_index| header_idx(name_or_index, headers, fold_accents)),
        };
        let resolved = found.into_resolved()?;
        tracing::debug!(?resolved, "resolved columns");
        Ok(resolved)
    }

    /// Return the position of `name_or_index` in `headers` or `None` if it wasn't found.
    /// If `name_or_index` is a number, it will be used as number and not as name.
    fn header_idx(name_or_index: &str, headers: &[String], fold_accents: bool) -> Option<usize> {
        if let Ok(index) = name_or_index.trim().parse::<usize>() {
            headers.get(index).map(|_| index)
        } else {
            let name = normalize_header(name_or_index, fold_accents);
            headers.iter().position(|header| *header == name)
        }
    }
}
