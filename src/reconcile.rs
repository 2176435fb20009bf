//! Reconcile the debit leg of group 7 against the credit leg of group 8, per creditor and normalized mask.

use crate::mask::Group;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Identifies one reconciliation line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    /// The mask without its group, truncated to the configured depth.
    pub mask: String,
    /// The description of the creditor, exactly as it appears in the export.
    pub creditor: String,
}

/// A row that survived classification and the creditor filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The mask as printed on this row, if any.
    pub raw_mask: Option<String>,
    /// The mask in effect for this row after forward-filling.
    pub reconstructed_mask: String,
    pub group: Group,
    pub normalized_mask: String,
    pub creditor: String,
    pub balance: Decimal,
    /// The part of `balance` that counts towards the reconciliation, which may be zero.
    pub signed_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Correct,
    Divergent,
}

impl Status {
    /// A `difference` smaller than `tolerance` in magnitude is considered correct.
    pub fn classify(difference: Decimal, tolerance: Decimal) -> Self {
        if difference.abs() < tolerance {
            Status::Correct
        } else {
            Status::Divergent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Correct => "CORRECT",
            Status::Divergent => "DIVERGENT",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Key,
    /// The debit total in group 7, or zero if the key only exists in group 8.
    pub value_group7: Decimal,
    /// The credit total in group 8, or zero if the key only exists in group 7.
    pub value_group8: Decimal,
    /// `value_group7 - value_group8`
    pub difference: Decimal,
    pub status: Status,
}

impl Record {
    pub fn new(key: Key, value_group7: Decimal, value_group8: Decimal, tolerance: Decimal) -> Self {
        let difference = value_group7.checked_sub(value_group8).unwrap_or_else(|| {
            tracing::warn!(
                mask = %key.mask,
                creditor = %key.creditor,
                "difference of {value_group7} and {value_group8} is out of range, saturating"
            );
            value_group7.saturating_sub(value_group8)
        });
        Record {
            key,
            value_group7,
            value_group8,
            difference,
            status: Status::classify(difference, tolerance),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Options {
    /// The amount of mask segments to keep after the group, see [`crate::mask::normalize()`].
    pub depth: usize,
    /// Differences smaller than this are considered rounding noise.
    pub tolerance: Decimal,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            depth: 5,
            tolerance: Decimal::new(1, 2),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// All reconciliation lines, ordered by mask and creditor.
    pub records: Vec<Record>,
    /// The amount of data rows in the table.
    pub rows: usize,
    /// Rows dropped as their mask doesn't belong to group 7 or 8, or there was no mask yet.
    pub rows_without_group: usize,
    /// Rows dropped as their description doesn't identify a creditor.
    pub rows_without_creditor: usize,
    /// Rows that took part in the reconciliation.
    pub entries: usize,
}

impl Outcome {
    pub fn correct(&self) -> impl Iterator<Item = &Record> + '_ {
        self.with_status(Status::Correct)
    }

    pub fn divergent(&self) -> impl Iterator<Item = &Record> + '_ {
        self.with_status(Status::Divergent)
    }

    pub fn with_status(&self, status: Status) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(move |r| r.status == status)
    }
}

/// Return the contribution of a row of `group` with `balance` and the debit/credit `indicator`.
///
/// Group 7 counts debits and group 8 counts credits, judged by the first letter of `indicator`
/// in any case. Every other combination contributes zero.
pub fn signed_value(group: Group, indicator: Option<&str>, balance: Decimal) -> Decimal {
    let leg = indicator
        .and_then(|indicator| indicator.trim().chars().next())
        .map(|c| c.to_ascii_uppercase());
    match (group, leg) {
        (Group::Seven, Some('D')) | (Group::Eight, Some('C')) => balance,
        _ => Decimal::ZERO,
    }
}

/// Return true if `description` carries a CPF or CNPJ, either as run of 11 to 14 digits or in its punctuated form.
pub fn is_creditor(description: &str) -> bool {
    static TAXPAYER_ID: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    TAXPAYER_ID
        .get_or_init(|| {
            regex::Regex::new(
                r"\d{11,14}|\d{3}\.\d{3}\.\d{3}-\d{2}|\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}",
            )
            .expect("valid pattern")
        })
        .is_match(description)
}

/// Sum the `signed_value` of all `entries` per key and group.
///
/// A value that would overflow its total is left out of it.
pub fn aggregate<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> BTreeMap<(Key, Group), Decimal> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        let key = Key {
            mask: entry.normalized_mask.clone(),
            creditor: entry.creditor.clone(),
        };
        let total = totals.entry((key, entry.group)).or_insert(Decimal::ZERO);
        match total.checked_add(entry.signed_value) {
            Some(sum) => *total = sum,
            None => tracing::warn!(
                mask = %entry.reconstructed_mask,
                creditor = %entry.creditor,
                "ignoring value {} as the total of group {} would overflow",
                entry.signed_value,
                entry.group
            ),
        }
    }
    totals
}

/// Join the group 7 and group 8 `totals` on their key, keeping keys that only exist on one side.
pub fn join(totals: BTreeMap<(Key, Group), Decimal>, tolerance: Decimal) -> Vec<Record> {
    let mut group7 = BTreeMap::new();
    let mut group8 = BTreeMap::new();
    for ((key, group), total) in totals {
        match group {
            Group::Seven => group7.insert(key, total),
            Group::Eight => group8.insert(key, total),
        };
    }

    let mut keys: Vec<_> = group7.keys().chain(group8.keys()).cloned().collect();
    keys.sort();
    keys.dedup();
    keys.into_iter()
        .map(|key| {
            let value_group7 = group7.get(&key).copied().unwrap_or_default();
            let value_group8 = group8.get(&key).copied().unwrap_or_default();
            Record::new(key, value_group7, value_group8, tolerance)
        })
        .collect()
}

pub(crate) mod function {
    use crate::columns::Columns;
    use crate::mask::{self, Group};
    use crate::parse_amount;
    use crate::reconcile::{aggregate, is_creditor, join, signed_value, Entry, Options, Outcome};
    use crate::table::Table;

    /// Reconcile the rows of `table`, reading the cells at the given `columns`.
    ///
    /// Rows are processed in table order as masks are inherited from the rows above.
    pub fn reconcile(
        table: &Table,
        columns: &Columns<usize>,
        Options { depth, tolerance }: Options,
    ) -> Outcome {
        let mut outcome = Outcome {
            rows: table.rows.len(),
            ..Default::default()
        };
        let masks = mask::reconstruct(table.rows.iter().map(|row| row.get(columns.mask)));

        let mut entries = Vec::new();
        for (row, reconstructed_mask) in table.rows.iter().zip(masks) {
            let Some((reconstructed_mask, group)) =
                reconstructed_mask.and_then(|m| Group::of(&m).map(|g| (m, g)))
            else {
                outcome.rows_without_group += 1;
                continue;
            };
            let creditor = row.get(columns.description).unwrap_or_default();
            if !is_creditor(creditor) {
                outcome.rows_without_creditor += 1;
                continue;
            }

            let balance = parse_amount(row.get(columns.balance).unwrap_or_default());
            entries.push(Entry {
                raw_mask: row
                    .get(columns.mask)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(ToOwned::to_owned),
                normalized_mask: mask::normalize(&reconstructed_mask, depth),
                reconstructed_mask,
                group,
                creditor: creditor.to_owned(),
                balance,
                signed_value: signed_value(group, row.get(columns.balance_type), balance),
            });
        }
        outcome.entries = entries.len();
        tracing::debug!(
            rows = outcome.rows,
            without_group = outcome.rows_without_group,
            without_creditor = outcome.rows_without_creditor,
            entries = outcome.entries,
            "classified rows"
        );

        outcome.records = join(aggregate(&entries), tolerance);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_exclusive() {
        let tolerance = Decimal::new(1, 2);
        assert_eq!(Status::classify(Decimal::new(-4, 3), tolerance), Status::Correct);
        assert_eq!(Status::classify(Decimal::new(1, 2), tolerance), Status::Divergent);
        assert_eq!(Status::classify(Decimal::new(-1, 2), tolerance), Status::Divergent);
    }

    #[test]
    fn missing_or_blank_indicators_contribute_nothing() {
        let balance = Decimal::ONE_HUNDRED;
        assert_eq!(signed_value(Group::Seven, None, balance), Decimal::ZERO);
        assert_eq!(signed_value(Group::Eight, Some("  "), balance), Decimal::ZERO);
        assert_eq!(signed_value(Group::Eight, Some(" c "), balance), balance);
        assert_eq!(signed_value(Group::Seven, Some("débito"), balance), balance);
    }
}
