use crate::config::Config;
use crate::export::{Format, Selection};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Table(#[from] crate::table::Error),
    #[error(transparent)]
    Columns(#[from] crate::columns::Error),
    #[error(transparent)]
    Export(#[from] crate::export::Error),
}

#[derive(Clone, Debug, Default)]
pub struct Options {
    pub config: Config,
    pub format: Format,
    pub selection: Selection,
}

pub(crate) mod function {
    use crate::check::{Error, Options};
    use crate::reconcile::Outcome;
    use crate::{export, read_table, reconcile, resolve_columns, write_report};

    /// Reconcile the ledger export in `csv_data` and write the report to `out`.
    ///
    /// Fails before any row is looked at if the columns can't be found, but never because of the content of a cell.
    pub fn check(
        csv_data: impl std::io::Read,
        out: impl std::io::Write,
        Options {
            config,
            format,
            selection,
        }: Options,
    ) -> Result<Outcome, Error> {
        let table = read_table(csv_data, config.table_options())?;
        let columns = resolve_columns(&config.columns, &table.headers, config.fold_accents)?;
        let outcome = reconcile(&table, &columns, config.reconcile_options());
        tracing::info!(
            correct = outcome.correct().count(),
            divergent = outcome.divergent().count(),
            "reconciled {} creditor lines from {} rows",
            outcome.records.len(),
            outcome.rows
        );

        write_report(
            &outcome,
            out,
            export::Options {
                delimiter: config.delimiter,
                format,
                selection,
            },
        )?;
        Ok(outcome)
    }
}
