//! Rewriting declared accounts to the name their origin resolves to

use crate::directory::AccountDirectory;
use crate::reconciliation::prefix::extract_prefix;
use crate::reconciliation::validator::row_origin;
use crate::types::*;

/// Set `Compte` on every row to the directory name of its resolved prefix
///
/// Rows whose prefix is unknown are left untouched and counted in `errors`.
/// Row order and every other column are preserved. The table is returned
/// even when nothing changed; persisting it only makes sense when
/// `corrected > 0`.
pub fn correct(
    mut table: CsvTable,
    file_name_fallback: &str,
    directory: &AccountDirectory,
) -> CorrectionOutcome {
    let mut corrected = 0;
    let mut errors = 0;

    for row in table.rows.iter_mut() {
        let prefix = extract_prefix(row_origin(row, file_name_fallback));
        match directory.get(&prefix) {
            Some(account) if account.name != row.compte() => {
                row.set_compte(account.name.clone());
                corrected += 1;
            }
            Some(_) => {}
            None => errors += 1,
        }
    }

    CorrectionOutcome {
        corrected_table: table,
        corrected,
        errors,
    }
}
