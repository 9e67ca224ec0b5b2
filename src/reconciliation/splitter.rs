//! Splitting a multi-account statement into one statement per account

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::directory::AccountDirectory;
use crate::types::*;

/// Parse a statement date written `dd/mm/yyyy`
pub fn parse_statement_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y").ok()
}

/// File name for an account's share of `original_file_name`
///
/// The leading `<code>_` segment is replaced by `prefix`; a name with no `_`
/// is kept whole behind the new prefix.
pub fn split_file_name(original_file_name: &str, prefix: &str) -> String {
    let rest = original_file_name
        .split_once('_')
        .map(|(_, rest)| rest)
        .unwrap_or(original_file_name);
    format!("{}_{}", prefix, rest)
}

/// Order rows by ascending date, stable for equal dates
///
/// Rows with an unparsable date keep their position; only rows with a
/// readable date move, among the positions such rows occupy.
pub fn sort_rows_by_date(rows: &mut [Row]) {
    let dated: Vec<(usize, NaiveDate)> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| parse_statement_date(row.date()).map(|date| (idx, date)))
        .collect();

    let mut ordered = dated.clone();
    ordered.sort_by_key(|(_, date)| *date);

    let moved: Vec<Row> = ordered.iter().map(|(idx, _)| rows[*idx].clone()).collect();
    for ((slot, _), row) in dated.iter().zip(moved) {
        rows[*slot] = row;
    }
}

/// Partition rows by their declared `Compte` into per-account statements
///
/// Rows are grouped by the literal `Compte` value, in order of first
/// appearance. A table holding a single account yields no groups. Each group
/// is named after the directory code whose name matches the group (first
/// match in directory order); a group with no such code is dropped and
/// counted in `errors`. Nothing here touches the original file.
pub fn split(
    table: &CsvTable,
    original_file_name: &str,
    directory: &AccountDirectory,
) -> SplitOutcome {
    let mut order: Vec<&str> = Vec::new();
    let mut by_compte: HashMap<&str, Vec<Row>> = HashMap::new();
    for row in &table.rows {
        let compte = row.compte();
        by_compte
            .entry(compte)
            .or_insert_with(|| {
                order.push(compte);
                Vec::new()
            })
            .push(row.clone());
    }

    if order.len() <= 1 {
        return SplitOutcome::default();
    }

    let mut outcome = SplitOutcome::default();
    for compte in order {
        let Some(prefix) = directory.find_code_by_name(compte) else {
            tracing::warn!(
                file = original_file_name,
                compte,
                "no account code carries this name, group not split out"
            );
            outcome.errors += 1;
            continue;
        };

        let mut rows = by_compte.remove(compte).unwrap_or_default();
        sort_rows_by_date(&mut rows);

        outcome.groups.push(SplitGroup {
            file_name: split_file_name(original_file_name, prefix),
            rows,
        });
    }

    outcome
}
