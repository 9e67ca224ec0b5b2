//! Integration tests for statement-reconciler

use statement_reconciler::{
    correct, extract_prefix, parse_statement, serialize_statement, split, utils::MemoryStorage,
    validate, AccountDirectory, AccountRepository, Reconciler, ReconcileConfig,
};

fn bnp_directory() -> AccountDirectory {
    AccountDirectory::from_json(
        r##"{
            "CCAL": { "name": "BNP Courant", "color": "#1e88e5" },
            "HSBC": { "name": "HSBC", "color": "#db0011" }
        }"##,
    )
    .unwrap()
}

#[test]
fn test_extract_prefix_examples() {
    assert_eq!(extract_prefix("CCAL_01.01.2025_31.01.2025.csv"), "CCAL");
    assert_eq!(extract_prefix("noUnderscoreHere"), "UNKNOWN");
    assert_eq!(extract_prefix("ccal_x"), "CCAL");
}

#[test]
fn test_wrong_bank_scenario() {
    let directory = AccountDirectory::new()
        .with_account("CCAL", "BNP Courant", "")
        .unwrap();
    let table = parse_statement(
        "Source;Compte;Date\nCCAL_01.01.2025_31.01.2025.csv;Wrong Bank;02/01/2025\n",
    )
    .table;

    let result = validate(&table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
    assert_eq!(result.inconsistencies.len(), 1);
    assert_eq!(result.inconsistencies[0].compte_expected, "BNP Courant");

    let outcome = correct(table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
    assert_eq!(outcome.corrected, 1);
    assert_eq!(outcome.errors, 0);
    assert_eq!(outcome.corrected_table.rows[0].compte(), "BNP Courant");
}

#[test]
fn test_correct_then_validate_is_clean() {
    let directory = bnp_directory();
    let table = parse_statement(
        "Date;Libellé;Montant;Compte;Source\n\
         02/01/2025;CB CARREFOUR;-42,10;HSBC;CCAL_01.01.2025_31.01.2025.csv\n\
         03/01/2025;VIR SALAIRE;2100,00;;HSBC_01.01.2025_31.01.2025.csv\n\
         04/01/2025;PRLV EDF;-61,30;BNP Courant;CCAL_01.01.2025_31.01.2025.csv\n",
    )
    .table;

    let before = validate(&table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
    assert_eq!(before.inconsistent_lines, 2);
    assert_eq!(before.total_lines, 3);

    let once = correct(table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
    assert_eq!(once.corrected, 2);

    let twice = correct(
        once.corrected_table.clone(),
        "CCAL_01.01.2025_31.01.2025.csv",
        &directory,
    );
    assert_eq!(twice.corrected, 0);

    let after = validate(&once.corrected_table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
    assert!(after.is_valid);

    // untouched columns survive a write/read cycle
    let text = serialize_statement(&once.corrected_table).unwrap();
    let reread = parse_statement(&text).table;
    assert_eq!(reread.rows[1].get("Libellé"), "VIR SALAIRE");
    assert_eq!(reread.rows[0].get("Montant"), "-42,10");
}

#[test]
fn test_split_scenario() {
    let directory = AccountDirectory::new()
        .with_account("BNP", "BNP Courant", "")
        .unwrap()
        .with_account("HSBC", "HSBC", "")
        .unwrap();
    let table = parse_statement(
        "Source;Compte;Date\n\
         CCAL_x.csv;BNP Courant;10/01/2025\n\
         CCAL_x.csv;HSBC;09/01/2025\n\
         CCAL_x.csv;BNP Courant;01/01/2025\n\
         CCAL_x.csv;HSBC;02/01/2025\n\
         CCAL_x.csv;BNP Courant;05/01/2025\n",
    )
    .table;

    let outcome = split(&table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
    assert_eq!(outcome.errors, 0);

    let summary: Vec<(&str, usize)> = outcome
        .groups
        .iter()
        .map(|group| (group.file_name.as_str(), group.rows.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("BNP_01.01.2025_31.01.2025.csv", 3),
            ("HSBC_01.01.2025_31.01.2025.csv", 2),
        ]
    );
    assert_eq!(outcome.groups[0].rows[0].date(), "01/01/2025");
    assert_eq!(outcome.groups[1].rows[0].date(), "02/01/2025");
}

#[tokio::test]
async fn test_detect_all_in_listing_order() {
    let storage = MemoryStorage::new();
    storage.set_directory(bnp_directory());
    storage.insert_file(
        "statements/HSBC_02.2025.csv",
        "Source;Compte;Date\nHSBC_02.2025.csv;BNP Courant;01/02/2025\n",
    );
    storage.insert_file(
        "statements/CCAL_01.2025.csv",
        "Source;Compte;Date\nCCAL_01.2025.csv;BNP Courant;01/01/2025\nZZZ_01.2025.csv;BNP Courant;02/01/2025\n",
    );
    storage.insert_file(
        "statements/CCAL_02.2025.csv",
        "Source;Compte;Date\nCCAL_02.2025.csv;BNP Courant;01/02/2025\n",
    );
    storage.insert_file("statements/accounts.json", "{}");
    storage.fail_reads_for("statements/CCAL_02.2025.csv");

    let mut repository = AccountRepository::new(storage.clone());
    let directory = repository.snapshot().await.unwrap();

    let config = ReconcileConfig::new().with_statements_dir("statements");
    let reconciler = Reconciler::with_config(storage, config).unwrap();
    let batch = reconciler.detect_all(&directory).await.unwrap();

    let processed: Vec<&str> = batch.files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(processed, vec!["CCAL_01.2025.csv", "HSBC_02.2025.csv"]);
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].file_name, "CCAL_02.2025.csv");

    let expected: Vec<&str> = batch
        .inconsistencies()
        .map(|found| found.compte_expected.as_str())
        .collect();
    assert_eq!(expected, vec!["PRÉFIXE INVALIDE: ZZZ", "HSBC"]);
}

#[tokio::test]
async fn test_correct_all_and_split_on_store() {
    let storage = MemoryStorage::new();
    storage.insert_file(
        "CCAL_01.01.2025_31.01.2025.csv",
        "Source;Compte;Date\n\
         CCAL_01.01.2025_31.01.2025.csv;Ancien nom;03/01/2025\n\
         HSBC_01.01.2025_31.01.2025.csv;HSBC;01/01/2025\n\
         LIVA_01.01.2025_31.01.2025.csv;Livret A;02/01/2025\n",
    );
    storage.insert_file(
        "HSBC_01.01.2025_31.01.2025.csv",
        "Source;Compte;Date\nHSBC_01.01.2025_31.01.2025.csv;HSBC;01/01/2025\n",
    );

    let directory = bnp_directory();
    let mut reconciler = Reconciler::new(storage.clone());

    let corrections = reconciler.correct_all(&directory).await.unwrap();
    assert_eq!(corrections.total_corrected(), 1);
    assert_eq!(corrections.total_errors(), 1);
    assert!(corrections.reports[0].written);
    assert!(!corrections.reports[1].written);

    let report = reconciler
        .split_file("CCAL_01.01.2025_31.01.2025.csv", &directory)
        .await
        .unwrap();
    // "Livret A" has no account code, so the original is not overwritten
    assert_eq!(report.errors, 1);
    assert_eq!(report.written, vec!["HSBC_01.01.2025_31.01.2025.csv"]);
    assert_eq!(
        report.withheld.as_deref(),
        Some("CCAL_01.01.2025_31.01.2025.csv")
    );
    assert!(!report.replaced_original);
    assert!(storage
        .file("CCAL_01.01.2025_31.01.2025.csv")
        .unwrap()
        .contains("Livret A"));
    assert_eq!(
        storage.file("HSBC_01.01.2025_31.01.2025.csv").unwrap(),
        "Source;Compte;Date\nHSBC_01.01.2025_31.01.2025.csv;HSBC;01/01/2025\n"
    );
}
