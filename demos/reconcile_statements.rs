//! Reconcile a folder of bank statements on disk
//!
//! Run with: cargo run --example reconcile_statements

use statement_reconciler::{utils::FsStorage, AccountRepository, ReconcileConfig, Reconciler};
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = tempfile::tempdir()?;
    let statements = workspace.path().join("releves");
    fs::create_dir(&statements)?;

    fs::write(
        workspace.path().join("accounts.json"),
        r##"{
            "CCAL": { "name": "BNP Courant", "color": "#1e88e5" },
            "HSBC": { "name": "HSBC", "color": "#db0011" }
        }"##,
    )?;
    fs::write(
        statements.join("CCAL_01.01.2025_31.01.2025.csv"),
        "Date;Libellé;Montant;Compte;Source\n\
         12/01/2025;CB CARREFOUR;-42,10;Ancien compte;CCAL_01.01.2025_31.01.2025.csv\n\
         03/01/2025;VIR SALAIRE;2100,00;HSBC;HSBC_01.01.2025_31.01.2025.csv\n\
         05/01/2025;PRLV EDF;-61,30;BNP Courant;CCAL_01.01.2025_31.01.2025.csv\n",
    )?;

    let storage =
        FsStorage::new(workspace.path()).with_directory_file(workspace.path().join("accounts.json"));
    let mut repository = AccountRepository::new(storage.clone());
    let directory = repository.snapshot().await?;

    let config = ReconcileConfig::new().with_statements_dir("releves");
    let mut reconciler = Reconciler::with_config(storage, config)?;

    println!("=== Validation ===");
    let batch = reconciler.detect_all(&directory).await?;
    for found in batch.inconsistencies() {
        println!(
            "{} line {}: '{}' should be '{}'",
            found.file_name, found.line_index, found.compte_found, found.compte_expected
        );
    }

    println!("\n=== Correction ===");
    let corrections = reconciler.correct_all(&directory).await?;
    for report in &corrections.reports {
        println!(
            "{}: {} corrected, {} unknown accounts",
            report.file_name, report.corrected, report.errors
        );
    }

    println!("\n=== Split ===");
    let split = reconciler
        .split_file("CCAL_01.01.2025_31.01.2025.csv", &directory)
        .await?;
    for name in &split.written {
        println!("wrote {}", name);
        println!("{}", fs::read_to_string(statements.join(name))?);
    }
    if let Some(name) = &split.withheld {
        println!("kept original whole, {} not written ({} groups dropped)", name, split.errors);
    }

    Ok(())
}
