//! # Statement Reconciler
//!
//! Consistency checks and repairs for bank-statement CSV exports.
//!
//! Every statement row names the account it belongs to (`Compte`) and the
//! file it came from (`Source`, e.g. `CCAL_01.01.2025_31.01.2025.csv`). The
//! leading code of the source is looked up in an account directory to find
//! the name the row should carry.
//!
//! ## Features
//!
//! - **Validation**: flag rows whose declared account does not match their origin
//! - **Correction**: rewrite declared accounts to the directory name, idempotently
//! - **Splitting**: break a statement holding several accounts into one file per account
//! - **Storage abstraction**: trait-based file access and account directory loading
//!
//! ## Quick Start
//!
//! ```rust
//! use statement_reconciler::{correct, parse_statement, validate, AccountDirectory};
//!
//! let directory = AccountDirectory::new()
//!     .with_account("CCAL", "BNP Courant", "#1e88e5")
//!     .unwrap();
//!
//! let table = parse_statement(
//!     "Source;Compte;Date\nCCAL_01.01.2025_31.01.2025.csv;Wrong Bank;02/01/2025\n",
//! )
//! .table;
//!
//! let result = validate(&table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
//! assert_eq!(result.inconsistencies[0].compte_expected, "BNP Courant");
//!
//! let outcome = correct(table, "CCAL_01.01.2025_31.01.2025.csv", &directory);
//! assert_eq!(outcome.corrected, 1);
//! ```

pub mod config;
pub mod directory;
pub mod reconciliation;
pub mod table;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use directory::*;
pub use reconciliation::*;
pub use table::*;
pub use traits::*;
pub use types::*;
