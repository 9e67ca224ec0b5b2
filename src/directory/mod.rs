//! Account directory: the account-code to display-name mapping and its cache

pub mod account;
pub mod repository;

pub use account::*;
pub use repository::*;
