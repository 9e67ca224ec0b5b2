//! Validation utilities

use crate::types::*;

/// Validate that an account code is usable as a statement file prefix
pub fn validate_account_code(code: &str) -> ReconcileResult<()> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ReconcileError::Validation(
            "Account code cannot be empty".to_string(),
        ));
    }

    if code.len() > 20 {
        return Err(ReconcileError::Validation(
            "Account code cannot exceed 20 characters".to_string(),
        ));
    }

    // Prefixes are extracted with [A-Za-z0-9]+, anything else could never match
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ReconcileError::Validation(format!(
            "Account code '{}' can only contain ASCII letters and digits",
            code
        )));
    }

    Ok(())
}

/// Validate that an account name is valid
pub fn validate_account_name(name: &str) -> ReconcileResult<()> {
    if name.trim().is_empty() {
        return Err(ReconcileError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(ReconcileError::Validation(
            "Account name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a display color: empty, `#RGB` or `#RRGGBB`
pub fn validate_color(color: &str) -> ReconcileResult<()> {
    if color.is_empty() {
        return Ok(());
    }

    let valid = color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 3 || hex.len() == 6)
        .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));

    if valid {
        Ok(())
    } else {
        Err(ReconcileError::Validation(format!(
            "Color '{}' must be a hex value like #1e88e5",
            color
        )))
    }
}

/// Validate that a statement file name is a plain name, not a path
pub fn validate_file_name(file_name: &str) -> ReconcileResult<()> {
    if file_name.trim().is_empty() {
        return Err(ReconcileError::Validation(
            "File name cannot be empty".to_string(),
        ));
    }

    if file_name.contains(['/', '\\']) || file_name == "." || file_name == ".." {
        return Err(ReconcileError::Validation(format!(
            "'{}' is not a plain file name",
            file_name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_code() {
        assert!(validate_account_code("CCAL").is_ok());
        assert!(validate_account_code("bnp2").is_ok());
        assert!(validate_account_code("").is_err());
        assert!(validate_account_code("CC_AL").is_err());
        assert!(validate_account_code("CÔTE").is_err());
    }

    #[test]
    fn test_color() {
        assert!(validate_color("").is_ok());
        assert!(validate_color("#fff").is_ok());
        assert!(validate_color("#1E88E5").is_ok());
        assert!(validate_color("1E88E5").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#gggggg").is_err());
    }

    #[test]
    fn test_file_name() {
        assert!(validate_file_name("CCAL_01.01.2025_31.01.2025.csv").is_ok());
        assert!(validate_file_name("../secret.csv").is_err());
        assert!(validate_file_name("dir\\a.csv").is_err());
        assert!(validate_file_name(" ").is_err());
    }
}
