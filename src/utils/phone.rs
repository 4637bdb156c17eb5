use crate::error::{AppError, AppResult};
use regex::Regex;

/// Validate a Namibian mobile number: optional `+264` or leading `0`,
/// then the subscriber digits.
pub fn validate_na_phone(phone: &str) -> AppResult<()> {
    let phone_regex = Regex::new(r"^(\+264|0)\d{7,9}$").unwrap();

    if !phone_regex.is_match(phone) {
        return Err(AppError::ValidationError(
            "Invalid phone number, expected a Namibian number (+264xxxxxxxxx or 0xxxxxxxxx)"
                .to_string(),
        ));
    }

    Ok(())
}

/// Canonical `+264...` form used for storage and recipient lookup.
/// Separators (spaces, dashes, parentheses) are tolerated on input.
pub fn normalize_na_phone(phone: &str) -> AppResult<String> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();

    let normalized = if cleaned.starts_with("+264") {
        format!("+{digits}")
    } else if digits.starts_with("264") && digits.len() > 9 {
        format!("+{digits}")
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+264{rest}")
    } else {
        format!("+264{digits}")
    };

    let phone_regex = Regex::new(r"^\+264\d{7,9}$").unwrap();
    if !phone_regex.is_match(&normalized) {
        return Err(AppError::ValidationError(
            "Invalid phone number, expected a Namibian number (+264xxxxxxxxx or 0xxxxxxxxx)"
                .to_string(),
        ));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_na_phone() {
        assert!(validate_na_phone("+264812345678").is_ok());
        assert!(validate_na_phone("0812345678").is_ok());
        assert!(validate_na_phone("812345678").is_err());
        assert!(validate_na_phone("+27812345678").is_err());
        assert!(validate_na_phone("not-a-phone").is_err());
    }

    #[test]
    fn test_normalize_na_phone() {
        assert_eq!(normalize_na_phone("0812345678").unwrap(), "+264812345678");
        assert_eq!(normalize_na_phone("+264812345678").unwrap(), "+264812345678");
        assert_eq!(normalize_na_phone("264812345678").unwrap(), "+264812345678");
        assert_eq!(normalize_na_phone("081 234 5678").unwrap(), "+264812345678");
        assert_eq!(normalize_na_phone("081-234-5678").unwrap(), "+264812345678");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_na_phone("abc").is_err());
        assert!(normalize_na_phone("").is_err());
        assert!(normalize_na_phone("+264").is_err());
    }
}
