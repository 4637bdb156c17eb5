use crate::error::{AppError, AppResult};
use rand::Rng;

/// Longest accepted code after normalization (alphanumeric voucher family).
pub const MAX_VOUCHER_CODE_LEN: usize = 20;

/// Generate a 10-digit numeric voucher code.
pub fn generate_voucher_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:010}", rng.gen_range(0u64..10_000_000_000))
}

/// Canonical voucher code form: uppercase, non-alphanumerics stripped.
/// Accepts both the 10-digit numeric family and alphanumeric codes up to
/// 20 characters.
pub fn normalize_voucher_code(code: &str) -> AppResult<String> {
    let normalized: String = code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.is_empty() {
        return Err(AppError::ValidationError(
            "Voucher code must not be empty".to_string(),
        ));
    }
    if normalized.len() > MAX_VOUCHER_CODE_LEN {
        return Err(AppError::ValidationError(format!(
            "Voucher code must be at most {MAX_VOUCHER_CODE_LEN} characters"
        )));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_voucher_code() {
        let code = generate_voucher_code();
        assert_eq!(code.len(), 10);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_normalize_voucher_code() {
        assert_eq!(normalize_voucher_code("ab-12 cd").unwrap(), "AB12CD");
        assert_eq!(
            normalize_voucher_code("1234567890").unwrap(),
            "1234567890"
        );
        assert!(normalize_voucher_code("").is_err());
        assert!(normalize_voucher_code("---").is_err());
        assert!(normalize_voucher_code(&"A".repeat(21)).is_err());
    }
}
