//! Brazilian taxpayer document check digits (CPF for people, CNPJ for companies).

pub const CPF_LENGTH: usize = 11;
pub const CNPJ_LENGTH: usize = 14;

fn digits(value: &str, len: usize) -> Option<Vec<u32>> {
    let digits: Vec<u32> = value.chars().map(|c| c.to_digit(10)).collect::<Option<_>>()?;
    if digits.len() != len {
        return None;
    }
    // Repeated digits pass the checksum but are never issued.
    if digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    Some(digits)
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

pub fn is_valid_cpf(value: &str) -> bool {
    let Some(d) = digits(value, CPF_LENGTH) else {
        return false;
    };

    let first = check_digit(&d[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&d[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[9] == first && d[10] == second
}

pub fn is_valid_cnpj(value: &str) -> bool {
    let Some(d) = digits(value, CNPJ_LENGTH) else {
        return false;
    };

    let first = check_digit(&d[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&d[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[12] == first && d[13] == second
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cpf_is_valid() {
        assert!(is_valid_cpf("52998224725"));
    }

    #[test]
    fn cpf_with_wrong_check_digit_is_invalid() {
        assert!(!is_valid_cpf("52998224724"));
    }

    #[test]
    fn formatted_or_repeated_cpf_is_invalid() {
        assert!(!is_valid_cpf("529.982.247-25"));
        assert!(!is_valid_cpf("11111111111"));
    }

    #[test]
    fn known_cnpj_is_valid() {
        assert!(is_valid_cnpj("11222333000181"));
    }

    #[test]
    fn cnpj_with_wrong_check_digit_is_invalid() {
        assert!(!is_valid_cnpj("11222333000182"));
        assert!(!is_valid_cnpj("00000000000000"));
    }
}
