//! Mask handling for CPF and CNS identifiers.
//!
//! Citizens arrive with identifiers in whatever display form the user typed
//! (`529.982.247-25`, `123 4567 8901 2345`). Every comparison goes through
//! the mask removers first so formatted and bare values match each other.

/// Removes every formatting character from a CPF, keeping letters and digits.
pub fn remove_cpf_mask(value: &str) -> String {
    value.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Removes every formatting character from a CNS, keeping letters and digits.
pub fn remove_cns_mask(value: &str) -> String {
    value.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Checks whether `field` contains `search` once both are stripped by `mask_remover`.
///
/// A search string that strips down to nothing never matches, so a plain
/// name like `"--"` cannot accidentally select every record.
pub fn matches_masked_field(search: &str, field: &str, mask_remover: fn(&str) -> String) -> bool {
    let needle = mask_remover(search);
    !needle.is_empty() && mask_remover(field).contains(&needle)
}

/// Validates a CPF: 11 digits, not a repeated digit, both check digits correct.
pub fn is_valid_cpf(value: &str) -> bool {
    let digits: Vec<u32> = remove_cpf_mask(value)
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    cpf_check_digit(&digits[..9]) == digits[9] && cpf_check_digit(&digits[..10]) == digits[10]
}

fn cpf_check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        rest => rest,
    }
}

/// Validates a CNS. An empty value passes since the field is optional;
/// otherwise at least 15 digits are required.
pub fn is_valid_cns(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.is_empty() || digits.len() >= 15
}
