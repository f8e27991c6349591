// CPF - 11-digit individual taxpayer id

use super::all_repeated;

/// Validate a CPF, punctuated or bare. Everything that is not a digit is
/// stripped before the length and checksum tests.
pub fn validate_cpf(value: &str) -> bool {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || all_repeated(&digits) {
        return false;
    }

    check_digit(&digits, 10) == digits[9] && check_digit(&digits, 11) == digits[10]
}

/// Verifier for position `count - 1`: the first `count - 1` digits
/// weighted `count` down to 2, times 10, mod 11, mod 10.
fn check_digit(digits: &[u32], count: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .take(count as usize - 1)
        .enumerate()
        .map(|(index, digit)| digit * (count - index as u32))
        .sum();

    sum * 10 % 11 % 10
}
