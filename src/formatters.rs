// 🖋️ Formatters - Display punctuation for tax ids

/// Format a tax id with its canonical punctuation: 11 digits as a CPF
/// (ddd.ddd.ddd-dd), 14 as a CNPJ (dd.ddd.ddd/dddd-dd). Values that strip
/// to any other digit count pass through unchanged.
pub fn format_vat_number(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 => format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        ),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        ),
        _ => value.to_string(),
    }
}
