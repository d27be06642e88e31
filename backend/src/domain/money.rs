//! Amount parsing and formatting shared by the event and budget inputs.

/// Clean and parse an amount typed by the user.
///
/// The currency symbol, thousands separators and spaces are stripped before
/// parsing. Non-finite values are rejected.
pub fn clean_and_parse_amount(amount_input: &str, currency_symbol: &str) -> Result<f64, String> {
    let mut cleaned = amount_input.trim().to_string();
    if !currency_symbol.is_empty() {
        cleaned = cleaned.replace(currency_symbol, "");
    }
    let cleaned = cleaned.replace([',', ' '], "");

    if cleaned.is_empty() {
        return Err("Empty amount after cleaning".to_string());
    }

    let amount = cleaned
        .parse::<f64>()
        .map_err(|e| format!("Invalid number format: {}", e))?;
    if !amount.is_finite() {
        return Err(format!("'{}' is not a finite number", amount_input.trim()));
    }
    // Folds -0 into 0
    Ok(amount + 0.0)
}

/// Format an amount for display, e.g. `$12.50`
pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    format!("{}{:.2}", currency_symbol, amount)
}
