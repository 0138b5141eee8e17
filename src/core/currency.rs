/// Currencies with a known display symbol and minor-unit digit count.
const KNOWN_CURRENCIES: &[(&str, &str, usize)] = &[
    ("AED", "AED", 2),
    ("AUD", "A$", 2),
    ("BHD", "BHD", 3),
    ("CAD", "CA$", 2),
    ("CHF", "CHF", 2),
    ("CNY", "CN¥", 2),
    ("EGP", "EGP", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("INR", "₹", 2),
    ("JPY", "¥", 0),
    ("KWD", "KWD", 3),
    ("OMR", "OMR", 3),
    ("QAR", "QAR", 2),
    ("SAR", "SAR", 2),
    ("TRY", "TRY", 2),
    ("USD", "$", 2),
];

pub const DEFAULT_CURRENCY: &str = "SAR";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Style {
    Symbol { symbol: &'static str, decimals: usize },
    Code(String),
    Fallback(String),
}

/// Formats amounts for one currency code. Codes that are not three ASCII
/// letters fall back to `"<amount with 2 decimals> <code>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    style: Style,
}

impl CurrencyFormatter {
    pub fn new(code: &str) -> Self {
        let trimmed = code.trim();
        let well_formed = trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic());
        if !well_formed {
            return Self {
                style: Style::Fallback(code.to_string()),
            };
        }

        let upper = trimmed.to_ascii_uppercase();
        let style = KNOWN_CURRENCIES
            .iter()
            .find(|(iso, _, _)| *iso == upper)
            .map(|&(_, symbol, decimals)| Style::Symbol { symbol, decimals })
            .unwrap_or(Style::Code(upper));
        Self { style }
    }

    pub fn format(&self, amount: f64) -> String {
        match &self.style {
            Style::Fallback(code) => format!("{amount:.2} {code}"),
            Style::Code(code) => format!("{}{code} {}", sign(amount), grouped(amount.abs(), 2)),
            Style::Symbol { symbol, decimals } => {
                let digits = grouped(amount.abs(), *decimals);
                if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
                    format!("{}{symbol} {digits}", sign(amount))
                } else {
                    format!("{}{symbol}{digits}", sign(amount))
                }
            }
        }
    }
}

pub fn format_currency(amount: f64, code: &str) -> String {
    CurrencyFormatter::new(code).format(amount)
}

fn sign(amount: f64) -> &'static str {
    if amount < 0.0 { "-" } else { "" }
}

fn grouped(amount: f64, decimals: usize) -> String {
    let fixed = format!("{amount:.decimals$}");
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
