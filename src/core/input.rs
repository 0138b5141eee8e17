use serde::{Deserialize, Serialize};

use super::currency::DEFAULT_CURRENCY;
use super::types::{GrowthModel, SimulationParameters};

/// Longest horizon a projection runs for.
pub const MAX_YEARS: u32 = 100;

/// Raw form values exactly as the user typed them. This is also the
/// persisted snapshot shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormState {
    pub stock_type: String,
    pub initial: String,
    pub monthly: String,
    pub years: String,
    pub rate: String,
    pub share_price: String,
    pub rate_growth: String,
    pub div_yield: String,
    pub reinvest: bool,
    pub currency: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            stock_type: "growth".to_string(),
            initial: "10000".to_string(),
            monthly: "500".to_string(),
            years: "10".to_string(),
            rate: "8".to_string(),
            share_price: "50".to_string(),
            rate_growth: "4".to_string(),
            div_yield: "4".to_string(),
            reinvest: true,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// A numeric field that may arrive as a JSON number or as form text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Number(v) => v.to_string(),
            FieldValue::Text(s) => s,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            FieldValue::Number(v) if v.is_finite() => *v,
            FieldValue::Number(_) => 0.0,
            FieldValue::Text(s) => parse_number(s).unwrap_or(0.0),
        }
    }
}

/// A previously saved snapshot. Every field is optional so partial or older
/// blobs still load, and numeric fields may be stored as numbers or text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredState {
    pub stock_type: Option<String>,
    pub initial: Option<FieldValue>,
    pub monthly: Option<FieldValue>,
    pub years: Option<FieldValue>,
    pub rate: Option<FieldValue>,
    pub share_price: Option<FieldValue>,
    pub rate_growth: Option<FieldValue>,
    pub div_yield: Option<FieldValue>,
    pub reinvest: Option<bool>,
    pub currency: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputProblem {
    NotANumber,
    NonFinite,
    Negative,
    BelowMinimum,
    AboveMaximum,
    Fractional,
    UnknownModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputIssue {
    pub field: &'static str,
    pub problem: InputProblem,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInput {
    pub params: SimulationParameters,
    pub currency: String,
    pub issues: Vec<InputIssue>,
}

impl FormState {
    pub fn apply_stored(&mut self, stored: StoredState) {
        let text_fields = [
            (&mut self.stock_type, stored.stock_type),
            (&mut self.initial, stored.initial.map(FieldValue::into_text)),
            (&mut self.monthly, stored.monthly.map(FieldValue::into_text)),
            (&mut self.years, stored.years.map(FieldValue::into_text)),
            (&mut self.rate, stored.rate.map(FieldValue::into_text)),
            (&mut self.share_price, stored.share_price.map(FieldValue::into_text)),
            (&mut self.rate_growth, stored.rate_growth.map(FieldValue::into_text)),
            (&mut self.div_yield, stored.div_yield.map(FieldValue::into_text)),
            (&mut self.currency, stored.currency),
        ];
        for (slot, value) in text_fields {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
        if let Some(reinvest) = stored.reinvest {
            self.reinvest = reinvest;
        }
    }

    /// Coerces every field into simulation parameters. Never fails; whatever
    /// had to be changed is listed in `issues`.
    pub fn normalize(&self) -> NormalizedInput {
        let mut issues = Vec::new();

        let initial_amount = money(&mut issues, "initial", &self.initial);
        let monthly_contribution = money(&mut issues, "monthly", &self.monthly);
        let years = whole_years(&mut issues, &self.years);

        let model = match self.stock_type.trim().to_ascii_lowercase().as_str() {
            "dividend" => GrowthModel::Dividend {
                annual_price_growth_percent: number(&mut issues, "rateGrowth", &self.rate_growth),
                annual_dividend_yield_percent: number(&mut issues, "divYield", &self.div_yield),
                reinvest_dividends: self.reinvest,
            },
            other => {
                if other != "growth" {
                    issues.push(InputIssue {
                        field: "stockType",
                        problem: InputProblem::UnknownModel,
                        raw: self.stock_type.clone(),
                    });
                }
                GrowthModel::Growth {
                    annual_rate_percent: number(&mut issues, "rate", &self.rate),
                }
            }
        };

        let currency = match self.currency.trim() {
            "" => DEFAULT_CURRENCY.to_string(),
            code => code.to_string(),
        };

        NormalizedInput {
            params: SimulationParameters {
                initial_amount,
                monthly_contribution,
                years,
                model,
            },
            currency,
            issues,
        }
    }
}

/// Dividend yield in percent for one share, or `None` while the share price
/// is not positive.
pub fn dividend_yield_percent(dividend_per_share: f64, share_price: f64) -> Option<f64> {
    if share_price > 0.0 && dividend_per_share.is_finite() {
        Some(dividend_per_share / share_price * 100.0)
    } else {
        None
    }
}

/// Parses loose numeric text the way a form field does: blank is zero.
pub fn parse_number(raw: &str) -> Result<f64, InputProblem> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| InputProblem::NotANumber)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputProblem::NonFinite)
    }
}

fn number(issues: &mut Vec<InputIssue>, field: &'static str, raw: &str) -> f64 {
    parse_number(raw).unwrap_or_else(|problem| {
        issues.push(InputIssue {
            field,
            problem,
            raw: raw.to_string(),
        });
        0.0
    })
}

fn money(issues: &mut Vec<InputIssue>, field: &'static str, raw: &str) -> f64 {
    let value = number(issues, field, raw);
    if value < 0.0 {
        issues.push(InputIssue {
            field,
            problem: InputProblem::Negative,
            raw: raw.to_string(),
        });
        return 0.0;
    }
    value
}

fn whole_years(issues: &mut Vec<InputIssue>, raw: &str) -> u32 {
    let value = number(issues, "years", raw);
    if value == 0.0 {
        // Blank or unreadable horizons mean a single year.
        return 1;
    }
    if value < 1.0 {
        issues.push(InputIssue {
            field: "years",
            problem: InputProblem::BelowMinimum,
            raw: raw.to_string(),
        });
        return 1;
    }
    if value > MAX_YEARS as f64 {
        issues.push(InputIssue {
            field: "years",
            problem: InputProblem::AboveMaximum,
            raw: raw.to_string(),
        });
        return MAX_YEARS;
    }
    if value.fract() != 0.0 {
        issues.push(InputIssue {
            field: "years",
            problem: InputProblem::Fractional,
            raw: raw.to_string(),
        });
    }
    value.trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState {
            stock_type: "growth".to_string(),
            initial: "1000".to_string(),
            monthly: "100".to_string(),
            years: "5".to_string(),
            rate: "7".to_string(),
            share_price: "".to_string(),
            rate_growth: "3".to_string(),
            div_yield: "4".to_string(),
            reinvest: false,
            currency: "USD".to_string(),
        }
    }

    fn problems(input: &NormalizedInput) -> Vec<(&'static str, InputProblem)> {
        input.issues.iter().map(|i| (i.field, i.problem)).collect()
    }

    #[test]
    fn clean_growth_form_normalizes_without_issues() {
        let input = form().normalize();
        assert!(input.issues.is_empty());
        assert_eq!(input.params.initial_amount, 1_000.0);
        assert_eq!(input.params.monthly_contribution, 100.0);
        assert_eq!(input.params.years, 5);
        assert_eq!(
            input.params.model,
            GrowthModel::Growth {
                annual_rate_percent: 7.0
            }
        );
        assert_eq!(input.currency, "USD");
    }

    #[test]
    fn dividend_form_reads_growth_yield_and_reinvest() {
        let mut state = form();
        state.stock_type = " Dividend ".to_string();
        state.reinvest = true;
        let input = state.normalize();
        assert_eq!(
            input.params.model,
            GrowthModel::Dividend {
                annual_price_growth_percent: 3.0,
                annual_dividend_yield_percent: 4.0,
                reinvest_dividends: true,
            }
        );
    }

    #[test]
    fn blank_fields_become_zero_silently() {
        let mut state = form();
        state.initial = "".to_string();
        state.monthly = "   ".to_string();
        state.rate = "".to_string();
        let input = state.normalize();
        assert!(input.issues.is_empty());
        assert_eq!(input.params.initial_amount, 0.0);
        assert_eq!(input.params.monthly_contribution, 0.0);
    }

    #[test]
    fn garbage_and_non_finite_numbers_are_zeroed_and_reported() {
        let mut state = form();
        state.initial = "abc".to_string();
        state.rate = "NaN".to_string();
        state.monthly = "inf".to_string();
        let input = state.normalize();

        assert_eq!(input.params.initial_amount, 0.0);
        assert_eq!(input.params.monthly_contribution, 0.0);
        assert_eq!(
            input.params.model,
            GrowthModel::Growth {
                annual_rate_percent: 0.0
            }
        );
        assert_eq!(
            problems(&input),
            vec![
                ("initial", InputProblem::NotANumber),
                ("monthly", InputProblem::NonFinite),
                ("rate", InputProblem::NonFinite),
            ]
        );
    }

    #[test]
    fn negative_money_is_clamped_but_negative_rates_are_kept() {
        let mut state = form();
        state.monthly = "-50".to_string();
        state.rate = "-2.5".to_string();
        let input = state.normalize();

        assert_eq!(input.params.monthly_contribution, 0.0);
        assert_eq!(
            input.params.model,
            GrowthModel::Growth {
                annual_rate_percent: -2.5
            }
        );
        assert_eq!(problems(&input), vec![("monthly", InputProblem::Negative)]);
    }

    #[test]
    fn years_are_clamped_to_range_and_truncated() {
        let cases = [
            ("", 1, vec![]),
            ("0", 1, vec![]),
            ("x", 1, vec![("years", InputProblem::NotANumber)]),
            ("-3", 1, vec![("years", InputProblem::BelowMinimum)]),
            ("0.5", 1, vec![("years", InputProblem::BelowMinimum)]),
            ("2.75", 2, vec![("years", InputProblem::Fractional)]),
            ("30", 30, vec![]),
            ("100", 100, vec![]),
            ("100.5", 100, vec![("years", InputProblem::AboveMaximum)]),
            ("400000000", 100, vec![("years", InputProblem::AboveMaximum)]),
            ("1e300", 100, vec![("years", InputProblem::AboveMaximum)]),
        ];
        for (raw, expected, expected_issues) in cases {
            let mut state = form();
            state.years = raw.to_string();
            let input = state.normalize();
            assert_eq!(input.params.years, expected, "years input {raw:?}");
            assert_eq!(problems(&input), expected_issues, "years input {raw:?}");
        }
    }

    #[test]
    fn unknown_stock_type_falls_back_to_growth() {
        let mut state = form();
        state.stock_type = "bonds".to_string();
        let input = state.normalize();
        assert!(!input.params.model.is_dividend());
        assert_eq!(problems(&input), vec![("stockType", InputProblem::UnknownModel)]);
    }

    #[test]
    fn empty_currency_defaults_to_riyal() {
        let mut state = form();
        state.currency = " ".to_string();
        assert_eq!(state.normalize().currency, "SAR");
    }

    #[test]
    fn stored_state_overrides_only_non_empty_fields() {
        let mut state = form();
        let stored: StoredState = serde_json::from_str(
            r#"{"stockType":"dividend","initial":"","years":"12","reinvest":true,"currency":"EUR"}"#,
        )
        .expect("stored state parses");
        state.apply_stored(stored);

        assert_eq!(state.stock_type, "dividend");
        assert_eq!(state.initial, "1000");
        assert_eq!(state.years, "12");
        assert!(state.reinvest);
        assert_eq!(state.currency, "EUR");
        assert_eq!(state.monthly, "100");
    }

    #[test]
    fn stored_state_accepts_numbers_and_text() {
        let mut state = form();
        let stored: StoredState = serde_json::from_str(
            r#"{"stockType":"dividend","initial":5000,"monthly":"250","years":12,"divYield":3.5}"#,
        )
        .expect("mixed stored state parses");
        state.apply_stored(stored);

        assert_eq!(state.initial, "5000");
        assert_eq!(state.monthly, "250");
        assert_eq!(state.years, "12");
        assert_eq!(state.div_yield, "3.5");
        let input = state.normalize();
        assert!(input.issues.is_empty());
        assert_eq!(input.params.initial_amount, 5_000.0);
        assert_eq!(input.params.years, 12);
    }

    #[test]
    fn form_state_serializes_with_browser_keys() {
        let json = serde_json::to_string(&form()).expect("serialize");
        for key in [
            "\"stockType\"",
            "\"sharePrice\"",
            "\"rateGrowth\"",
            "\"divYield\"",
            "\"reinvest\"",
        ] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn dividend_yield_requires_positive_share_price() {
        assert_eq!(dividend_yield_percent(1.0, 4.0), Some(25.0));
        assert_eq!(dividend_yield_percent(2.0, 0.0), None);
        assert_eq!(dividend_yield_percent(2.0, -10.0), None);
    }
}
