use serde::Serialize;

use super::currency::CurrencyFormatter;
use super::types::{GrowthModel, SimulationParameters, SimulationResult, Summary};

/// Formatted strings for the result cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub final_balance: String,
    pub total_contributions: String,
    pub total_dividends: String,
}

pub fn summarize(
    result: &SimulationResult,
    params: &SimulationParameters,
    currency: &CurrencyFormatter,
) -> Summary {
    let final_balance = result.final_balance();
    let total_contributions = params.contributions_through(result.total_months);
    let total_dividends = result.total_dividends_paid;
    let percent_gain = percent_gain(final_balance, total_contributions);

    let horizon = match params.years {
        1 => "1 year".to_string(),
        n => format!("{n} years"),
    };
    let narrative = match params.model {
        GrowthModel::Growth {
            annual_rate_percent,
        } => format!(
            "Investing in growth stocks for {horizon} at {annual_rate_percent}% a year could grow to {}. That is {percent_gain}% more than total contributions.",
            currency.format(final_balance),
        ),
        GrowthModel::Dividend {
            annual_price_growth_percent,
            annual_dividend_yield_percent,
            reinvest_dividends,
        } => format!(
            "Investing in dividend stocks for {horizon} with {annual_price_growth_percent}% price growth and a {annual_dividend_yield_percent}% dividend yield{} could grow to {}. Total dividends ≈ {}.",
            if reinvest_dividends {
                ", reinvesting dividends"
            } else {
                ""
            },
            currency.format(final_balance),
            currency.format(total_dividends),
        ),
    };

    Summary {
        final_balance,
        total_contributions,
        total_dividends,
        percent_gain,
        narrative,
    }
}

pub fn headline(summary: &Summary, model: &GrowthModel, currency: &CurrencyFormatter) -> Headline {
    Headline {
        final_balance: currency.format(summary.final_balance),
        total_contributions: currency.format(summary.total_contributions),
        total_dividends: if model.is_dividend() {
            currency.format(summary.total_dividends)
        } else {
            "-".to_string()
        },
    }
}

/// Gain over contributions in whole percent, rounded half away from zero.
pub fn percent_gain(final_balance: f64, total_contributions: f64) -> i64 {
    if total_contributions > 0.0 {
        (100.0 * (final_balance - total_contributions) / total_contributions).round() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::simulate;

    fn growth(initial: f64, monthly: f64, years: u32, rate: f64) -> SimulationParameters {
        SimulationParameters {
            initial_amount: initial,
            monthly_contribution: monthly,
            years,
            model: GrowthModel::Growth {
                annual_rate_percent: rate,
            },
        }
    }

    #[test]
    fn totals_follow_the_series_and_contributions() {
        let params = growth(1_000.0, 100.0, 2, 6.0);
        let result = simulate(&params);
        let summary = summarize(&result, &params, &CurrencyFormatter::new("USD"));

        assert_eq!(summary.final_balance, result.final_balance());
        assert_eq!(summary.total_contributions, 1_000.0 + 100.0 * 24.0);
        assert_eq!(summary.total_dividends, 0.0);
    }

    #[test]
    fn percent_gain_rounds_to_nearest_and_guards_zero_contributions() {
        assert_eq!(percent_gain(1_500.0, 1_000.0), 50);
        assert_eq!(percent_gain(1_004.9, 1_000.0), 0);
        assert_eq!(percent_gain(1_005.0, 1_000.0), 1);
        assert_eq!(percent_gain(500.0, 1_000.0), -50);
        assert_eq!(percent_gain(123.0, 0.0), 0);
    }

    #[test]
    fn growth_narrative_mentions_rate_balance_and_gain() {
        let params = growth(1_000.0, 0.0, 1, 0.0);
        let result = simulate(&params);
        let summary = summarize(&result, &params, &CurrencyFormatter::new("USD"));

        assert_eq!(
            summary.narrative,
            "Investing in growth stocks for 1 year at 0% a year could grow to $1,000.00. That is 0% more than total contributions."
        );
    }

    #[test]
    fn dividend_narrative_mentions_reinvestment_and_dividends() {
        let params = SimulationParameters {
            initial_amount: 10_000.0,
            monthly_contribution: 0.0,
            years: 3,
            model: GrowthModel::Dividend {
                annual_price_growth_percent: 0.0,
                annual_dividend_yield_percent: 4.5,
                reinvest_dividends: true,
            },
        };
        let result = simulate(&params);
        let summary = summarize(&result, &params, &CurrencyFormatter::new("SAR"));

        assert!(summary.narrative.starts_with(
            "Investing in dividend stocks for 3 years with 0% price growth and a 4.5% dividend yield, reinvesting dividends could grow to SAR "
        ));
        assert!(summary.narrative.contains("Total dividends ≈ SAR "));
        assert!(summary.total_dividends > 0.0);
    }

    #[test]
    fn narrative_falls_back_for_malformed_currency() {
        let params = growth(100.0, 0.0, 1, 0.0);
        let result = simulate(&params);
        let summary = summarize(&result, &params, &CurrencyFormatter::new("??"));
        assert!(summary.narrative.contains("could grow to 100.00 ??."));
    }

    #[test]
    fn headline_hides_dividends_for_growth_model() {
        let params = growth(100.0, 10.0, 1, 0.0);
        let currency = CurrencyFormatter::new("USD");
        let result = simulate(&params);
        let summary = summarize(&result, &params, &currency);
        let cards = headline(&summary, &params.model, &currency);

        assert_eq!(cards.final_balance, "$220.00");
        assert_eq!(cards.total_contributions, "$220.00");
        assert_eq!(cards.total_dividends, "-");
    }
}
