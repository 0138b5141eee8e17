use super::currency::CurrencyFormatter;
use super::engine::{aggregate, chart_points, simulate};
use super::export::export_csv;
use super::input::{FormState, NormalizedInput};
use super::summary::{Headline, headline, summarize};
use super::types::{ChartPoint, SimulationResult, Summary, YearlyRow};

/// Everything one recomputation produces for display.
#[derive(Debug, Clone)]
pub struct Projection {
    pub input: NormalizedInput,
    pub currency: CurrencyFormatter,
    pub result: SimulationResult,
    pub rows: Vec<YearlyRow>,
    pub summary: Summary,
    pub headline: Headline,
    pub chart: Vec<ChartPoint>,
}

impl Projection {
    pub fn from_form(form: &FormState) -> Self {
        let input = form.normalize();
        let params = input.params;
        let currency = CurrencyFormatter::new(&input.currency);
        let result = simulate(&params);
        let rows = aggregate(&result, &params);
        let summary = summarize(&result, &params, &currency);
        let headline = headline(&summary, &params.model, &currency);
        let chart = chart_points(&result, &params);
        Self {
            input,
            currency,
            result,
            rows,
            summary,
            headline,
            chart,
        }
    }

    pub fn csv(&self) -> String {
        export_csv(&self.rows, &self.input.params.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_row_and_summary_agree_on_contributions() {
        let form = FormState {
            stock_type: "dividend".to_string(),
            initial: "2500".to_string(),
            monthly: "125".to_string(),
            years: "6".to_string(),
            ..FormState::default()
        };
        let projection = Projection::from_form(&form);
        let last = projection.rows.last().expect("at least one row");

        assert_eq!(projection.rows.len(), 6);
        assert_eq!(
            last.cumulative_contributions,
            projection.summary.total_contributions
        );
        assert_eq!(last.cumulative_contributions, 2_500.0 + 125.0 * 72.0);
        assert_eq!(last.cumulative_dividends, projection.summary.total_dividends);
        assert_eq!(last.year_end_balance, projection.summary.final_balance);
        assert_eq!(projection.chart.len(), projection.result.points.len());
    }

    #[test]
    fn csv_uses_the_normalized_model() {
        let form = FormState {
            stock_type: "growth".to_string(),
            years: "2".to_string(),
            ..FormState::default()
        };
        let csv = Projection::from_form(&form).csv();
        assert!(csv.starts_with("year,total_contributions,year_end_balance\n"));
        assert_eq!(csv.lines().count(), 3);
    }
}
