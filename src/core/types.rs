use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GrowthModel {
    #[serde(rename_all = "camelCase")]
    Growth { annual_rate_percent: f64 },
    #[serde(rename_all = "camelCase")]
    Dividend {
        annual_price_growth_percent: f64,
        annual_dividend_yield_percent: f64,
        reinvest_dividends: bool,
    },
}

impl GrowthModel {
    pub fn is_dividend(&self) -> bool {
        matches!(self, GrowthModel::Dividend { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub years: u32,
    pub model: GrowthModel,
}

impl SimulationParameters {
    pub fn total_months(&self) -> u32 {
        self.years.saturating_mul(12)
    }

    /// Principal paid in by the end of `month`, month 0 being the initial deposit.
    pub fn contributions_through(&self, month: u32) -> f64 {
        self.initial_amount + self.monthly_contribution * month as f64
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub month_index: u32,
    pub balance: f64,
    pub cumulative_dividends: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub points: Vec<SeriesPoint>,
    pub total_months: u32,
    pub total_dividends_paid: f64,
}

impl SimulationResult {
    pub fn final_balance(&self) -> f64 {
        self.points.last().map(|p| p.balance).unwrap_or(0.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRow {
    pub year: u32,
    pub cumulative_contributions: f64,
    pub cumulative_dividends: f64,
    pub year_end_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_balance: f64,
    pub total_contributions: f64,
    pub total_dividends: f64,
    pub percent_gain: i64,
    pub narrative: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month_index: u32,
    pub balance: f64,
    pub year: u32,
    pub month_of_year: u32,
    pub contributions: f64,
    pub profit: f64,
}
