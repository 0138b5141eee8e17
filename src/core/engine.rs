use super::types::{
    ChartPoint, GrowthModel, SeriesPoint, SimulationParameters, SimulationResult, YearlyRow,
};

#[derive(Debug, Clone, Copy)]
struct MonthlyRates {
    price_growth: f64,
    dividend_yield: f64,
}

impl MonthlyRates {
    fn from_annual_percent(price_growth: f64, dividend_yield: f64) -> Self {
        Self {
            price_growth: monthly_rate(price_growth),
            dividend_yield: monthly_rate(dividend_yield),
        }
    }
}

#[derive(Debug)]
struct Account {
    balance: f64,
    dividends_paid: f64,
}

impl Account {
    fn point(&self, month_index: u32) -> SeriesPoint {
        SeriesPoint {
            month_index,
            balance: self.balance,
            cumulative_dividends: self.dividends_paid,
        }
    }
}

pub fn simulate(params: &SimulationParameters) -> SimulationResult {
    let total_months = params.total_months();
    let mut account = Account {
        balance: params.initial_amount,
        dividends_paid: 0.0,
    };
    let mut points = Vec::with_capacity(total_months as usize + 1);
    points.push(account.point(0));

    match params.model {
        GrowthModel::Growth {
            annual_rate_percent,
        } => {
            let rate = monthly_rate(annual_rate_percent);
            for month in 1..=total_months {
                apply_growth_month(&mut account, rate, params.monthly_contribution);
                points.push(account.point(month));
            }
        }
        GrowthModel::Dividend {
            annual_price_growth_percent,
            annual_dividend_yield_percent,
            reinvest_dividends,
        } => {
            let rates = MonthlyRates::from_annual_percent(
                annual_price_growth_percent,
                annual_dividend_yield_percent,
            );
            for month in 1..=total_months {
                apply_dividend_month(
                    &mut account,
                    rates,
                    params.monthly_contribution,
                    reinvest_dividends,
                );
                points.push(account.point(month));
            }
        }
    }

    SimulationResult {
        points,
        total_months,
        total_dividends_paid: account.dividends_paid,
    }
}

pub fn aggregate(result: &SimulationResult, params: &SimulationParameters) -> Vec<YearlyRow> {
    let years = result.total_months.div_ceil(12);
    let mut rows = Vec::with_capacity(years as usize);
    for year in 1..=years {
        let ref_month = (year * 12).min(result.total_months);
        let point = point_at_or_before(&result.points, ref_month);
        let cumulative_dividends = match params.model {
            GrowthModel::Growth { .. } => 0.0,
            GrowthModel::Dividend { .. } => {
                point.map(|p| p.cumulative_dividends).unwrap_or(0.0)
            }
        };
        rows.push(YearlyRow {
            year,
            cumulative_contributions: params.contributions_through(ref_month),
            cumulative_dividends,
            year_end_balance: point.map(|p| p.balance).unwrap_or(params.initial_amount),
        });
    }
    rows
}

/// Per-point chart data including the tooltip profit.
pub fn chart_points(result: &SimulationResult, params: &SimulationParameters) -> Vec<ChartPoint> {
    result
        .points
        .iter()
        .map(|point| {
            let contributions = params.contributions_through(point.month_index);
            ChartPoint {
                month_index: point.month_index,
                balance: point.balance,
                year: point.month_index / 12,
                month_of_year: point.month_index % 12 + 1,
                contributions,
                profit: (point.balance - contributions).max(0.0),
            }
        })
        .collect()
}

// Nominal annual percent to a simple monthly fraction.
fn monthly_rate(annual_percent: f64) -> f64 {
    (annual_percent / 100.0) / 12.0
}

// Contribution lands after growth, so it earns nothing in its first month.
fn apply_growth_month(account: &mut Account, rate: f64, contribution: f64) {
    account.balance = account.balance * (1.0 + rate) + contribution;
}

// Order is contribution, price growth, dividend on the grown balance, reinvest.
fn apply_dividend_month(
    account: &mut Account,
    rates: MonthlyRates,
    contribution: f64,
    reinvest: bool,
) {
    account.balance += contribution;
    account.balance *= 1.0 + rates.price_growth;
    let dividend = account.balance * rates.dividend_yield;
    account.dividends_paid += dividend;
    if reinvest {
        account.balance += dividend;
    }
}

fn point_at_or_before(points: &[SeriesPoint], month: u32) -> Option<&SeriesPoint> {
    points
        .iter()
        .take_while(|p| p.month_index <= month)
        .last()
        .or_else(|| points.first())
}
