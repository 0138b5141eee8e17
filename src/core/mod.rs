mod currency;
mod engine;
mod export;
mod input;
mod projection;
mod summary;
mod types;

pub use currency::{CurrencyFormatter, DEFAULT_CURRENCY, format_currency};
pub use engine::{aggregate, chart_points, simulate};
pub use export::{CSV_CONTENT_TYPE, CSV_FILE_NAME, csv_header, export_csv, write_csv};
pub use input::{
    FieldValue, FormState, InputIssue, InputProblem, MAX_YEARS, NormalizedInput, StoredState,
    dividend_yield_percent, parse_number,
};
pub use projection::Projection;
pub use summary::{Headline, headline, percent_gain, summarize};
pub use types::{
    ChartPoint, GrowthModel, SeriesPoint, SimulationParameters, SimulationResult, Summary,
    YearlyRow,
};
