use std::io;

use super::types::{GrowthModel, YearlyRow};

pub const CSV_FILE_NAME: &str = "yearly_summary.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub fn csv_header(model: &GrowthModel) -> Vec<&'static str> {
    let mut header = vec!["year", "total_contributions"];
    if model.is_dividend() {
        header.push("dividends");
    }
    header.push("year_end_balance");
    header
}

/// Streams the yearly rows as CSV: raw numbers, `\n` after every record.
pub fn write_csv<W: io::Write>(
    rows: &[YearlyRow],
    model: &GrowthModel,
    writer: W,
) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    out.write_record(csv_header(model))?;

    for row in rows {
        let mut record = vec![
            row.year.to_string(),
            row.cumulative_contributions.to_string(),
        ];
        if model.is_dividend() {
            record.push(row.cumulative_dividends.to_string());
        }
        record.push(row.year_end_balance.to_string());
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

pub fn export_csv(rows: &[YearlyRow], model: &GrowthModel) -> String {
    let mut buf = Vec::new();
    write_csv(rows, model, &mut buf).expect("writing csv into memory");
    String::from_utf8(buf).expect("csv output is utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dividend_model() -> GrowthModel {
        GrowthModel::Dividend {
            annual_price_growth_percent: 5.0,
            annual_dividend_yield_percent: 3.0,
            reinvest_dividends: false,
        }
    }

    fn row(year: u32, contributions: f64, dividends: f64, balance: f64) -> YearlyRow {
        YearlyRow {
            year,
            cumulative_contributions: contributions,
            cumulative_dividends: dividends,
            year_end_balance: balance,
        }
    }

    #[test]
    fn dividend_export_has_four_numeric_columns() {
        let rows = [row(1, 2_200.0, 31.5, 2_301.25), row(2, 3_400.0, 80.125, 3_650.0)];
        let text = export_csv(&rows, &dividend_model());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "year,total_contributions,dividends,year_end_balance");
        assert_eq!(lines.len(), 3);
        for line in &lines[1..] {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 4);
            assert!(fields.iter().all(|f| f.parse::<f64>().is_ok()));
        }
        assert_eq!(lines[1], "1,2200,31.5,2301.25");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn growth_export_skips_dividend_column_and_grouping() {
        let model = GrowthModel::Growth {
            annual_rate_percent: 7.0,
        };
        let text = export_csv(&[row(1, 1_250_000.0, 0.0, 1_337_000.75)], &model);
        assert_eq!(
            text,
            "year,total_contributions,year_end_balance\n1,1250000,1337000.75\n"
        );
    }

    #[test]
    fn empty_rows_still_emit_header() {
        let text = export_csv(&[], &dividend_model());
        assert_eq!(text, "year,total_contributions,dividends,year_end_balance\n");
    }
}
