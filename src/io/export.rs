//! CSV export for day-ahead dispatch plans.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::dispatch::DispatchResult;

/// Column header for the hourly plan export.
const HEADER: &str = "hour,load_kw,pv_forecast_kw,pv_kw,battery_charge_kw,\
                      battery_discharge_kw,battery_kw,grid_kw,soc_kwh,grid_price,cost";

/// Exports a dispatch plan to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour. Produces deterministic
/// output for identical inputs.
///
/// # Arguments
///
/// * `result` - Solved dispatch plan
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &DispatchResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes a dispatch plan as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &DispatchResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for h in &result.hours {
        wtr.write_record(&[
            h.hour.to_string(),
            format!("{:.4}", h.load_kw),
            format!("{:.4}", h.pv_forecast_kw),
            format!("{:.4}", h.pv_kw),
            format!("{:.4}", h.battery_charge_kw),
            format!("{:.4}", h.battery_discharge_kw),
            format!("{:.4}", h.battery_kw),
            format!("{:.4}", h.grid_kw),
            format!("{:.4}", h.soc_kwh),
            format!("{:.4}", h.grid_price),
            format!("{:.4}", h.cost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::HourlyDispatch;

    fn make_hour(h: usize) -> HourlyDispatch {
        HourlyDispatch {
            hour: h,
            load_kw: 10.0,
            pv_forecast_kw: 4.0,
            pv_kw: 4.0,
            battery_charge_kw: 0.0,
            battery_discharge_kw: 1.5,
            battery_kw: 1.5,
            grid_kw: 4.5,
            soc_kwh: 11.25,
            grid_price: 1.25,
            cost: 5.7,
        }
    }

    fn make_result(n: usize) -> DispatchResult {
        let hours: Vec<HourlyDispatch> = (0..n).map(make_hour).collect();
        let total_cost = hours.iter().map(|h| h.cost).sum();
        DispatchResult { hours, total_cost }
    }

    #[test]
    fn header_matches_plan_columns() {
        let mut buf = Vec::new();
        write_csv(&make_result(1), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "hour,load_kw,pv_forecast_kw,pv_kw,battery_charge_kw,\
             battery_discharge_kw,battery_kw,grid_kw,soc_kwh,grid_price,cost"
        );
    }

    #[test]
    fn one_row_per_hour() {
        let mut buf = Vec::new();
        write_csv(&make_result(24), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn deterministic_output() {
        let result = make_result(5);
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&result, &mut buf1).ok();
        write_csv(&result, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn rows_are_numeric() {
        let mut buf = Vec::new();
        write_csv(&make_result(3), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(11));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            assert!(rec[0].parse::<usize>().is_ok());
            for i in 1..11 {
                assert!(rec[i].parse::<f64>().is_ok(), "column {i} should parse as f64");
            }
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }

    #[test]
    fn export_writes_file() {
        let path = std::env::temp_dir().join("ev_energy_manager_export_test.csv");
        export_csv(&make_result(2), &path).expect("export should succeed");
        let content = std::fs::read_to_string(&path).expect("file should exist");
        assert_eq!(content.lines().count(), 3);
        std::fs::remove_file(&path).ok();
    }
}
