use crate::error::ReportError;
use crate::types::{Interval, Match, ScanResult};
use std::io::{Read, Write};
use std::path::Path;

const HEADERS: [&str; 3] = ["Stock Name", "Symbol", "RSI"];

/// One-line outcome shown before the table.
pub fn outcome_message(result: &ScanResult, threshold: f64, interval: Interval) -> String {
    if result.is_empty() {
        format!("No stocks found with RSI > {}", threshold)
    } else {
        format!("Stocks with RSI > {} ({} Data)", threshold, interval)
    }
}

/// Default export file name, e.g. `RSI_above_60.csv`.
pub fn default_file_name(threshold: f64) -> String {
    format!("RSI_above_{}.csv", threshold)
}

/// Fixed-width text table of the matches.
pub fn render_table(matches: &[Match]) -> String {
    let rows: Vec<[String; 3]> = matches
        .iter()
        .map(|m| [m.name.clone(), m.symbol.clone(), format!("{:.2}", m.rsi)])
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: [&str; 3]| {
        format!("{:<w0$}  {:<w1$}  {:>w2$}\n", cells[0], cells[1], cells[2], w0 = widths[0], w1 = widths[1], w2 = widths[2])
    };
    out.push_str(&line(HEADERS));
    let rule = widths.map(|w| "-".repeat(w));
    out.push_str(&line([rule[0].as_str(), rule[1].as_str(), rule[2].as_str()]));
    for [name, symbol, rsi] in &rows {
        out.push_str(&line([name.as_str(), symbol.as_str(), rsi.as_str()]));
    }
    out
}

pub fn write_csv<W: Write>(matches: &[Match], writer: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(writer);
    if matches.is_empty() {
        writer.write_record(HEADERS)?;
    }
    for m in matches {
        writer.serialize(m)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Match>, ReportError> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader.deserialize().collect::<Result<Vec<Match>, _>>()?;
    Ok(rows)
}

pub fn export_csv(matches: &[Match], path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_csv(matches, std::io::BufWriter::new(file))
}
