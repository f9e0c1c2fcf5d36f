use common::models::BatchRow;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvLayout {
    /// `smiles,result,confidence,gnn,rf`
    #[default]
    Compact,
    /// `SMILES,Result,Confidence,GNN_Prob,RF_Prob`
    Detailed,
}

impl CsvLayout {
    pub fn header(self) -> [&'static str; 5] {
        match self {
            CsvLayout::Compact => ["smiles", "result", "confidence", "gnn", "rf"],
            CsvLayout::Detailed => ["SMILES", "Result", "Confidence", "GNN_Prob", "RF_Prob"],
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            CsvLayout::Compact => "batch_results.csv",
            CsvLayout::Detailed => "prediction_results.csv",
        }
    }
}

/// Formats a 0..1 score as a percentage with two decimals, e.g. `87.50%`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn write_csv<W: io::Write>(
    rows: &[BatchRow],
    layout: CsvLayout,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(layout.header())?;
    for row in rows {
        let confidence = percent(row.confidence);
        let gnn = percent(row.gnn);
        let rf = percent(row.rf);
        wtr.write_record([
            row.smiles.as_str(),
            row.result.as_str(),
            confidence.as_str(),
            gnn.as_str(),
            rf.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(rows: &[BatchRow], layout: CsvLayout) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(rows, layout, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

pub fn save_csv(rows: &[BatchRow], layout: CsvLayout, path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_csv(rows, layout, io::BufWriter::new(file))
}
