use askama::Template;
use common::models::{AnalysisResult, BatchRow};
use predictor::batch::BatchSummary;
use predictor::export::percent;
use reqwest::Url;

const RESULT_WIDTH: usize = 8;
const SCORE_WIDTH: usize = 7;

#[derive(Template)]
#[template(path = "result_card.txt")]
pub struct ResultCard<'a> {
    verdict: &'static str,
    smiles: &'a str,
    confidence: String,
    gnn: String,
    rf: String,
    image_url: String,
}

impl<'a> ResultCard<'a> {
    pub fn new(result: &'a AnalysisResult, image_url: Option<&Url>) -> Self {
        ResultCard {
            verdict: if result.is_active {
                "Active compound"
            } else {
                "Inactive compound"
            },
            smiles: &result.smiles,
            confidence: percent(result.confidence),
            gnn: percent(result.gnn_accuracy),
            rf: percent(result.rf_accuracy),
            image_url: image_url.map(Url::to_string).unwrap_or_default(),
        }
    }
}

pub struct TableRow {
    smiles: String,
    result: String,
    confidence: String,
    gnn: String,
    rf: String,
}

#[derive(Template)]
#[template(path = "batch_table.txt")]
pub struct BatchTable {
    header: String,
    rows: Vec<TableRow>,
    summary: BatchSummary,
}

impl BatchTable {
    pub fn new(rows: &[BatchRow]) -> Self {
        let smiles_width = rows
            .iter()
            .map(|row| row.smiles.chars().count())
            .max()
            .unwrap_or(0)
            .max("SMILES".len());

        let header = format!(
            "{:<smiles_width$}  {:<RESULT_WIDTH$}  {:>SCORE_WIDTH$}  {:>SCORE_WIDTH$}  {:>SCORE_WIDTH$}",
            "SMILES", "Result", "Conf.", "GNN", "RF"
        );

        BatchTable {
            header: header.trim_end().to_string(),
            rows: rows
                .iter()
                .map(|row| TableRow {
                    smiles: format!("{:<smiles_width$}", row.smiles),
                    result: format!("{:<RESULT_WIDTH$}", row.result),
                    confidence: format!("{:>SCORE_WIDTH$}", percent(row.confidence)),
                    gnn: format!("{:>SCORE_WIDTH$}", percent(row.gnn)),
                    rf: format!("{:>SCORE_WIDTH$}", percent(row.rf)),
                })
                .collect(),
            summary: BatchSummary::from_rows(rows),
        }
    }
}
