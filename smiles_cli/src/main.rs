mod cli;
mod interactive;
mod render;

use crate::cli::{BatchArgs, Cli, Commands, PredictArgs, ValidateArgs};
use crate::render::{BatchTable, ResultCard};
use anyhow::{Context, bail};
use askama::Template;
use clap::Parser;
use common::models::{
    AnalysisResult, BatchPredictionResult, BatchRequest, BatchRow, PredictionDetails,
    PredictionRequest, PredictionResult,
};
use common::smiles::validate;
use env_logger::Env;
use log::{debug, error, info, warn};
use predictor::api::PredictionApi;
use predictor::batch::{BatchJob, DispatchMode};
use predictor::export::{CsvLayout, save_csv};
use predictor::notice::Notice;
use predictor::single::SingleAnalysis;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::exit;
use utoipa::OpenApi;

fn get_default_api_base_url() -> String {
    "https://chem-prediction-api-ca.azurewebsites.net".to_string()
}

fn get_default_min_line_length() -> usize {
    1
}

#[derive(Deserialize, Debug)]
struct Config {
    #[serde(default = "get_default_api_base_url")]
    api_base_url: String,
    #[serde(default)]
    batch_mode: DispatchMode,
    #[serde(default)]
    csv_layout: CsvLayout,
    #[serde(default = "get_default_min_line_length")]
    min_line_length: usize,
}

#[derive(OpenApi)]
#[openapi(
    info(description = "Payloads exchanged with the SMILES activity prediction API"),
    components(schemas(
        PredictionRequest,
        BatchRequest,
        PredictionResult,
        PredictionDetails,
        BatchPredictionResult,
        AnalysisResult,
        BatchRow
    ))
)]
struct ApiDoc;

pub(crate) fn report(notice: &Notice) {
    if notice.is_silent() {
        debug!("{notice}");
    } else {
        eprintln!("{notice}");
    }
}

fn validate_command(args: &ValidateArgs) -> bool {
    let valid = validate(&args.smiles);
    if valid {
        println!("Valid SMILES structure detected");
    } else {
        println!("Invalid SMILES format");
    }
    valid
}

async fn predict_command(api: &PredictionApi, args: PredictArgs) -> Result<bool, anyhow::Error> {
    let mut analysis = SingleAnalysis::default();
    analysis.set_input(args.smiles);

    let result = match analysis.analyze(api).await {
        Ok(result) => result,
        Err(notice) => {
            report(&notice);
            return Ok(false);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let card = ResultCard::new(&result, analysis.image_url()).render()?;
        println!("{}", card.trim_end());
    }

    if let Some(path) = args.image {
        save_image(api, &result.smiles, &path).await?;
    }
    Ok(true)
}

async fn save_image(api: &PredictionApi, smiles: &str, path: &Path) -> Result<(), anyhow::Error> {
    match api.molecule_image(smiles).await {
        Ok(Some(bytes)) => {
            tokio::fs::write(path, &bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("structure image saved to {}", path.display());
        }
        Ok(None) => report(&Notice::ImageUnavailable),
        Err(err) => {
            warn!("molecule image request failed: {err}");
            report(&Notice::ImageUnavailable);
        }
    }
    Ok(())
}

async fn batch_command(
    api: &PredictionApi,
    config: &Config,
    args: BatchArgs,
) -> Result<bool, anyhow::Error> {
    match args.file.extension().and_then(|ext| ext.to_str()) {
        Some("txt" | "csv") => {}
        _ => bail!(
            "unsupported file {}: expected a .txt or .csv file",
            args.file.display()
        ),
    }

    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mode = args.mode.map(DispatchMode::from).unwrap_or(config.batch_mode);
    let layout = args.layout.map(CsvLayout::from).unwrap_or(config.csv_layout);
    let min_line_length = args.min_length.unwrap_or(config.min_line_length);

    let mut job = BatchJob::new(mode, min_line_length);
    eprintln!("Running predictions...");
    let rows = match job
        .run(api, &text, |index, total, row| {
            eprintln!("[{}/{}] {} {}", index + 1, total, row.smiles, row.result)
        })
        .await
    {
        Ok(rows) => rows,
        Err(err) => {
            report(&err.notice());
            return Ok(false);
        }
    };

    let table = BatchTable::new(rows).render()?;
    println!("{}", table.trim_end());

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(layout.file_name()));
    save_csv(rows, layout, &out).with_context(|| format!("failed to write {}", out.display()))?;
    info!("{} rows written to {}", rows.len(), out.display());

    Ok(true)
}

async fn run(cli: Cli) -> Result<bool, anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let command = match cli.command {
        Commands::Validate(args) => return Ok(validate_command(&args)),
        command => command,
    };

    let config = envy::from_env::<Config>()?;

    let api = PredictionApi::new(
        config
            .api_base_url
            .parse()
            .with_context(|| format!("failed to parse API_BASE_URL {}", config.api_base_url))?,
    );
    debug!("using prediction api at {}", api.base_url());

    match command {
        Commands::Validate(args) => Ok(validate_command(&args)),
        Commands::Predict(args) => predict_command(&api, args).await,
        Commands::Batch(args) => batch_command(&api, &config, args).await,
        Commands::Interactive => {
            interactive::run(&api).await?;
            Ok(true)
        }
        Commands::Schema => {
            println!("{}", ApiDoc::openapi().to_pretty_json()?);
            Ok(true)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let rt = tokio::runtime::Runtime::new().unwrap();

    match rt.block_on(run(cli)) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(err) => {
            error!("{}", err);
            exit(1)
        }
    }
}
