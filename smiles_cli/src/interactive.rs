use crate::render::ResultCard;
use crate::report;
use askama::Template;
use predictor::api::PredictionApi;
use predictor::single::SingleAnalysis;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Type or paste a SMILES string to check it, then:
  :analyze  send it to the prediction API
  :reset    clear the input and the last result
  :new      close the result and start over
  :close    close the result, keep it in memory
  :quit     leave";

pub async fn run(api: &PredictionApi) -> Result<(), anyhow::Error> {
    let mut analysis = SingleAnalysis::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":help" | ":h" => println!("{HELP}"),
            ":analyze" | ":a" => {
                if analysis.can_analyze() {
                    println!("Analyzing...");
                }
                match analysis.analyze(api).await {
                    Ok(result) => {
                        let card = ResultCard::new(&result, analysis.image_url()).render()?;
                        println!("{}", card.trim_end());
                    }
                    Err(notice) => report(&notice),
                }
            }
            ":reset" => {
                analysis.reset();
                println!("Input cleared");
            }
            ":new" => {
                analysis.new_analysis();
                println!("Ready for a new analysis");
            }
            ":close" => analysis.close(),
            _ => {
                analysis.set_input(line.as_str());
                match analysis.validity() {
                    Some(true) => println!("Valid SMILES structure detected"),
                    Some(false) => println!("Invalid SMILES format"),
                    None => {}
                }
            }
        }
    }

    Ok(())
}
