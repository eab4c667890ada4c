use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::anyhow;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use spreadline::batch;
use spreadline::batch::{MatchupInput, SpreadInput};
use spreadline::dto::{PredictionType, ProbabilityPerspective};
use spreadline::file::ReadJsonFile;
use spreadline::pick;
use spreadline::pick::PickStyles;
use spreadline::print;

const DEFAULT_STYLES: &str = "config/pick_styles.json";

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// JSON file with the straight-up model output for each matchup
    matchups: Option<PathBuf>,

    /// JSON file with the spread for each matchup
    #[clap(short = 'p', long)]
    spreads: Option<PathBuf>,

    /// perspective of emitted probabilities (winner-relative or home-relative)
    #[clap(long, default_value_t = ProbabilityPerspective::WinnerRelative)]
    perspective: ProbabilityPerspective,

    /// version tag stamped on emitted records
    #[clap(long, default_value = "dev")]
    model_version: String,

    /// pick style to report against-the-spread picks for
    #[clap(long)]
    style: Option<String>,

    /// JSON file with the confidence thresholds of each pick style
    #[clap(long)]
    styles: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.matchups
            .as_ref()
            .ok_or(anyhow!("matchups file must be specified"))?;
        if self.styles.is_some() && self.style.is_none() {
            return Err(anyhow!("a pick style must be named when a styles file is given"));
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let inputs = Vec::<MatchupInput>::read_json_file(args.matchups.unwrap())?;
    let spreads = match args.spreads {
        None => {
            warn!("no spreads supplied, deriving straight-up probabilities only");
            vec![]
        }
        Some(path) => Vec::<SpreadInput>::read_json_file(path)?,
    };

    let start_time = Instant::now();
    let outcome = batch::evaluate_batch(&inputs, &spreads);
    let elapsed = start_time.elapsed();
    info!(
        "evaluated {} matchups ({} failed) in {}s",
        inputs.len(),
        outcome.failures.len(),
        elapsed.as_millis() as f64 / 1_000.
    );
    info!(
        "probabilities:\n{}",
        Console::default().render(&print::tabulate(&outcome.evaluations))
    );

    if let Some(style) = args.style {
        let styles_path = args.styles.unwrap_or_else(|| PathBuf::from(DEFAULT_STYLES));
        let styles = PickStyles::read_json_file(&styles_path)?;
        if styles.is_empty() {
            return Err(anyhow!("no pick styles defined in {}", styles_path.display()).into());
        }
        debug!("loaded {} pick styles from {}", styles.len(), styles_path.display());
        let thresholds = styles.get(&style)?;
        for evaluation in &outcome.evaluations {
            let side = pick::pick(
                PredictionType::AgainstTheSpread,
                &evaluation.result,
                evaluation.spread,
                thresholds,
            );
            info!(
                "{style} pick for {}: {side} ({})",
                evaluation.matchup,
                evaluation.matchup.team(side)
            );
        }
    }

    let dtos = outcome.dtos(args.perspective, &args.model_version);
    println!("{}", serde_json::to_string_pretty(&dtos)?);
    Ok(())
}
