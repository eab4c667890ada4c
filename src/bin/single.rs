use std::env;
use std::error::Error;

use anyhow::anyhow;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use spreadline::batch::Evaluation;
use spreadline::domain::{Matchup, MatchupPrediction, Spread};
use spreadline::dto;
use spreadline::dto::ProbabilityPerspective;
use spreadline::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// predicted home-minus-away margin
    #[clap(short = 'm', long, allow_hyphen_values = true)]
    margin: Option<f64>,

    /// residual standard deviation of the margin model
    #[clap(short = 's', long)]
    std: Option<f64>,

    /// point spread against the home side (negative when home is favoured)
    #[clap(short = 'p', long, allow_hyphen_values = true)]
    spread: Option<f64>,

    /// matchup identifier
    #[clap(long, default_value = "matchup")]
    matchup: String,

    /// home team identifier
    #[clap(long, default_value = "home")]
    home: String,

    /// away team identifier
    #[clap(long, default_value = "away")]
    away: String,

    /// perspective of emitted probabilities (winner-relative or home-relative)
    #[clap(long, default_value_t = ProbabilityPerspective::WinnerRelative)]
    perspective: ProbabilityPerspective,

    /// version tag stamped on emitted records
    #[clap(long, default_value = "dev")]
    model_version: String,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.margin
            .ok_or(anyhow!("predicted margin must be specified"))?;
        self.std
            .ok_or(anyhow!("residual std must be specified"))?;
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

    let prediction = MatchupPrediction::new(args.margin.unwrap(), args.std.unwrap())?;
    let spread = args.spread.map(Spread);
    let matchup = Matchup {
        matchup_id: args.matchup,
        home_id: args.home,
        away_id: args.away,
    };
    let evaluation = Evaluation {
        result: prediction.evaluate(spread)?,
        matchup,
        spread,
    };
    info!(
        "probabilities:\n{}",
        Console::default().render(&print::tabulate(&[evaluation.clone()]))
    );

    let dtos = dto::emit(
        &evaluation.matchup,
        &evaluation.result,
        args.perspective,
        &args.model_version,
    );
    println!("{}", serde_json::to_string_pretty(&dtos)?);
    Ok(())
}
