//! Command-line front end: run the portfolio or a single strategy over a
//! clause-normal-form problem and map the verdict to an exit code.

use clap::{Parser, ValueEnum};
use resolute::{
    saturate, CancellationToken, Options, Portfolio, ProblemCnf, ProverError, SaturationResult,
    SliceContext, SliceTimer,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Time-sliced strategy schedule
    Portfolio,
    /// One saturation run with the default strategy
    Single,
}

#[derive(Parser)]
#[command(name = "resolute", about = "Saturation-based first-order reasoning engine")]
struct Args {
    /// Problem file (JSON clause normal form)
    problem: PathBuf,

    #[arg(long, value_enum, default_value = "portfolio")]
    mode: Mode,

    /// Total time budget in deciseconds
    #[arg(long, default_value_t = 3000)]
    time: u32,

    /// Print run statistics as JSON to stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(result) => {
            match &result {
                SaturationResult::Refutation(proof) => {
                    println!("% Refutation found");
                    print!("{}", proof);
                }
                other => println!("% {}", other.name()),
            }
            match result {
                SaturationResult::Refutation(_) => ExitCode::from(0),
                SaturationResult::Satisfiable => ExitCode::from(1),
                _ => ExitCode::from(2),
            }
        }
        Err(ProverError::Interrupted) => {
            eprintln!("interrupted");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(3)
        }
    }
}

fn run(args: &Args) -> resolute::Result<SaturationResult> {
    let text = std::fs::read_to_string(&args.problem)?;
    let problem = ProblemCnf::from_json(&text)?;
    let cancel = CancellationToken::new();

    match args.mode {
        Mode::Portfolio => {
            let mut portfolio =
                Portfolio::new(&problem, Options::default(), args.time, cancel);
            portfolio.run()
        }
        Mode::Single => {
            let opts = Options {
                time_limit_deciseconds: args.time,
                ..Default::default()
            };
            let mut ctx = SliceContext::new();
            let clauses = problem.load(&mut ctx);
            let timer = SliceTimer::new(args.time, cancel);
            let (result, stats) = saturate(&mut ctx, clauses, &opts, &timer)?;
            if args.stats {
                eprintln!("{}", serde_json::to_string(&stats).unwrap_or_default());
            }
            Ok(result)
        }
    }
}
