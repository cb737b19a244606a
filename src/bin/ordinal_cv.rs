//! ordinal_cv — compare the ordinal model with a multinomial baseline under
//! repeated stratified cross-validation.
//!
//! Usage: `ordinal_cv <DATA> [--n-splits 50] [--test-size 0.25] [--seed 0]
//! [--centering global|per-column|none] [--max-iter 5000]
//! [--line-search more-thuente|hager-zhang] [--sequential] [--verbose]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`). `--verbose` adds the
//! solver's starting state at `debug` level and, with the `obs_slog`
//! feature, per-iteration argmin output.
use clap::{Parser, ValueEnum};
use rust_ordinal::{
    evaluation::{
        baseline::BaselineOptions,
        cross_validation::{CvOptions, CvReport, FoldScore, cross_validate},
        errors::EvalResult,
        loader::{Centering, load_table},
        split::StratifiedShuffleSplit,
    },
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    ordinal::core::options::OrdinalOptions,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ordinal_cv")]
#[command(about = "Cross-validate ordinal logistic regression against a multinomial baseline", long_about = None)]
struct Cli {
    /// Whitespace-delimited table; the last column is the label.
    data: PathBuf,
    #[arg(long = "n-splits", default_value_t = 50)]
    n_splits: usize,
    #[arg(long = "test-size", default_value_t = 0.25)]
    test_size: f64,
    #[arg(long = "seed", default_value_t = 0)]
    seed: u64,
    #[arg(long = "centering", value_enum, default_value_t = CenteringArg::Global)]
    centering: CenteringArg,
    #[arg(long = "max-iter", default_value_t = 5000)]
    max_iter: usize,
    #[arg(long = "line-search", value_enum, default_value_t = LineSearchArg::MoreThuente)]
    line_search: LineSearchArg,
    /// Run folds one after another instead of on the thread pool.
    #[arg(long = "sequential", default_value_t = false)]
    sequential: bool,
    /// Log solver starting states and, with `obs_slog`, every iteration.
    #[arg(long = "verbose", default_value_t = false)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CenteringArg {
    Global,
    PerColumn,
    None,
}

impl From<CenteringArg> for Centering {
    fn from(arg: CenteringArg) -> Self {
        match arg {
            CenteringArg::Global => Centering::GlobalScalar,
            CenteringArg::PerColumn => Centering::PerColumn,
            CenteringArg::None => Centering::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LineSearchArg {
    MoreThuente,
    HagerZhang,
}

impl From<LineSearchArg> for LineSearcher {
    fn from(arg: LineSearchArg) -> Self {
        match arg {
            LineSearchArg::MoreThuente => LineSearcher::MoreThuente,
            LineSearchArg::HagerZhang => LineSearcher::HagerZhang,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let opts = build_options(&cli).map_err(|e| e.to_string())?;
    let table = load_table(&cli.data, cli.centering.into()).map_err(|e| e.to_string())?;
    println!(
        "{}: {} samples, {} features",
        cli.data.display(),
        table.n_samples(),
        table.n_features()
    );

    let report = cross_validate(table.x.view(), &table.y, &opts).map_err(|e| e.to_string())?;
    print_report(&report);
    Ok(())
}

fn build_options(cli: &Cli) -> EvalResult<CvOptions> {
    let tols = Tolerances::new(Some(1e-6), Some(1e-12), Some(cli.max_iter))?;
    let mle_opts = MLEOptions::new(tols, cli.line_search.into(), cli.verbose, None)?;
    Ok(CvOptions {
        split: StratifiedShuffleSplit::new(cli.n_splits, cli.test_size, cli.seed)?,
        ordinal: OrdinalOptions::with_mle_opts(mle_opts.clone()),
        baseline: BaselineOptions::new(1.0, mle_opts)?,
        parallel: !cli.sequential,
    })
}

fn format_score(score: &EvalResult<FoldScore>) -> String {
    match score {
        Ok(s) if s.converged => format!("{:.4}", s.accuracy),
        Ok(s) => format!("{:.4} (not converged)", s.accuracy),
        Err(e) => format!("failed: {e}"),
    }
}

fn format_mean(mean: Option<f64>, failures: usize) -> String {
    match mean {
        Some(m) => format!("{m:.4} ({failures} failed folds)"),
        None => format!("n/a ({failures} failed folds)"),
    }
}

fn print_report(report: &CvReport) {
    for fold in &report.folds {
        println!(
            "fold {:>3}  train {:>5}  test {:>5}  ordinal {}  baseline {}",
            fold.fold,
            fold.n_train,
            fold.n_test,
            format_score(&fold.ordinal),
            format_score(&fold.baseline)
        );
    }
    println!("mean ordinal accuracy:  {}", format_mean(report.mean_ordinal(), report.ordinal_failures()));
    println!("mean baseline accuracy: {}", format_mean(report.mean_baseline(), report.baseline_failures()));
}
