use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use modelrace::input::enrichment::{load_enrichment, merge_enrichment};
use modelrace::input::load_batch;
use modelrace::input::ranks::{apply_global_ranks, load_global_ranks};
use modelrace::logging;
use modelrace::model::profile::ScoringProfile;
use modelrace::pipeline::stage2_participation::run_stage2;
use modelrace::pipeline::stage3_bounds::run_stage3;
use modelrace::pipeline::stage4_scores::run_stage4;
use modelrace::pipeline::stage5_aggregate::{run_stage5, team_scoreboard};
use modelrace::pipeline::stage6_history::{
    append_record, build_history_record, current_timestamp, load_latest_record,
};
use modelrace::pipeline::stage7_report::{MODEL_COL_EXTRA, Stage7Input, write_reports};
use modelrace::report::json::render_scoreboard_json;
use modelrace::report::round2;
use modelrace::report::text::render_table;

#[derive(Debug, Parser)]
#[command(name = "modelrace", version, about = "US vs CN model leaderboard scoring and history")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a scrape batch, write exports and optionally append to history.
    Score(ScoreArgs),
    /// Print the top-N team scoreboard of the newest history record.
    Scoreboard(ScoreboardArgs),
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// Scrape batch JSON (`.gz` accepted).
    #[arg(long)]
    input: PathBuf,

    /// Directory for CSV/JSON/text exports.
    #[arg(long)]
    out: PathBuf,

    /// Detail-page metadata to merge by model name.
    #[arg(long)]
    enrichment: Option<PathBuf>,

    /// `{model name: global rank}` from the unfiltered leaderboard.
    #[arg(long)]
    global_ranks: Option<PathBuf>,

    #[arg(long, default_value = "models.json")]
    history: PathBuf,

    /// Back up the history document and prepend this run as a new record.
    ///
    /// Stored scores are the final, globally normalized values. Records
    /// written from unnormalized scores are on a different scale and should
    /// not be compared row for row with these.
    #[arg(long)]
    write_history: bool,

    #[arg(long, default_value_t = 36)]
    max_col_width: usize,
}

#[derive(Debug, Args)]
struct ScoreboardArgs {
    #[arg(long, default_value = "models.json")]
    history: PathBuf,

    #[arg(long)]
    top: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let profile = ScoringProfile::v1();
    match cli.command {
        Command::Score(args) => run_score(&args, &profile),
        Command::Scoreboard(args) => run_scoreboard(&args, &profile),
    }
}

fn run_score(args: &ScoreArgs, profile: &ScoringProfile) -> Result<(), String> {
    let mut bundle = load_batch(&args.input, profile).map_err(|e| e.to_string())?;

    if let Some(path) = &args.enrichment {
        let records = load_enrichment(path).map_err(|e| e.to_string())?;
        let merged = merge_enrichment(&mut bundle.entries, &records);
        tracing::info!(merged, "enrichment merged");
    }
    if let Some(path) = &args.global_ranks {
        let ranks = load_global_ranks(path).map_err(|e| e.to_string())?;
        let ranked = apply_global_ranks(&mut bundle.entries, &ranks);
        tracing::info!(ranked, total = bundle.entries.len(), "global ranks applied");
    }

    let participation = run_stage2(&bundle.entries, &bundle.benchmark_headers);
    let ctx = run_stage3(
        &bundle.entries,
        &bundle.benchmark_headers,
        &participation,
        profile,
    );
    tracing::info!(
        benchmarks = bundle.benchmark_headers.len(),
        qualifying = ctx.qualifying.len(),
        max_participation = ctx.max_participation,
        "normalization context built"
    );

    let stage4 = run_stage4(bundle.entries, &ctx, profile);
    let summary = run_stage5(&stage4.scored, profile.cohort_top_n);
    for a in &summary.aggregates {
        tracing::info!(
            cohort = %a.cohort,
            models = a.model_count,
            total_unified = round2(a.total_unified),
            avg_unified = round2(a.avg_unified),
            "cohort aggregate"
        );
    }

    let input = Stage7Input {
        scored: &stage4.scored,
        headers: &bundle.headers,
        summary: &summary,
        max_col_width: args.max_col_width,
    };
    write_reports(&input, &args.out).map_err(|e| e.to_string())?;

    println!(
        "{}",
        render_table(
            "Top Models (US + CN) by Unified Score",
            &stage4.scored,
            args.max_col_width,
            MODEL_COL_EXTRA,
        )
    );

    if args.write_history {
        let record = build_history_record(&stage4.scored, &bundle.headers, current_timestamp());
        let outcome =
            append_record(&args.history, &record, Utc::now()).map_err(|e| e.to_string())?;
        tracing::info!(
            timestamp = %record.timestamp,
            records = outcome.history_len,
            "history updated"
        );
    }

    Ok(())
}

fn run_scoreboard(args: &ScoreboardArgs, profile: &ScoringProfile) -> Result<(), String> {
    let record = load_latest_record(&args.history)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no history entries in {}", args.history.display()))?;
    let board = team_scoreboard(&record, args.top.unwrap_or(profile.scoreboard_top_n));
    let json = render_scoreboard_json(&board).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
