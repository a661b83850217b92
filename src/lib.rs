pub mod canonical;
pub mod cli;
pub mod data;
pub mod dataset;
pub mod error;
pub mod frequency;
pub mod io_utils;
pub mod report;
pub mod stats;
pub mod summary;
pub mod table;
pub mod tools;
pub mod vocabulary;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use serde::Serialize;

use crate::{
    canonical::{HeaderMatcher, ProcessReport},
    cli::{Cli, Commands, InputArgs, OutputArgs},
    summary::SummaryReport,
    vocabulary::Vocabulary,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_intake", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Process(args) => handle_process(&args),
        Commands::Summary(args) => handle_summary(&args),
        Commands::Canonical(args) => handle_canonical(&args),
        Commands::Tool(args) => handle_tool(&args),
        Commands::Tools => handle_tools(),
    }
}

fn read_input(args: &InputArgs) -> Result<String> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    io_utils::read_input_text(&args.input, encoding)
        .with_context(|| format!("Reading CSV input {:?}", args.input))
}

fn load_vocabulary(path: Option<&Path>) -> Result<Vocabulary> {
    match path {
        Some(path) => {
            Vocabulary::load(path).with_context(|| format!("Loading vocabulary from {path:?}"))
        }
        None => Ok(Vocabulary::hr_default()),
    }
}

fn handle_process(args: &cli::ProcessArgs) -> Result<()> {
    let csv_text = read_input(&args.input)?;
    let vocabulary = load_vocabulary(args.vocabulary.as_deref())?;
    let matcher = HeaderMatcher::new(&vocabulary, args.match_policy);
    info!(
        "Processing {:?} against {} canonical header(s) using {:?} matching",
        args.input.input,
        vocabulary.len(),
        matcher.policy()
    );
    let report = canonical::process_csv_with(&csv_text, &matcher);
    if args.output.table {
        print_process_tables(&report, &matcher);
    } else {
        print_json(&report, &args.output)?;
    }
    info!("{}", report.message);
    Ok(())
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let csv_text = read_input(&args.input)?;
    info!("Summarizing {:?}", args.input.input);
    let report = summary::get_csv_summary(&csv_text);
    if args.output.table {
        print_summary_tables(&report, args.top);
    } else {
        print_json(&report, &args.output)?;
    }
    info!("{}", report.message);
    Ok(())
}

fn handle_canonical(args: &cli::CanonicalArgs) -> Result<()> {
    let vocabulary = load_vocabulary(args.vocabulary.as_deref())?;
    let matcher = HeaderMatcher::new(&vocabulary, Default::default());
    let rows = matcher
        .entries()
        .enumerate()
        .map(|(idx, (canonical, normalized))| {
            vec![
                (idx + 1).to_string(),
                canonical.to_string(),
                normalized.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = vec![
        "#".to_string(),
        "canonical".to_string(),
        "normalized".to_string(),
    ];
    table::print_table(&headers, &rows);
    info!("Listed {} canonical header(s)", rows.len());
    Ok(())
}

fn handle_tool(args: &cli::ToolArgs) -> Result<()> {
    let csv_text = read_input(&args.input)?;
    info!("Invoking tool '{}'", args.name.name());
    let document = tools::invoke(args.name, &csv_text)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn handle_tools() -> Result<()> {
    let rows = tools::catalog()
        .into_iter()
        .map(|tool| vec![tool.name.to_string(), tool.description.to_string()])
        .collect::<Vec<_>>();
    let headers = ["name", "description"].map(String::from);
    table::print_table(&headers, &rows);
    Ok(())
}

fn print_json<T: Serialize>(report: &T, output: &OutputArgs) -> Result<()> {
    let rendered = if output.compact {
        serde_json::to_string(report)
    } else {
        serde_json::to_string_pretty(report)
    }
    .context("Serializing report")?;
    println!("{rendered}");
    Ok(())
}

fn print_process_tables(report: &ProcessReport, matcher: &HeaderMatcher) {
    let Some(info) = report.data_info.as_ref() else {
        println!("{}", report.message);
        return;
    };

    let matches = matcher.match_headers(&info.columns);
    let mut rows = Vec::with_capacity(info.columns.len());
    for (idx, column) in info.columns.iter().enumerate() {
        let (canonical, kind) = match matches.iter().find(|(matched, _)| *matched == idx) {
            Some((_, hit)) => (hit.canonical.clone(), format!("{:?}", hit.kind)),
            None => (String::new(), String::from("unmatched")),
        };
        let datatype = info.data_types.get(column).cloned().unwrap_or_default();
        rows.push(vec![column.clone(), datatype, canonical, kind]);
    }
    let headers = ["column", "type", "canonical", "match"].map(String::from);
    table::print_table(&headers, &rows);
    println!();

    let preview_rows = report
        .preview
        .iter()
        .map(|row| row.values().map(|v| v.as_display()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    table::print_table(&info.columns, &preview_rows);
}

fn print_summary_tables(report: &SummaryReport, top: usize) {
    if !report.success {
        println!("{}", report.message);
        return;
    }

    if !report.numeric_summary.is_empty() {
        let headers = ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
            .map(String::from);
        let rows = report
            .numeric_summary
            .iter()
            .map(|(column, s)| {
                vec![
                    column.clone(),
                    s.count.to_string(),
                    table::format_metric(s.mean),
                    table::format_metric(s.std),
                    table::format_metric(s.min),
                    table::format_metric(s.p25),
                    table::format_metric(s.p50),
                    table::format_metric(s.p75),
                    table::format_metric(s.max),
                ]
            })
            .collect::<Vec<_>>();
        table::print_table(&headers, &rows);
        println!();
    }

    if !report.categorical_summary.is_empty() {
        let headers = ["column", "value", "count"].map(String::from);
        let mut rows = Vec::new();
        for (column, counts) in &report.categorical_summary {
            let limit = if top == 0 { counts.len() } else { top };
            for (value, count) in counts.iter().take(limit) {
                rows.push(vec![column.clone(), value.clone(), count.to_string()]);
            }
        }
        table::print_table(&headers, &rows);
        println!();
    }

    for recommendation in &report.recommendations {
        println!("- {recommendation}");
    }
}
