use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use pharmaguard_core::{
    split_drug_list, validate_drug, AnalysisOptions, Analyzer, DrugValidationError,
    ReferenceTables, RiskStrategy,
};
use pharmaguard_explain::TemplateExplainer;

#[derive(Parser)]
#[command(name = "pharmaguard",
          version,
          about = "Pharmacogenomic drug risk report from an annotated VCF",
          long_about = None)]
struct Cli {
    #[clap(required = true)]
    #[clap(long = "vcf")]
    #[clap(help = "Annotated VCF file (INFO carries GENE=, STAR= or ALLELE=, PHENOTYPE=)")]
    #[clap(value_name = "VCF")]
    #[arg(value_parser = check_vcf_path)]
    vcf_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "drug")]
    #[clap(help = "Drug name, or a comma-separated list of drugs")]
    #[clap(value_name = "DRUGS")]
    drugs: String,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "tables")]
    #[clap(help = "JSON document extending the built-in reference tables")]
    #[clap(value_name = "JSON")]
    #[arg(value_parser = check_file_exists)]
    tables_path: Option<PathBuf>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "patient-id")]
    #[clap(value_name = "ID")]
    #[clap(help = "Patient identifier written to the report")]
    #[clap(default_value = pharmaguard_core::report::DEFAULT_PATIENT_ID)]
    #[arg(value_parser = check_nonempty)]
    patient_id: String,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "strategy")]
    #[clap(value_name = "STRATEGY")]
    #[clap(help = "Risk strategy (composite, phenotype or override)")]
    #[clap(default_value = "composite")]
    strategy: RiskStrategy,

    #[clap(long = "compact")]
    #[clap(help = "Print JSON on a single line")]
    compact: bool,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    verbosity: u8,
}

fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .target(env_logger::Target::Stderr)
        .init();
}

fn check_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_vcf_path(s: &str) -> Result<PathBuf, String> {
    let path = check_file_exists(s)?;
    let is_vcf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("vcf"))
        .unwrap_or(false);
    if !is_vcf {
        return Err(format!("Not a .vcf file: {}", path.display()));
    }
    Ok(path)
}

fn check_nonempty(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("Value must not be empty".to_string())
    } else {
        Ok(s.trim().to_string())
    }
}

fn load_tables(path: Option<&Path>) -> Result<&'static ReferenceTables> {
    match path {
        Some(path) => {
            let tables = ReferenceTables::from_path(path)
                .with_context(|| format!("Failed to load reference tables from {}", path.display()))?;
            Ok(tables.leak())
        }
        None => Ok(ReferenceTables::builtin()),
    }
}

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    log::info!("Running {}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let tables = load_tables(cli.tables_path.as_deref())?;

    let drugs = split_drug_list(&cli.drugs);
    if drugs.is_empty() {
        return Err(DrugValidationError::Missing.into());
    }
    let drugs = drugs
        .iter()
        .map(|drug| validate_drug(tables, drug))
        .collect::<Result<Vec<_>, _>>()?;

    let explainer = TemplateExplainer::new();
    let analyzer = Analyzer::new(tables, &explainer).with_options(AnalysisOptions {
        patient_id: cli.patient_id.clone(),
        strategy: cli.strategy,
    });

    let outcome = analyzer.parser().parse_path(&cli.vcf_path);
    if !outcome.read_ok {
        log::warn!("Could not read {}; reporting without variants", cli.vcf_path.display());
    }

    let reports = analyzer.analyze_many(&drugs, &outcome);
    let json = match (reports.as_slice(), cli.compact) {
        ([report], false) => serde_json::to_string_pretty(report),
        ([report], true) => serde_json::to_string(report),
        (all, false) => serde_json::to_string_pretty(all),
        (all, true) => serde_json::to_string(all),
    }
    .context("Failed to serialize report")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write report")?;

    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
