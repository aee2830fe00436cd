use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use lexguard_client::AnalysisClient;
use lexguard_core::{
    FeatureQuery, ProvisionQuery, RedirectReason, ReportData, ReportEntry, ReportKind, distinct,
    enter_report,
};
use lexguard_report::{export_pdf, write_feature_list, write_provision_list, write_report};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Process exit codes.
mod exit_codes {
    /// Backend unreachable or returned an error.
    pub const TRANSPORT: u8 = 1;
    /// No usable upload result; start over with `lexguard upload`.
    pub const REDIRECT: u8 = 2;
    /// The PDF could not be written.
    pub const EXPORT: u8 = 1;
}

#[derive(Parser)]
#[command(name = "lexguard", version, about = "Compliance analysis of features and laws")]
struct Cli {
    /// Base URL of the analysis backend.
    #[arg(
        long,
        global = true,
        env = "LEXGUARD_BACKEND_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    backend_url: String,

    /// Directory PDF exports are written to.
    #[arg(long, global = true, env = "LEXGUARD_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a PDF for analysis and show the compliance report.
    Upload {
        /// PDF document to analyse.
        file: PathBuf,
        /// What the document describes.
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Also save the raw analysis result, for `lexguard report`.
        #[arg(long)]
        save: Option<PathBuf>,
        /// Export the report as a PDF into --out-dir.
        #[arg(long)]
        export: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Show a report from a saved analysis result.
    Report {
        /// Raw result saved with `lexguard upload --save`.
        path: PathBuf,
        /// Export the report as a PDF into --out-dir.
        #[arg(long)]
        export: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Export a saved analysis result as a PDF without printing it.
    Export {
        /// Raw result saved with `lexguard upload --save`.
        path: PathBuf,
    },
    /// List stored features.
    Features {
        /// Case-insensitive text search.
        #[arg(long)]
        search: Option<String>,
        /// Only this feature type.
        #[arg(long = "type")]
        feature_type: Option<String>,
        /// Only this project.
        #[arg(long)]
        project: Option<String>,
        /// Also list the available types and projects.
        #[arg(long)]
        facets: bool,
    },
    /// List stored law provisions.
    Laws {
        /// Case-insensitive text search.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        law_code: Option<String>,
        /// Also list the available countries, regions and law codes.
        #[arg(long)]
        facets: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Feature,
    Law,
}

impl From<KindArg> for ReportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Feature => ReportKind::Feature,
            KindArg::Law => ReportKind::Law,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// What to do with a report once it is ready.
#[derive(Clone, Copy)]
struct ShowOptions<'a> {
    format: Option<Format>,
    export_to: Option<&'a Path>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    info!("lexguard v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let client = AnalysisClient::new(cli.backend_url);
    let out_dir = cli.out_dir;

    match cli.command {
        Command::Upload {
            file,
            kind,
            save,
            export,
            format,
        } => {
            let outcome = match client.upload(&file, kind.into()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, file = %file.display(), "upload failed");
                    eprintln!("Upload failed. Please try again. ({e})");
                    return Ok(ExitCode::from(exit_codes::TRANSPORT));
                }
            };
            eprintln!("{} uploaded, {} analysed", outcome.kind, outcome.file_name);
            if let Some(save) = &save {
                tokio::fs::write(save, &outcome.body)
                    .await
                    .with_context(|| format!("saving analysis result to {}", save.display()))?;
                info!(path = %save.display(), "saved analysis result");
            }
            let opts = ShowOptions {
                format: Some(format),
                export_to: export.then_some(out_dir.as_path()),
            };
            show(outcome.report(), opts).await
        }
        Command::Report {
            path,
            export,
            format,
        } => {
            let entry = load_saved(&path).await?;
            let opts = ShowOptions {
                format: Some(format),
                export_to: export.then_some(out_dir.as_path()),
            };
            show(entry, opts).await
        }
        Command::Export { path } => {
            let entry = load_saved(&path).await?;
            let opts = ShowOptions {
                format: None,
                export_to: Some(out_dir.as_path()),
            };
            show(entry, opts).await
        }
        Command::Features {
            search,
            feature_type,
            project,
            facets,
        } => {
            let features = match client.list_features().await {
                Ok(features) => features,
                Err(e) => {
                    error!(error = %e, "listing features failed");
                    eprintln!("Failed to load features. Please try again. ({e})");
                    return Ok(ExitCode::from(exit_codes::TRANSPORT));
                }
            };
            let query = FeatureQuery {
                search,
                feature_type,
                project,
            };
            let shown = query.apply(&features);
            let mut out = io::stdout().lock();
            write_feature_list(&mut out, &shown, features.len())?;
            if facets {
                let types = distinct(&features, |f| f.feature_type.as_str());
                let projects = distinct(&features, |f| f.project_name.as_str());
                write_facet(&mut out, "Types", &types)?;
                write_facet(&mut out, "Projects", &projects)?;
            }
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Laws {
            search,
            country,
            region,
            law_code,
            facets,
        } => {
            let provisions = match client.list_provisions().await {
                Ok(provisions) => provisions,
                Err(e) => {
                    error!(error = %e, "listing law provisions failed");
                    eprintln!("Failed to load law provisions. Please try again. ({e})");
                    return Ok(ExitCode::from(exit_codes::TRANSPORT));
                }
            };
            let query = ProvisionQuery {
                search,
                country,
                region,
                law_code,
            };
            let shown = query.apply(&provisions);
            let mut out = io::stdout().lock();
            write_provision_list(&mut out, &shown, provisions.len())?;
            if facets {
                let countries = distinct(&provisions, |p| p.country.as_str());
                let regions = distinct(&provisions, |p| p.region.as_str());
                let law_codes = distinct(&provisions, |p| p.law_code.as_str());
                write_facet(&mut out, "Countries", &countries)?;
                write_facet(&mut out, "Regions", &regions)?;
                write_facet(&mut out, "Law codes", &law_codes)?;
            }
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Enter the report view from a saved raw result. A missing file is the
/// same as having no result at all.
async fn load_saved(path: &Path) -> anyhow::Result<ReportEntry> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(enter_report(Some(&raw))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no saved analysis result");
            Ok(enter_report(None))
        }
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

async fn show(entry: ReportEntry, opts: ShowOptions<'_>) -> anyhow::Result<ExitCode> {
    let report = match entry {
        ReportEntry::Ready(report) => report,
        ReportEntry::RedirectToUpload(reason) => {
            eprintln!("{}", redirect_notice(&reason));
            return Ok(ExitCode::from(exit_codes::REDIRECT));
        }
    };

    if let Some(format) = opts.format {
        print_report(&report, format)?;
    }

    if let Some(out_dir) = opts.export_to {
        match export_pdf(&report, out_dir, today()).await {
            Ok(path) => eprintln!("Exported {}", path.display()),
            Err(e) => {
                error!(error = %e, out_dir = %out_dir.display(), "export failed");
                eprintln!("Failed to export PDF: {e}");
                return Ok(ExitCode::from(exit_codes::EXPORT));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &ReportData, format: Format) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match format {
        Format::Text => write_report(&mut out, report)?,
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(report)?)?,
    }
    out.flush()?;
    Ok(())
}

fn write_facet(out: &mut impl Write, label: &str, values: &[&str]) -> io::Result<()> {
    let values: Vec<&str> = values.iter().copied().filter(|v| !v.is_empty()).collect();
    writeln!(out, "{label}: {}", values.join(", "))
}

fn redirect_notice(reason: &RedirectReason) -> String {
    let why = match reason {
        RedirectReason::MissingResult => "No analysis result found.".to_string(),
        RedirectReason::Malformed(e) => format!("The analysis result could not be read: {e}."),
    };
    format!("{why}\nUpload a document first: lexguard upload <FILE> --kind <feature|law>")
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
