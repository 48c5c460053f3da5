//! trialsort — organize per-trial FMA hand recordings into the training tree.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trialsort_core::OrganizerConfig;
use trialsort_organize::{CohortKind, Organizer};

mod report;

#[derive(Debug, Parser)]
#[command(name = "trialsort", version)]
#[command(about = "Copy FMA trial recordings into subject/task/trial layout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Copy recordings into the destination tree
    Run(RunArgs),
    /// Show what `run` would copy without touching the disk
    Plan(RunArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CohortArg {
    Hs,
    Sp,
}

impl From<CohortArg> for CohortKind {
    fn from(arg: CohortArg) -> Self {
        match arg {
            CohortArg::Hs => CohortKind::Healthy,
            CohortArg::Sp => CohortKind::Patient,
        }
    }
}

#[derive(Debug, Args)]
struct RunArgs {
    /// JSON configuration file
    #[arg(long, short, env = "TRIALSORT_CONFIG")]
    config: PathBuf,

    /// Limit the run to these cohorts (default: every configured cohort)
    #[arg(long, value_enum)]
    cohort: Vec<CohortArg>,

    /// Override the destination root
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Replace files that already exist at the destination
    #[arg(long)]
    overwrite: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    /// Fold command-line overrides into a loaded configuration.
    fn apply(&self, config: &mut OrganizerConfig, dry_run: bool) {
        if let Some(dest) = &self.destination {
            config.destination = dest.clone();
        }
        if self.overwrite {
            config.overwrite = true;
        }
        config.dry_run = dry_run;

        if !self.cohort.is_empty() {
            let wanted: Vec<CohortKind> = self.cohort.iter().map(|&c| c.into()).collect();
            if !wanted.contains(&CohortKind::Healthy) {
                config.healthy = None;
            }
            if !wanted.contains(&CohortKind::Patient) {
                config.patient = None;
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (args, dry_run) = match &cli.command {
        Command::Run(args) => (args, false),
        Command::Plan(args) => (args, true),
    };

    let mut config = OrganizerConfig::load(&args.config)?;
    args.apply(&mut config, dry_run);
    config.validate()?;

    info!(
        "Destination: {} (overwrite: {}, dry run: {})",
        config.destination.display(),
        config.overwrite,
        config.dry_run
    );

    let organizer = Organizer::new(config)?;
    let report = organizer.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::format_report(&report, dry_run));
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialsort_core::CohortConfig;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn full_config() -> OrganizerConfig {
        let mut config = OrganizerConfig::new("/out");
        config.healthy = Some(CohortConfig::new("/hs"));
        config.patient = Some(CohortConfig::new("/sp"));
        config
    }

    #[test]
    fn test_plan_sets_dry_run() {
        let cli = parse(&["trialsort", "plan", "--config", "c.json"]);
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        let mut config = full_config();
        args.apply(&mut config, true);
        assert!(config.dry_run);
        assert!(config.healthy.is_some() && config.patient.is_some());
    }

    #[test]
    fn test_cohort_filter_and_overrides() {
        let cli = parse(&[
            "trialsort",
            "run",
            "-c",
            "c.json",
            "--cohort",
            "sp",
            "--destination",
            "/elsewhere",
            "--overwrite",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let mut config = full_config();
        args.apply(&mut config, false);
        assert!(config.healthy.is_none());
        assert!(config.patient.is_some());
        assert_eq!(config.destination, PathBuf::from("/elsewhere"));
        assert!(config.overwrite);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_unknown_cohort_rejected() {
        assert!(Cli::try_parse_from(["trialsort", "run", "-c", "c.json", "--cohort", "xx"]).is_err());
    }

    #[test]
    fn test_run_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let hs = dir.path().join("hs/VV/Score2");
        std::fs::create_dir_all(&hs).unwrap();
        std::fs::write(hs.join("FMA21_VR_03_15_2024_10_30_00.csv"), b"x").unwrap();

        let config_path = dir.path().join("trialsort.json");
        let body = serde_json::json!({
            "destination": dir.path().join("out"),
            "healthy": { "source": dir.path().join("hs") },
        });
        std::fs::write(&config_path, body.to_string()).unwrap();

        let config = OrganizerConfig::load(&config_path).unwrap();
        config.validate().unwrap();
        let report = Organizer::new(config).unwrap().run().unwrap();
        assert_eq!(report.copied, 1);
        assert!(dir
            .path()
            .join("out/HS_data/VV/FMA21/VV_FMA21_VR_Tendency_FT28=S2_Trial1_03_15_2024_10_30_00.csv")
            .exists());
    }
}
