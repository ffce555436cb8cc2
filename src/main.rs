use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use changes_refresh::cli::orchestration::{
    apply_plan, plan_refresh, RefreshWorkflowArgs, TarballSource,
};
use changes_refresh::clock::SystemClock;
use changes_refresh::config::{self, Config};
use changes_refresh::tarball::ArchiveTarballProvider;
use changes_refresh::ui;

#[derive(clap::Parser)]
#[command(
    name = "changes-refresh",
    version,
    about = "Refresh a package's spec and changes files from a new upstream tarball"
)]
struct Args {
    #[arg(help = "Package name; selects <package>.spec and <package>.changes")]
    package: String,

    #[arg(short, long, default_value = ".", help = "Directory holding the spec and changes files")]
    dir: PathBuf,

    #[arg(short, long, conflicts_with = "url", help = "Local upstream tarball")]
    tarball: Option<PathBuf>,

    #[arg(short, long, help = "Download the upstream tarball from this URL")]
    url: Option<String>,

    #[arg(short, long, help = "Email for the changes entry")]
    email: Option<String>,

    #[arg(long, help = "Regex with one capture group extracting the upstream version")]
    version_regex: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn workflow_args(args: &Args, config: &Config) -> Result<RefreshWorkflowArgs> {
    let tarball = if let Some(path) = &args.tarball {
        TarballSource::Local(path.clone())
    } else if let Some(url) = &args.url {
        TarballSource::Remote(url.clone())
    } else if let Some(url) = config.tarball_url_for(&args.package) {
        TarballSource::Remote(url)
    } else {
        return Err(anyhow!(
            "No tarball given: pass --tarball or --url, or set tarball_url in {}",
            config::CONFIG_FILE_NAME
        ));
    };

    let author_email = args
        .email
        .clone()
        .or_else(|| config.author_email.clone())
        .ok_or_else(|| {
            anyhow!(
                "No author email: pass --email or set author_email in {}",
                config::CONFIG_FILE_NAME
            )
        })?;

    Ok(RefreshWorkflowArgs {
        dir: args.dir.clone(),
        spec_path: config.files.spec_path(&args.dir, &args.package),
        changes_path: config.files.changes_path(&args.dir, &args.package),
        tarball,
        author_email,
        version_regex: args
            .version_regex
            .clone()
            .unwrap_or_else(|| config.version_regex.clone()),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let workflow = match workflow_args(&args, &config) {
        Ok(workflow) => workflow,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::display_status(&format!("Refreshing {}...", args.package));
    let plan = match plan_refresh(&workflow, &ArchiveTarballProvider, &SystemClock) {
        Ok(plan) => plan,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    for warning in &plan.warnings {
        ui::display_boundary_warning(warning);
    }

    if !plan.new_commits.is_empty() {
        ui::display_new_commits(&plan.new_commits, &args.package);
    }
    ui::display_version_change(&plan.previous_version, &plan.new_version.to_string());

    if args.dry_run {
        if let Some(entry) = &plan.changes_entry {
            ui::display_entry_preview(entry);
        }
        ui::display_status("Dry run: no files written");
        return Ok(());
    }

    if plan.is_ambiguous()
        && !args.force
        && !ui::confirm_action(&format!(
            "List all {} ChangeLog commits in the changes entry?",
            plan.new_commits.len()
        ))?
    {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    match apply_plan(&plan) {
        Ok(result) => {
            ui::display_success(&format!(
                "Updated {} to version {}",
                result.spec_path.display(),
                result.version
            ));
            if result.changes_written {
                ui::display_success(&format!("Prepended entry to {}", plan.changes_path.display()));
            }
        }
        Err(e) => {
            ui::display_error(&format!("Failed to write package files: {}", e));
            std::process::exit(1);
        }
    }

    Ok(())
}
