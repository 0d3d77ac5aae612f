use clap::Parser;

use release_notes_sync::config::{self, Credentials};
use release_notes_sync::git::Git2Client;
use release_notes_sync::runlog::RunLog;
use release_notes_sync::transform::ChatTransformer;
use release_notes_sync::workflow::{self, SyncOptions, SyncOutcome};

#[derive(clap::Parser)]
#[command(
    name = "release-notes-sync",
    about = "Sync release notes from GitLab to a GitHub docs repository through an LLM rewrite"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        env = "INPUT_TAG",
        help = "Explicit release tag to sync (defaults to the latest release)"
    )]
    tag: Option<String>,

    #[arg(
        long,
        env = "CREATE_PR",
        default_value = "true",
        value_parser = parse_bool_flag,
        action = clap::ArgAction::Set,
        help = "Open a pull request instead of pushing the default branch"
    )]
    create_pr: bool,

    #[arg(long, help = "Run log file path (overrides configuration)")]
    log_file: Option<String>,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

// "true" in any casing enables; anything else disables.
fn parse_bool_flag(raw: &str) -> Result<bool, String> {
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("release-notes-sync {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    config.apply_env_overrides();

    let log_path = args.log_file.as_deref().unwrap_or(&config.run.log_file);
    let log = match RunLog::create(log_path) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Error creating run log '{}': {}", log_path, e);
            std::process::exit(1);
        }
    };

    // Credentials gate: nothing touches the network before this passes.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            log.error(&e.to_string());
            for (name, present) in Credentials::presence() {
                log.error(&format!("  {}: {}", name, if present { "✓" } else { "✗" }));
            }
            std::process::exit(1);
        }
    };

    let options = SyncOptions {
        tag_override: args.tag.clone(),
        create_pr: args.create_pr,
    };

    if let Err(e) = run(&config, &credentials, &options, &log) {
        log.error(&format!("{:?}", anyhow::Error::from(e)));
        std::process::exit(1);
    }
}

fn run(
    config: &config::Config,
    credentials: &Credentials,
    options: &SyncOptions,
    log: &RunLog,
) -> release_notes_sync::Result<()> {
    let transformer = ChatTransformer::new(
        &config.transform.api_base,
        &credentials.drun_api_key,
        &config.transform.model,
    )?;
    let git = Git2Client::new(&credentials.github_token);

    match workflow::run_sync(config, credentials, options, &transformer, &git, log)? {
        SyncOutcome::Updated { tag } => {
            log.success(&format!("Task completed successfully for {}", tag));
        }
        SyncOutcome::NoChange { tag } => {
            log.warn(&format!("Task completed for {}, nothing to update", tag));
        }
    }

    Ok(())
}
