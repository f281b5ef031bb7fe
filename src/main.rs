//! ADL Job CLI
//!
//! Entry point for the `adl-job` command-line tool.

use std::io::Read;
use std::path::PathBuf;
use std::process;

use adl_job::config::{ConfigFile, ConfigOverrides, EffectiveConfig};
use adl_job::job::FailureKind;
use adl_job::{submit_job, HttpAnalyticsClient, PendingJobIds, SubmitError, SubmitRequest};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "adl-job")]
#[command(about = "Submit U-SQL and Hive jobs to Data Lake Analytics", version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Path to client config file (default: ~/.config/adl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// DNS suffix of the job endpoint
    #[arg(long, global = true)]
    endpoint_suffix: Option<String>,

    /// URL scheme of the job endpoint (https or http)
    #[arg(long, global = true)]
    endpoint_scheme: Option<String>,

    /// REST api-version to request
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Pre-acquired bearer token
    #[arg(long, global = true)]
    access_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_seconds: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a job, or compile it only with --compile-only
    Submit(SubmitArgs),

    /// Show the effective client configuration
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SubmitArgs {
    /// Name of the analytics account the job is submitted under
    #[arg(long, short = 'a', visible_alias = "account-name")]
    account: String,

    /// Friendly name of the job
    #[arg(long, short = 'n')]
    name: String,

    /// Script to run, written inline ("-" reads it from stdin)
    #[arg(long)]
    script: Option<String>,

    /// Path to the script file to run
    #[arg(long)]
    script_path: Option<PathBuf>,

    /// Job type: USql or Hive
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    job_type: String,

    /// Runtime version; the service default is used when unset
    #[arg(long)]
    runtime: Option<String>,

    /// Compilation to perform: Semantic, Full or SingleBox (U-SQL only)
    #[arg(long)]
    compile_mode: Option<String>,

    /// Compile the job without running it
    #[arg(long)]
    compile_only: bool,

    /// Degree of parallelism for the job
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    degree_of_parallelism: i32,

    /// Priority from 1 (highest) to 1000 (lowest)
    #[arg(long, default_value_t = 1000, allow_negative_numbers = true)]
    priority: i32,

    /// Custom configuration for Hive jobs (repeatable)
    #[arg(long = "configuration", short = 'c', value_name = "KEY=VALUE", value_parser = parse_configuration)]
    configurations: Vec<(String, String)>,

    /// Identifier to use for the job instead of a random one
    #[arg(long = "job-id", value_name = "UUID")]
    job_ids: Vec<Uuid>,

    /// Output the job record as JSON
    #[arg(long)]
    json: bool,
}

impl SubmitArgs {
    /// Build the request; a script of `-` is read from `stdin`
    fn into_request(self, stdin: impl Read) -> Result<SubmitRequest, SubmitError> {
        let script = if self.script.as_deref() == Some("-") {
            Some(read_stdin_script(stdin)?)
        } else {
            self.script
        };

        let mut request = SubmitRequest::new(self.account, self.name, self.job_type)
            .compile_only(self.compile_only)
            .with_degree_of_parallelism(self.degree_of_parallelism)
            .with_priority(self.priority);
        request.script = script;
        request.script_path = self.script_path;
        request.runtime = self.runtime;
        request.compile_mode = self.compile_mode;
        request.configurations = self.configurations.into_iter().collect();
        Ok(request)
    }
}

fn parse_configuration(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn read_stdin_script(mut stdin: impl Read) -> Result<String, SubmitError> {
    let mut script = String::new();
    stdin
        .read_to_string(&mut script)
        .map_err(|e| SubmitError::ScriptRead {
            path: PathBuf::from("<stdin>"),
            source: e,
        })?;
    Ok(script)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Submit(args) => {
            run_submit(&cli.connection, args);
        }
        Commands::Config { json } => {
            run_config(&cli.connection, json);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(connection: &ConnectionArgs) -> EffectiveConfig {
    let file = match connection.config {
        Some(ref path) => ConfigFile::Explicit(path.clone()),
        None => ConfigFile::default_location(),
    };
    let cli = ConfigOverrides {
        scheme: connection.endpoint_scheme.clone(),
        endpoint_suffix: connection.endpoint_suffix.clone(),
        api_version: connection.api_version.clone(),
        access_token: connection.access_token.clone(),
        timeout_seconds: connection.timeout_seconds,
    };

    let result = ConfigOverrides::from_process_env()
        .and_then(|env| EffectiveConfig::build(&file, &env, &cli));
    match result {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(FailureKind::Config.exit_code());
        }
    }
}

/// Build and check the request before any configuration is loaded
fn prepare_request(args: SubmitArgs, stdin: impl Read) -> Result<SubmitRequest, SubmitError> {
    let request = args.into_request(stdin)?;
    request.validate()?;
    Ok(request)
}

fn run_submit(connection: &ConnectionArgs, args: SubmitArgs) {
    let json_output = args.json;
    let mut ids = PendingJobIds::from(args.job_ids.clone());

    let request = match prepare_request(args, std::io::stdin()) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    let effective = load_config(connection);
    let client = match HttpAnalyticsClient::new(effective.config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating client: {}", e);
            process::exit(FailureKind::Config.exit_code());
        }
    };

    let submission = match submit_job(&request, &mut ids, &client) {
        Ok(submission) => submission,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if json_output {
        match submission.job.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", submission.to_human());
    }
}

fn run_config(connection: &ConnectionArgs, json_output: bool) {
    let effective = load_config(connection);

    if json_output {
        match serde_json::to_string_pretty(&effective.to_redacted_value()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", effective.to_human());
    }
}
