use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod colors;
mod commands;
mod config;
mod environment;
mod format;
mod jenkins;
mod mcp;
mod normalize;
mod secrets;
mod session;
#[cfg(test)]
mod test_support;

use commands::mcp::Editor;
use session::Overrides;

/// Exit status after Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

/// jenkins - Command-line client for Jenkins
#[derive(Parser)]
#[command(
    name = "jenkins",
    version,
    about = "Command-line client and MCP server for Jenkins",
    long_about = "Talks to a Jenkins server over its JSON API using a username and API token.\n\nRun '$ jenkins configure <url>' once to store the URL in your config directory and the token in the system keyring. JENKINS_URL, JENKINS_USER and JENKINS_TOKEN override the stored values; --url and --user override both."
)]
struct Cli {
    /// Jenkins URL, overriding JENKINS_URL and the saved configuration
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    /// Jenkins username, overriding JENKINS_USER and the saved configuration
    #[arg(long, global = true, value_name = "USER")]
    user: Option<String>,

    /// Log more to stderr (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the Jenkins URL and username, and store an API token
    ///
    /// Prints where to create a token, then reads it without echo (or from
    /// stdin when piped). The URL and username go to config.json in your
    /// config directory; the token goes to the system keyring.
    ///
    /// Example: jenkins configure https://ci.example.com alice
    /// Example: jenkins configure ci.example.com --path /jenkins
    Configure {
        /// Jenkins URL, or host when --path is given
        #[arg(value_name = "URL")]
        jenkins_url: String,
        /// Jenkins username (defaults to 'admin' when not saved)
        username: Option<String>,
        /// Context path Jenkins is served under, e.g. /jenkins
        #[arg(long, value_name = "PATH")]
        path: Option<String>,
    },

    /// List all jobs with their status and URL
    ///
    /// Example: jenkins list-jobs
    #[command(name = "list-jobs")]
    ListJobs,

    /// Show details of a job
    ///
    /// Jobs inside folders are addressed as 'folder/job/name'.
    ///
    /// Example: jenkins get-job team/job/api
    #[command(name = "get-job")]
    GetJob {
        /// Name of the job
        #[arg(value_parser = jenkins::parse_job_name)]
        job_name: String,
    },

    /// Trigger a build of a job
    ///
    /// Example: jenkins build-job deploy
    #[command(name = "build-job")]
    BuildJob {
        /// Name of the job
        #[arg(value_parser = jenkins::parse_job_name)]
        job_name: String,
    },

    /// Show details of a build
    ///
    /// Example: jenkins get-build api 42
    #[command(name = "get-build")]
    GetBuild {
        /// Name of the job
        #[arg(value_parser = jenkins::parse_job_name)]
        job_name: String,
        /// Build number
        #[arg(value_parser = jenkins::parse_build_number)]
        build_number: u64,
    },

    /// Print the console output of a build
    ///
    /// Example: jenkins get-build-log api 42
    #[command(name = "get-build-log")]
    GetBuildLog {
        /// Name of the job
        #[arg(value_parser = jenkins::parse_job_name)]
        job_name: String,
        /// Build number
        #[arg(value_parser = jenkins::parse_build_number)]
        build_number: u64,
    },

    /// Show details of the most recent build of a job
    ///
    /// Example: jenkins get-last-build api
    #[command(name = "get-last-build")]
    GetLastBuild {
        /// Name of the job
        #[arg(value_parser = jenkins::parse_job_name)]
        job_name: String,
    },

    /// Start the MCP server on stdio, or write editor configs for it
    ///
    /// Without flags, serves list_jobs, get_job, get_build and get_build_log
    /// over stdin/stdout. With an --init-* flag, writes that editor's MCP
    /// config in the current directory instead.
    ///
    /// Example: jenkins mcp-server
    /// Example: jenkins mcp-server --init-cursor
    #[command(name = "mcp-server")]
    McpServer {
        /// Write .cursor/mcp.json
        #[arg(long)]
        init_cursor: bool,
        /// Write .vscode/mcp.json
        #[arg(long)]
        init_vscode: bool,
        /// Write .mcp.json for Claude
        #[arg(long)]
        init_claude: bool,
    },

    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), String> {
    let overrides = Overrides {
        url: cli.url,
        username: cli.user,
    };

    match cli.command {
        Commands::Configure {
            jenkins_url,
            username,
            path,
        } => {
            let username = configure_username(&overrides, username)?;
            commands::configure::execute(&jenkins_url, username.as_deref(), path.as_deref())
                .await
        }
        Commands::ListJobs => {
            let client = commands::connect(&overrides)?;
            commands::list_jobs::execute(&client).await
        }
        Commands::GetJob { job_name } => {
            let client = commands::connect(&overrides)?;
            commands::get_job::execute(&client, &job_name).await
        }
        Commands::BuildJob { job_name } => {
            let client = commands::connect(&overrides)?;
            commands::build_job::execute(&client, &job_name).await
        }
        Commands::GetBuild {
            job_name,
            build_number,
        } => {
            let client = commands::connect(&overrides)?;
            commands::get_build::execute(&client, &job_name, build_number).await
        }
        Commands::GetBuildLog {
            job_name,
            build_number,
        } => {
            let client = commands::connect(&overrides)?;
            commands::get_build_log::execute(&client, &job_name, build_number).await
        }
        Commands::GetLastBuild { job_name } => {
            let client = commands::connect(&overrides)?;
            commands::get_last_build::execute(&client, &job_name).await
        }
        Commands::McpServer {
            init_cursor,
            init_vscode,
            init_claude,
        } => {
            let editors: Vec<Editor> = [
                (init_cursor, Editor::Cursor),
                (init_vscode, Editor::Vscode),
                (init_claude, Editor::Claude),
            ]
            .into_iter()
            .filter_map(|(requested, editor)| requested.then_some(editor))
            .collect();
            commands::mcp::execute(&overrides, &editors).await
        }
        Commands::Unknown(args) => Err(unknown_subcommand(&args)),
    }
}

/// Username saved by `configure`: the positional argument, else `--user`.
///
/// `--url` is refused because the URL to save is the positional argument.
fn configure_username(
    overrides: &Overrides,
    username: Option<String>,
) -> Result<Option<String>, String> {
    if overrides.url.is_some() {
        return Err(
            "--url cannot be used with configure, pass the URL as its first argument".to_string(),
        );
    }
    Ok(username.or_else(|| overrides.username.clone()))
}

fn unknown_subcommand(args: &[String]) -> String {
    format!(
        "unknown sub-command: {}",
        args.first().map(String::as_str).unwrap_or_default()
    )
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = tokio::select! {
        result = run(cli) => match result {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("Error: {}", err);
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!();
            tracing::info!("interrupted");
            EXIT_INTERRUPTED
        }
    };

    std::process::exit(code);
}
