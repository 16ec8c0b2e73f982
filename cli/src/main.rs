use std::io::Write;

use clap::{Args, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;

use clubboard_cli::commands::{
    self, ConfigChanges, Context, LeaderboardOptions, ProfileEdit, SignUpOptions,
};
use clubboard_cli::try_readline;
use clubboard_cli::session_file::SessionFile;
use clubboard_core::AppConfig;
use clubboard_types::SortColumn;

/// Initialize logging: a daily file in CLUBBOARD_LOG_DIR if set, otherwise stderr.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(dir) = std::env::var("CLUBBOARD_LOG_DIR") {
        let appender = tracing_appender::rolling::daily(dir, "clubboard.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .init();
        return Some(guard);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    None
}

#[derive(Parser)]
#[command(name = "clubboard", version, about = "Club attendance leaderboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of the leaderboard
    Leaderboard(LeaderboardArgs),
    /// Sign in with email and password
    SignIn {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account and member profile
    SignUp {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long)]
        club: Option<String>,
    },
    SignOut,
    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Show or change settings
    Config {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        anon_key: Option<String>,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Leave interactive mode
    Exit,
}

#[derive(Args)]
struct LeaderboardArgs {
    /// Username substring
    #[arg(short, long, default_value = "")]
    search: String,
    /// Year label or code; repeat for several
    #[arg(long)]
    year: Vec<String>,
    #[arg(long)]
    major: Vec<String>,
    #[arg(long)]
    club: Vec<String>,
    /// Column name or title, e.g. `username` or "Main Club"
    #[arg(long)]
    sort: Option<SortColumn>,
    #[arg(long, conflicts_with = "descending")]
    ascending: bool,
    #[arg(long)]
    descending: bool,
    #[arg(short, long, default_value_t = 1)]
    page: u32,
}

impl From<LeaderboardArgs> for LeaderboardOptions {
    fn from(args: LeaderboardArgs) -> Self {
        let ascending = match (args.ascending, args.descending) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Self {
            search: args.search,
            years: args.year,
            majors: args.major,
            clubs: args.club,
            sort: args.sort,
            ascending,
            page: args.page,
        }
    }
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    Edit {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long)]
        club: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    let _guard = init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(command) => run(command).await,
        None => repl().await,
    }
}

/// Interactive mode: read commands until `exit` or end of input.
async fn repl() -> Result<(), String> {
    loop {
        let Some(line) = try_readline("clubboard> ")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut args = match shlex::split(line) {
            Some(args) => args,
            None => {
                println!("error: Invalid quoting");
                continue;
            }
        };
        args.insert(0, "clubboard".to_string());
        let command = match Cli::try_parse_from(args) {
            Ok(Cli { command: Some(command) }) => command,
            Ok(Cli { command: None }) => continue,
            Err(e) => {
                write!(std::io::stdout(), "{e}").map_err(|e| e.to_string())?;
                continue;
            }
        };
        if matches!(command, Commands::Exit) {
            break;
        }
        if let Err(err) = run(command).await {
            println!("{err}");
        }
        std::io::stdout().flush().map_err(|e| e.to_string())?;
    }
    Ok(())
}

async fn run(command: Commands) -> Result<(), String> {
    if let Commands::Config {
        url,
        anon_key,
        page_size,
    } = command
    {
        return commands::config(ConfigChanges {
            url,
            anon_key,
            page_size,
        });
    }
    if matches!(command, Commands::Exit) {
        return Ok(());
    }

    let config = AppConfig::load().map_err(|e| e.to_string())?;
    let session_file = SessionFile::default_location().map_err(|e| e.to_string())?;
    let ctx = Context::new(config, session_file)?;

    match command {
        Commands::Leaderboard(args) => commands::leaderboard(&ctx, &args.into()).await,
        Commands::SignIn { email } => commands::sign_in(&ctx, email).await,
        Commands::SignUp {
            username,
            email,
            year,
            major,
            club,
        } => {
            let options = SignUpOptions {
                username,
                email,
                year,
                major,
                club,
            };
            commands::sign_up(&ctx, options).await
        }
        Commands::SignOut => commands::sign_out(&ctx).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile_show(&ctx).await,
            ProfileAction::Edit {
                username,
                year,
                major,
                club,
            } => {
                let edit = ProfileEdit {
                    username,
                    year,
                    major,
                    club,
                };
                commands::profile_edit(&ctx, edit).await
            }
        },
        Commands::Config { .. } | Commands::Exit => Ok(()),
    }
}
