use clap::{CommandFactory, Parser, Subcommand};
use lifestyle_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lifestyle", version, about = "Lifestyle Execution CLI")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Task management and today's checklist
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Task log maintenance
    Logs {
        #[command(subcommand)]
        action: commands::logs::LogsAction,
    },
    /// Momentum scores
    Score(commands::score::ScoreArgs),
    /// Dashboard counters
    Dashboard(commands::dashboard::DashboardArgs),
    /// Weekly reviews
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Import a nested JSON export of goals
    Import(commands::import::ImportArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("LIFESTYLE_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let json = cli.json || config.output.json;
    let result = match cli.command {
        Commands::Goal { action } => commands::goal::run(action, json),
        Commands::Task { action } => commands::task::run(action, json),
        Commands::Logs { action } => commands::logs::run(action, json),
        Commands::Score(args) => commands::score::run(args, json),
        Commands::Dashboard(args) => commands::dashboard::run(args, json),
        Commands::Review { action } => commands::review::run(action, &config, json),
        Commands::Import(args) => commands::import::run(args, json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "lifestyle", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
