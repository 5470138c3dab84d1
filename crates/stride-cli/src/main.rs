mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{
    checklist::ChecklistSubcommand, component::ComponentSubcommand, flow::FlowSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stride",
    about = "STRIDE-per-element discussion guide — describe your system, then brainstorm what attackers might try",
    version,
    propagate_version = true
)]
struct Cli {
    /// Threat model file
    #[arg(
        long,
        global = true,
        env = "STRIDE_MODEL",
        default_value = "threat-model.yaml"
    )]
    model: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold an empty threat model and a default PR checklist
    Init,

    /// List the trait catalog
    Traits,

    /// Manage components
    Component {
        #[command(subcommand)]
        subcommand: ComponentSubcommand,
    },

    /// Manage data flows between components
    Flow {
        #[command(subcommand)]
        subcommand: FlowSubcommand,
    },

    /// Generate the discussion guide from the current model
    Topics {
        /// Group topics by STRIDE category instead of model order
        #[arg(long)]
        group_by_kind: bool,

        /// Print topic labels only
        #[arg(long)]
        labels_only: bool,
    },

    /// Work with a PR checklist document
    Checklist {
        #[command(subcommand)]
        subcommand: ChecklistSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&cli.model),
        Commands::Traits => cmd::traits::run(cli.json),
        Commands::Component { subcommand } => cmd::component::run(&cli.model, subcommand, cli.json),
        Commands::Flow { subcommand } => cmd::flow::run(&cli.model, subcommand, cli.json),
        Commands::Topics {
            group_by_kind,
            labels_only,
        } => cmd::topics::run(&cli.model, group_by_kind, labels_only, cli.json),
        Commands::Checklist { subcommand } => cmd::checklist::run(subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
