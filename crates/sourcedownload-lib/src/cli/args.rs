use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch {
        config_path: Option<String>,
        catalog_url: Option<String>,
        snap: String,
        revision: u32,
        download_path: Option<String>,
    },
    List {
        config_path: Option<String>,
        catalog_url: Option<String>,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "sourcedownload",
    version,
    about = "Download the snapcraft.yaml and the source packages of a snap revision from the compliance service"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file providing catalog.url and download.path",
        global = true
    )]
    config: Option<String>,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help = "The URL of the compliance service [default: https://sources.iotdevice.io]",
        global = true
    )]
    url: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Download the snapcraft.yaml and every source file of a snap revision
    Fetch {
        #[arg(
            short = 's',
            long = "snap",
            value_name = "NAME",
            help = "The name of the snap to process"
        )]
        snap: String,

        #[arg(
            short = 'r',
            long = "revision",
            value_name = "N",
            help = "The revision of the snap to process"
        )]
        revision: u32,

        #[arg(
            short = 'p',
            long = "path",
            value_name = "DIR",
            help = "Location to store the download files [default: download]"
        )]
        path: Option<String>,
    },

    /// List the snaps and revisions available in the catalog
    List,
}

fn command_from_cli(cli: Cli) -> Command {
    match cli.command {
        CliCommand::Fetch {
            snap,
            revision,
            path,
        } => Command::Fetch {
            config_path: cli.config,
            catalog_url: cli.url,
            snap,
            revision,
            download_path: path,
        },
        CliCommand::List => Command::List {
            config_path: cli.config,
            catalog_url: cli.url,
        },
    }
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries the listing; logs and progress go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=warn".parse().unwrap()),
        )
        .init();

    Args {
        command: command_from_cli(cli),
        log_level,
    }
}
