use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use splancli::{cli, config, error, types::PkceToken, utils};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List your playlists
    Playlists,

    /// Analyze a playlist or your Liked Songs
    Analyze(AnalyzeOptions),

    /// Shuffle a playlist in place
    Shuffle(ShuffleOptions),

    /// Copy the first half of your Liked Songs into a new playlist
    Duplicate,

    /// Recommend tracks seeded from a playlist or your Liked Songs
    Recommend(RecommendOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeOptions {
    /// Playlist number from `splancli playlists`, or 'liked'
    #[clap(value_parser = utils::parse_selection)]
    pub selection: utils::Selection,

    /// Write the analysis to a JSON file
    #[clap(long)]
    pub export: bool,

    /// Output path for --export (defaults to a timestamped filename)
    #[clap(long, requires = "export")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShuffleOptions {
    /// Playlist number from `splancli playlists`
    #[clap(value_parser = utils::parse_selection)]
    pub selection: utils::Selection,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Playlist number from `splancli playlists`, or 'liked'
    #[clap(value_parser = utils::parse_selection)]
    pub selection: utils::Selection,

    /// Number of recommendations to request
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Playlists => cli::list_playlists().await,
        Command::Analyze(opt) => cli::analyze(opt.selection, opt.export, opt.output).await,
        Command::Shuffle(opt) => cli::shuffle(opt.selection).await,
        Command::Duplicate => cli::duplicate_liked().await,
        Command::Recommend(opt) => cli::recommend(opt.selection, opt.limit).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
