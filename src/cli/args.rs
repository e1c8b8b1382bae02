//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Render a Markdown-assembled personal page
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: folio.toml, searched upward from --root, or cwd)
    #[arg(short = 'C', long, global = true, default_value = "folio.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Site root directory (default: directory of the config file)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load every content slot and write the resulting page
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Serve the site, rendering the page on every request
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Reload the browser when site files change
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Check that every slot source loads and every sidebar link has a target
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Output file (relative to the site root)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Fetch sources from this origin instead of the site root.
    ///
    /// Example: render against the deployed site:
    ///   folio render --base-url "https://example.github.io"
    #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,
}

/// Validate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Treat validation failures as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_render(&self) -> bool {
        matches!(self.command, Commands::Render { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_validate(&self) -> bool {
        matches!(self.command, Commands::Validate { .. })
    }
}
