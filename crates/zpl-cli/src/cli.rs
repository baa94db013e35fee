//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ZPL label viewer
#[derive(Parser, Debug)]
#[command(name = "zpl", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, env = zpl::CONFIG_ENV)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a ZPL file to PNG
    Render {
        /// ZPL file
        file: PathBuf,

        /// Output file, defaults to the input name with a `.png` extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render every label, numbering the output files
        #[arg(long)]
        all: bool,
    },

    /// Print the commands of a ZPL file
    Parse {
        /// ZPL file
        file: PathBuf,

        /// Print JSON instead of debug output
        #[arg(long)]
        json: bool,

        /// Print the interpreted labels instead of the commands
        #[arg(long)]
        label: bool,
    },

    /// Check bundled assets
    Assets {
        #[command(subcommand)]
        action: AssetsAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `assets` subcommands.
#[derive(Subcommand, Debug)]
pub enum AssetsAction {
    /// Verify that the project and font license files are in place
    Check {
        /// Repository root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Where to write it instead of the resolved path
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a value by dotted key, e.g. `render.dpmm`
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_config_reads_environment() {
        let command = Args::command();
        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env(), Some(std::ffi::OsStr::new("ZPL_CONFIG")));
    }

    #[test]
    fn test_render_args() {
        let args = Args::try_parse_from(["zpl", "render", "label.zpl", "-o", "out.png", "--all"])
            .unwrap();
        let Command::Render { file, output, all } = args.command else {
            unreachable!("expected render command");
        };
        assert_eq!(file, PathBuf::from("label.zpl"));
        assert_eq!(output, Some(PathBuf::from("out.png")));
        assert!(all);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["zpl", "config", "get", "render.dpmm", "-v", "-c", "my.toml"])
                .unwrap();
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("my.toml"));
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Get { .. }
            }
        ));
    }

    #[test]
    fn test_assets_check_default_root() {
        let args = Args::try_parse_from(["zpl", "assets", "check"]).unwrap();
        let Command::Assets {
            action: AssetsAction::Check { root },
        } = args.command
        else {
            unreachable!("expected assets check");
        };
        assert_eq!(root, PathBuf::from("."));
    }
}
