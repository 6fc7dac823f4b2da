//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Assemble a monorepo from variant-aware template roots",
    long_about = "Stencil copies a library of template roots into a new project, \
                  substituting {{placeholders}}, picking file variants for the \
                  modules you enable, and handing off to git and your package manager.",
    after_help = "EXAMPLES:\n\
        \x20 stencil new my-shop --module web --module api\n\
        \x20 stencil new my-site --module web --no-install --dry-run\n\
        \x20 stencil list --templates ./templates\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from the template library.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 stencil new my-shop --module web --module api\n\
            \x20 stencil new my-shop --all-modules --package-manager npm\n\
            \x20 stencil new ../my-shop --module web --dry-run"
    )]
    New(NewArgs),

    /// Show the modules and template roots of a library.
    #[command(
        visible_alias = "ls",
        about = "List modules and template roots",
        after_help = "EXAMPLES:\n\
            \x20 stencil list\n\
            \x20 stencil list --templates ./templates --format json"
    )]
    List(ListArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil init\n\
            \x20 stencil init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get defaults.package_manager\n\
            \x20 stencil config list\n\
            \x20 stencil config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stencil new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Enable a module (repeatable).
    #[arg(
        short = 'm',
        long = "module",
        value_name = "MODULE",
        conflicts_with = "all_modules",
        help = "Module to enable (repeatable)"
    )]
    pub modules: Vec<String>,

    /// Enable every module the blueprint declares.
    #[arg(long = "all-modules", help = "Enable every module")]
    pub all_modules: bool,

    /// Template library directory.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template library directory",
        long_help = "Template library directory. Defaults to `templates.path` from the \
                     config; a relative value is looked up in the current directory, \
                     then in the platform data directory."
    )]
    pub templates: Option<PathBuf>,

    /// Package manager used for `install`.
    #[arg(
        long = "package-manager",
        value_name = "PM",
        help = "Package manager to install dependencies with"
    )]
    pub package_manager: Option<String>,

    #[arg(long = "no-git", help = "Skip git init and the initial commit")]
    pub no_git: bool,

    #[arg(long = "no-install", help = "Skip dependency installation")]
    pub no_install: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Replace an existing non-empty directory (destructive).
    #[arg(long = "force", help = "Replace an existing directory")]
    pub force: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Template library directory.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template library directory",
        long_help = "Template library directory. Defaults to `templates.path` from the \
                     config; a relative value is looked up in the current directory, \
                     then in the platform data directory."
    )]
    pub templates: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// JSON object.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil init`.
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.package_manager`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_with_repeated_modules() {
        let cli = Cli::parse_from([
            "stencil", "new", "my-shop", "-m", "web", "--module", "api", "--no-git",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name, "my-shop");
        assert_eq!(args.modules, vec!["web", "api"]);
        assert!(args.no_git);
        assert!(!args.no_install);
    }

    #[test]
    fn modules_conflict_with_all_modules() {
        let result =
            Cli::try_parse_from(["stencil", "new", "x", "--module", "web", "--all-modules"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stencil", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["stencil", "list", "-vv"]);
        assert_eq!(cli.global.verbose, 2);
    }
}
