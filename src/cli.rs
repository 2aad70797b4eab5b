//! src/cli.rs
use clap::Parser;
use std::path::PathBuf;

/// Add pylint to git hooks.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hook to install into. Supported hooks: pre-commit, pre-push. Defaults to pre-commit.
    #[arg(long)]
    pub hook: Option<String>,

    /// Reject the commit or push until every lint warning is solved.
    #[arg(long)]
    pub strict: bool,

    /// Copy the existing hook file aside before replacing it.
    #[arg(long)]
    pub backup: bool,

    /// Append to the existing hook instead of replacing it.
    #[arg(long)]
    pub append: bool,

    /// Target repository. Uses the current directory by default.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Directories and files to leave out of linting.
    #[arg(long, num_args = 1..)]
    pub ignore: Option<Vec<String>>,

    /// Linter command the hook runs. Defaults to pylint.
    #[arg(long)]
    pub linter: Option<String>,

    /// Print the hook script instead of writing it.
    #[arg(long)]
    pub print: bool,

    /// Use this config file instead of ~/.config/pygih/config.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show debug output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["pygih"]);
        assert_eq!(cli.hook, None);
        assert!(!cli.strict && !cli.backup && !cli.append && !cli.print);
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.ignore, None);
    }

    #[test]
    fn ignore_takes_several_values() {
        let cli = Cli::parse_from(["pygih", "--ignore", "a", "b", "--strict"]);
        assert_eq!(cli.ignore, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(cli.strict);
    }
}
