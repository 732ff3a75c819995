use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "respatch",
    about = "Compute minimal patches between two snapshots of a resource container",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the patch between an old and a new snapshot
    Diff(DiffArgs),
    /// Show the descriptor tree of one snapshot
    Tree(TreeArgs),
    /// Print the active classifier rules as TOML
    Rules(RulesArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Alternate rule set
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args)]
pub struct TreeArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args)]
pub struct RulesArgs {
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["respatch", "diff", "a.json", "b.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.old, PathBuf::from("a.json"));
            assert_eq!(args.new, PathBuf::from("b.json"));
            assert!(args.rules.is_none());
        } else { panic!("wrong command"); }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_diff_with_rules_and_json() {
        let cli = Cli::try_parse_from([
            "respatch", "diff", "a.json", "b.json", "--rules", "rules.toml", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.rules, Some(PathBuf::from("rules.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_requires_both_snapshots() {
        assert!(Cli::try_parse_from(["respatch", "diff", "a.json"]).is_err());
    }

    #[test]
    fn parse_tree() {
        let cli = Cli::try_parse_from(["respatch", "tree", "a.json"]).unwrap();
        if let Command::Tree(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("a.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_rules() {
        let cli = Cli::try_parse_from(["respatch", "rules"]).unwrap();
        assert!(matches!(cli.command, Command::Rules(_)));
    }

    #[test]
    fn parse_verbose_global() {
        let cli = Cli::try_parse_from(["respatch", "rules", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_unknown_format() {
        assert!(Cli::try_parse_from(["respatch", "rules", "--format", "xml"]).is_err());
    }
}
