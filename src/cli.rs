//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use arbor_store::CaseKind;
use clap::{Parser, Subcommand, ValueEnum};

/// arbor - skeleton graph analysis of branching trees
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(version)]
#[command(about = "Generation analysis and statistics for skeleton graphs of vascular trees")]
pub struct Cli {
    /// Config file (defaults to ./arbor.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which case directories a command runs over.
#[derive(clap::Args, Debug, Clone)]
pub struct CaseSelection {
    /// Kind of case, picked by directory prefix
    #[arg(short, long, value_enum, default_value_t = KindArg::Specimen)]
    pub kind: KindArg,

    /// Restrict to these case names (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub cases: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log the voxel extent of each case graph
    Shape {
        #[command(flatten)]
        selection: CaseSelection,
    },

    /// Print generation buckets and full-level counts
    Summary {
        #[command(flatten)]
        selection: CaseSelection,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Export statistics as timestamped CSV files
    Stats {
        #[command(flatten)]
        selection: CaseSelection,

        /// File name prefix; defaults to the case name
        #[arg(short, long)]
        name: Option<String>,

        /// One row per generation instead of one per edge
        #[arg(long, default_value_t = false)]
        per_generation: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Generated,
    Model,
    Specimen,
}

impl From<KindArg> for CaseKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Generated => Self::Generated,
            KindArg::Model => Self::Model,
            KindArg::Specimen => Self::Specimen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cases_split_on_commas() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["arbor", "shape", "--cases", "P01,P02", "--kind", "model"])?;
        assert!(matches!(
            &cli.command,
            Commands::Shape { selection }
                if selection.cases == ["P01", "P02"] && selection.kind == KindArg::Model
        ));
        Ok(())
    }

    #[test]
    fn test_global_config_after_subcommand() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["arbor", "summary", "--json", "--config", "custom.toml"])?;
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Summary { json: true, .. }));
        Ok(())
    }
}
