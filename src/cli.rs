use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rrf_fuse::fusion::DEFAULT_RRF_K;

#[derive(Parser, Debug)]
#[command(
    name = "rrf-fuse",
    version,
    about = "Merge ranked document lists with reciprocal rank fusion"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Fuse(FuseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FuseArgs {
    /// JSON file holding a list of ranked lists; `-` or omitted reads stdin.
    pub input: Option<PathBuf>,

    #[arg(long = "rrf-k", default_value_t = DEFAULT_RRF_K)]
    pub rrf_k: f64,

    #[arg(long, value_enum, default_value_t = OutputShape::Documents)]
    pub shape: OutputShape,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputShape {
    Documents,
    Scored,
    Traced,
}

impl OutputShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Scored => "scored",
            Self::Traced => "traced",
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fuse_defaults_read_stdin_with_k_sixty() {
        let cli = Cli::try_parse_from(["rrf-fuse", "fuse"]).expect("defaults should parse");
        let Commands::Fuse(args) = cli.command;
        assert!(args.input.is_none());
        assert_eq!(args.rrf_k, 60.0);
        assert_eq!(args.shape, OutputShape::Documents);
        assert!(args.limit.is_none());
        assert!(!args.pretty);
        assert!(args.report_path.is_none());
    }

    #[test]
    fn fuse_accepts_shape_limit_and_report_flags() {
        let cli = Cli::try_parse_from([
            "rrf-fuse",
            "fuse",
            "results.json",
            "--rrf-k",
            "20",
            "--shape",
            "traced",
            "--limit",
            "5",
            "--pretty",
            "--report-path",
            "out/report.json",
        ])
        .expect("flags should parse");
        let Commands::Fuse(args) = cli.command;
        assert_eq!(args.input, Some(PathBuf::from("results.json")));
        assert_eq!(args.rrf_k, 20.0);
        assert_eq!(args.shape, OutputShape::Traced);
        assert_eq!(args.shape.as_str(), "traced");
        assert_eq!(args.limit, Some(5));
        assert!(args.pretty);
        assert_eq!(args.report_path, Some(PathBuf::from("out/report.json")));
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let parsed = Cli::try_parse_from(["rrf-fuse", "fuse", "--shape", "ranked"]);
        assert!(parsed.is_err());
    }
}
