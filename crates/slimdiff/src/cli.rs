use clap::Parser;
use slimdiff_core::logging::DEFAULT_LOG_LEVEL;
use slimdiff_core::DiffConfig;
use std::path::PathBuf;

/// Compact a unified git diff read from stdin into bounded LLM context
#[derive(Debug, Parser)]
#[command(name = "slimdiff", version, about)]
pub struct Cli {
    /// Extra configuration file, merged after the global and repo configs
    #[arg(long, env = "SLIMDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Unchanged lines kept around each change
    #[arg(long, env = "SLIMDIFF_CONTEXT_RADIUS")]
    pub context_radius: Option<usize>,

    /// Hunks emitted per file before it is truncated
    #[arg(long)]
    pub max_hunks_per_file: Option<usize>,

    /// Lines emitted per file before it is truncated
    #[arg(long)]
    pub max_lines_per_file: Option<usize>,

    /// Longest emitted line; longer lines are trimmed
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Hard cap on the output size in bytes
    #[arg(long, env = "SLIMDIFF_MAX_TOTAL_BYTES")]
    pub max_total_bytes: Option<usize>,

    /// Files emitted before the rest are omitted
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Emit hunks without any +/- line in full instead of a short preview
    #[arg(long)]
    pub keep_pure_context_hunks: bool,

    /// Additional ignore glob (repeatable)
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Do not apply the built-in ignore globs
    #[arg(long)]
    pub no_default_ignores: bool,

    /// Print a compaction summary on stderr
    #[arg(long)]
    pub stats: bool,

    /// Print the compaction report on stderr as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level
    #[arg(long, env = "SLIMDIFF_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Cli {
    /// Apply command line overrides on top of the loaded `[diff]` section
    pub fn diff_config(&self, base: DiffConfig) -> DiffConfig {
        base.merge(DiffConfig {
            context_radius: self.context_radius,
            max_hunks_per_file: self.max_hunks_per_file,
            max_lines_per_file: self.max_lines_per_file,
            max_line_length: self.max_line_length,
            max_total_bytes: self.max_total_bytes,
            max_files: self.max_files,
            drop_pure_context_hunks: self.keep_pure_context_hunks.then_some(false),
            default_ignores: self.no_default_ignores.then_some(false),
            ignore: self.ignore.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["slimdiff"]).unwrap();
        let base = DiffConfig {
            max_files: Some(4),
            drop_pure_context_hunks: Some(true),
            ..Default::default()
        };
        assert_eq!(cli.diff_config(base.clone()), base);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "slimdiff",
            "--max-files",
            "2",
            "--context-radius",
            "0",
            "--keep-pure-context-hunks",
            "--no-default-ignores",
            "--ignore",
            "docs/**",
            "--ignore",
            "*.txt",
        ])
        .unwrap();

        let merged = cli.diff_config(DiffConfig {
            max_files: Some(9),
            ignore: vec!["gen/**".to_string()],
            ..Default::default()
        });
        assert_eq!(merged.max_files, Some(2));
        assert_eq!(merged.context_radius, Some(0));
        assert_eq!(merged.drop_pure_context_hunks, Some(false));
        assert_eq!(merged.default_ignores, Some(false));
        assert_eq!(merged.ignore, vec!["gen/**", "docs/**", "*.txt"]);
    }

    #[test]
    fn test_negative_value_is_rejected() {
        assert!(Cli::try_parse_from(["slimdiff", "--max-files", "-1"]).is_err());
    }
}
