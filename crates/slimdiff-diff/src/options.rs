//! Compaction limits

use super::error::{OptionsError, OptionsResult};
use slimdiff_core::DiffConfig;

pub const DEFAULT_CONTEXT_RADIUS: usize = 2;
pub const DEFAULT_MAX_HUNKS_PER_FILE: usize = 6;
pub const DEFAULT_MAX_LINES_PER_FILE: usize = 800;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 400;
pub const DEFAULT_MAX_TOTAL_BYTES: usize = 200_000;
pub const DEFAULT_MAX_FILES: usize = 25;

/// Limits applied by the compactor.
///
/// Only obtainable through [`Default`] or [`CompactionOptionsBuilder::build`],
/// so every value in circulation has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionOptions {
    context_radius: usize,
    max_hunks_per_file: usize,
    max_lines_per_file: usize,
    max_line_length: usize,
    max_total_bytes: usize,
    max_files: usize,
    drop_pure_context_hunks: bool,
}

impl Default for CompactionOptions {
    fn default() -> Self {
        Self {
            context_radius: DEFAULT_CONTEXT_RADIUS,
            max_hunks_per_file: DEFAULT_MAX_HUNKS_PER_FILE,
            max_lines_per_file: DEFAULT_MAX_LINES_PER_FILE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_files: DEFAULT_MAX_FILES,
            drop_pure_context_hunks: true,
        }
    }
}

impl CompactionOptions {
    pub fn builder() -> CompactionOptionsBuilder {
        CompactionOptionsBuilder::default()
    }

    /// Unchanged lines kept before and after each change
    pub fn context_radius(&self) -> usize {
        self.context_radius
    }

    pub fn max_hunks_per_file(&self) -> usize {
        self.max_hunks_per_file
    }

    /// Per-file line budget, `file:` and header lines included
    pub fn max_lines_per_file(&self) -> usize {
        self.max_lines_per_file
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub fn max_total_bytes(&self) -> usize {
        self.max_total_bytes
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn drop_pure_context_hunks(&self) -> bool {
        self.drop_pure_context_hunks
    }
}

impl TryFrom<&DiffConfig> for CompactionOptions {
    type Error = OptionsError;

    fn try_from(config: &DiffConfig) -> OptionsResult<Self> {
        CompactionOptions::builder().apply_config(config).build()
    }
}

/// Builder for [`CompactionOptions`]; unset fields take the defaults
#[derive(Debug, Clone, Default)]
pub struct CompactionOptionsBuilder {
    context_radius: Option<usize>,
    max_hunks_per_file: Option<usize>,
    max_lines_per_file: Option<usize>,
    max_line_length: Option<usize>,
    max_total_bytes: Option<usize>,
    max_files: Option<usize>,
    drop_pure_context_hunks: Option<bool>,
}

impl CompactionOptionsBuilder {
    pub fn context_radius(mut self, value: usize) -> Self {
        self.context_radius = Some(value);
        self
    }

    pub fn max_hunks_per_file(mut self, value: usize) -> Self {
        self.max_hunks_per_file = Some(value);
        self
    }

    pub fn max_lines_per_file(mut self, value: usize) -> Self {
        self.max_lines_per_file = Some(value);
        self
    }

    pub fn max_line_length(mut self, value: usize) -> Self {
        self.max_line_length = Some(value);
        self
    }

    pub fn max_total_bytes(mut self, value: usize) -> Self {
        self.max_total_bytes = Some(value);
        self
    }

    pub fn max_files(mut self, value: usize) -> Self {
        self.max_files = Some(value);
        self
    }

    pub fn drop_pure_context_hunks(mut self, value: bool) -> Self {
        self.drop_pure_context_hunks = Some(value);
        self
    }

    /// Take every value the config layer sets, keeping earlier ones otherwise
    pub fn apply_config(self, config: &DiffConfig) -> Self {
        Self {
            context_radius: config.context_radius.or(self.context_radius),
            max_hunks_per_file: config.max_hunks_per_file.or(self.max_hunks_per_file),
            max_lines_per_file: config.max_lines_per_file.or(self.max_lines_per_file),
            max_line_length: config.max_line_length.or(self.max_line_length),
            max_total_bytes: config.max_total_bytes.or(self.max_total_bytes),
            max_files: config.max_files.or(self.max_files),
            drop_pure_context_hunks: config
                .drop_pure_context_hunks
                .or(self.drop_pure_context_hunks),
        }
    }

    /// Validate and build. Every cap must be non-zero; a radius of zero is
    /// allowed and keeps changed lines only.
    pub fn build(self) -> OptionsResult<CompactionOptions> {
        let defaults = CompactionOptions::default();

        let options = CompactionOptions {
            context_radius: self.context_radius.unwrap_or(defaults.context_radius),
            max_hunks_per_file: non_zero(
                "max_hunks_per_file",
                self.max_hunks_per_file.unwrap_or(defaults.max_hunks_per_file),
            )?,
            max_lines_per_file: non_zero(
                "max_lines_per_file",
                self.max_lines_per_file.unwrap_or(defaults.max_lines_per_file),
            )?,
            max_line_length: non_zero(
                "max_line_length",
                self.max_line_length.unwrap_or(defaults.max_line_length),
            )?,
            max_total_bytes: non_zero(
                "max_total_bytes",
                self.max_total_bytes.unwrap_or(defaults.max_total_bytes),
            )?,
            max_files: non_zero("max_files", self.max_files.unwrap_or(defaults.max_files))?,
            drop_pure_context_hunks: self
                .drop_pure_context_hunks
                .unwrap_or(defaults.drop_pure_context_hunks),
        };

        Ok(options)
    }
}

fn non_zero(name: &'static str, value: usize) -> OptionsResult<usize> {
    if value == 0 {
        return Err(OptionsError::ZeroLimit { name });
    }
    Ok(value)
}
