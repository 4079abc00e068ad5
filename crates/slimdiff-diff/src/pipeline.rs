//! Segment, filter and compact in one call

use super::compact::{compact_with_report, Compaction};
use super::error::OptionsResult;
use super::filter::{filter, IgnoreRules};
use super::options::CompactionOptions;
use super::segment::segment;
use slimdiff_core::DiffConfig;

/// Compaction settings bundled with the ignore rules they run under
#[derive(Debug, Clone, Default)]
pub struct DiffCompactor {
    options: CompactionOptions,
    rules: IgnoreRules,
}

impl DiffCompactor {
    pub fn new(options: CompactionOptions, rules: IgnoreRules) -> Self {
        Self { options, rules }
    }

    pub fn from_config(config: &DiffConfig) -> OptionsResult<Self> {
        Ok(Self {
            options: CompactionOptions::try_from(config)?,
            rules: IgnoreRules::from_config(config)?,
        })
    }

    pub fn options(&self) -> &CompactionOptions {
        &self.options
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    /// Compact `raw` and report what was kept and cut
    pub fn run(&self, raw: &str) -> Compaction {
        let doc = filter(segment(raw), &self.rules);
        compact_with_report(&doc, &self.options)
    }

    pub fn compact(&self, raw: &str) -> String {
        self.run(raw).text
    }
}

/// Compact `raw` with the default limits and ignore rules
pub fn compact_diff(raw: &str) -> String {
    DiffCompactor::default().compact(raw)
}
