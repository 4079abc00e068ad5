//! Statistics gathered while compacting

use serde::Serialize;

/// Outputs above this size are worth flagging to a user
pub const LARGE_OUTPUT_BYTES: usize = 2_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompactionReport {
    /// File blocks in the parsed diff
    pub files_seen: usize,
    /// Blocks dropped as binary or by an ignore rule
    pub files_discarded: usize,
    pub files_emitted: usize,
    /// Kept blocks never reached because of `max_files`
    pub files_omitted: usize,
    /// Files cut short by the hunk or line cap
    pub files_truncated: usize,
    pub hunks_emitted: usize,
    /// Lines shortened to `max_line_length`
    pub lines_trimmed: usize,
    pub byte_limit_hit: bool,
    pub input_bytes: usize,
    pub output_bytes: usize,
}

impl CompactionReport {
    pub fn is_large(&self) -> bool {
        self.output_bytes > LARGE_OUTPUT_BYTES
    }

    /// Output size as a percentage of the input, 0 for empty input
    pub fn ratio_percent(&self) -> usize {
        if self.input_bytes == 0 {
            return 0;
        }
        self.output_bytes * 100 / self.input_bytes
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} -> {} bytes ({}%), files: {} kept, {} discarded, {} omitted, {} truncated; hunks: {}",
            self.input_bytes,
            self.output_bytes,
            self.ratio_percent(),
            self.files_emitted,
            self.files_discarded,
            self.files_omitted,
            self.files_truncated,
            self.hunks_emitted,
        );
        if self.lines_trimmed > 0 {
            summary.push_str(&format!("; {} long lines trimmed", self.lines_trimmed));
        }
        if self.byte_limit_hit {
            summary.push_str("; size limit reached");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_of_empty_input() {
        let report = CompactionReport::default();
        assert_eq!(report.ratio_percent(), 0);
        assert!(!report.is_large());
    }

    #[test]
    fn test_summary() {
        let report = CompactionReport {
            files_seen: 3,
            files_discarded: 1,
            files_emitted: 2,
            hunks_emitted: 4,
            lines_trimmed: 1,
            byte_limit_hit: true,
            input_bytes: 1000,
            output_bytes: 250,
            ..Default::default()
        };
        assert_eq!(
            report.summary(),
            "1000 -> 250 bytes (25%), files: 2 kept, 1 discarded, 0 omitted, 0 truncated; hunks: 4; 1 long lines trimmed; size limit reached"
        );
    }

    #[test]
    fn test_is_large() {
        let report = CompactionReport {
            output_bytes: LARGE_OUTPUT_BYTES + 1,
            ..Default::default()
        };
        assert!(report.is_large());
    }
}
