//! Reducing a parsed diff to bounded text
//!
//! Each kept file is emitted as a `file: <path>` line, its header lines and
//! its windowed hunks. Three budgets apply while emitting: hunks and lines
//! per file, and bytes for the whole output. Hitting a per-file budget ends
//! that file with a marker; hitting the byte budget ends everything.

use super::options::CompactionOptions;
use super::report::CompactionReport;
use super::types::{DiffDocument, DiffLine, FileBlock, Hunk};
use regex::Regex;
use std::sync::LazyLock;

/// Returned instead of an empty string
pub const NO_MEANINGFUL_CHANGES: &str = "[no meaningful content changes]";
/// Stands in for a run of skipped body lines
pub const ELLIPSIS: &str = "...";
pub const LINE_TRIMMED_MARKER: &str = " … [trimmed]";
pub const FILE_TRUNCATED_MARKER: &str = "[… file truncated …]";
pub const MORE_FILES_MARKER: &str = "[… more files omitted …]";
pub const OUTPUT_TRUNCATED_MARKER: &str = "[output truncated — size limit]";

/// Body lines shown for a hunk without any change
const PURE_CONTEXT_PREVIEW_LINES: usize = 10;

/// Characters that alone make a changed line formatting noise
const NOISE_CHARS: &[char] = &['{', '}', '[', ']', '(', ')', ';', ','];

static HORIZONTAL_WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Compacted text together with what happened while producing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compaction {
    pub text: String,
    pub report: CompactionReport,
}

/// Compact `doc` into bounded text.
///
/// Never returns an empty string: when nothing survives the result is
/// [`NO_MEANINGFUL_CHANGES`].
pub fn compact(doc: &DiffDocument, options: &CompactionOptions) -> String {
    compact_with_report(doc, options).text
}

pub fn compact_with_report(doc: &DiffDocument, options: &CompactionOptions) -> Compaction {
    let mut report = CompactionReport {
        files_seen: doc.len(),
        files_discarded: doc.files().iter().filter(|f| f.is_discarded()).count(),
        input_bytes: doc.source_bytes(),
        ..Default::default()
    };
    let mut out = Output::new(options.max_total_bytes());

    if emit_document(doc, options, &mut out, &mut report).is_err() {
        tracing::debug!(
            limit = options.max_total_bytes(),
            "output size limit reached"
        );
    }
    report.byte_limit_hit = out.exhausted;

    let mut text = out.buf;
    if text.trim().is_empty() {
        text = NO_MEANINGFUL_CHANGES.to_string();
    }
    report.output_bytes = text.len();

    tracing::debug!(
        files_emitted = report.files_emitted,
        files_discarded = report.files_discarded,
        input_bytes = report.input_bytes,
        output_bytes = report.output_bytes,
        "compacted diff"
    );

    Compaction { text, report }
}

/// The byte budget ran out; the global marker has been written
#[derive(Debug)]
struct BudgetExhausted;

/// Output buffer enforcing `max_total_bytes`
struct Output {
    buf: String,
    max_bytes: usize,
    exhausted: bool,
}

impl Output {
    fn new(max_bytes: usize) -> Self {
        Self {
            buf: String::new(),
            max_bytes,
            exhausted: false,
        }
    }

    /// Append `line` unless it would take the buffer past the budget, in
    /// which case the global marker is appended instead.
    fn push_line(&mut self, line: &str) -> Result<(), BudgetExhausted> {
        if self.exhausted {
            return Err(BudgetExhausted);
        }
        if self.buf.len() + line.len() + 1 > self.max_bytes {
            self.buf.push_str(OUTPUT_TRUNCATED_MARKER);
            self.buf.push('\n');
            self.exhausted = true;
            return Err(BudgetExhausted);
        }
        self.buf.push_str(line);
        self.buf.push('\n');
        Ok(())
    }

    /// Blank line between sections
    fn separate(&mut self) -> Result<(), BudgetExhausted> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.push_line("")
    }
}

fn emit_document(
    doc: &DiffDocument,
    options: &CompactionOptions,
    out: &mut Output,
    report: &mut CompactionReport,
) -> Result<(), BudgetExhausted> {
    let kept: Vec<&FileBlock> = doc.files().iter().filter(|f| !f.is_discarded()).collect();

    for (i, block) in kept.iter().enumerate() {
        if report.files_emitted >= options.max_files() {
            report.files_omitted = kept.len() - i;
            tracing::debug!(
                omitted = report.files_omitted,
                max_files = options.max_files(),
                "file limit reached"
            );
            out.separate()?;
            out.push_line(MORE_FILES_MARKER)?;
            break;
        }

        report.files_emitted += 1;
        emit_file(block, options, out, report)?;
    }

    Ok(())
}

/// A line ready for output
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rendered {
    text: String,
    trimmed: bool,
}

impl Rendered {
    fn verbatim(line: &str, max_len: usize) -> Self {
        clip(line.to_string(), max_len)
    }

    fn marker(text: &str) -> Self {
        Self {
            text: text.to_string(),
            trimmed: false,
        }
    }
}

/// Per-file line accounting
struct FileEmitter<'a> {
    out: &'a mut Output,
    report: &'a mut CompactionReport,
    max_lines: usize,
    lines: usize,
}

impl FileEmitter<'_> {
    fn push(&mut self, line: &Rendered) -> Result<(), BudgetExhausted> {
        self.out.push_line(&line.text)?;
        self.lines += 1;
        if line.trimmed {
            self.report.lines_trimmed += 1;
        }
        Ok(())
    }

    fn is_full(&self) -> bool {
        self.lines >= self.max_lines
    }

    fn truncate(&mut self) -> Result<(), BudgetExhausted> {
        self.report.files_truncated += 1;
        self.out.push_line(FILE_TRUNCATED_MARKER)
    }
}

fn emit_file(
    block: &FileBlock,
    options: &CompactionOptions,
    out: &mut Output,
    report: &mut CompactionReport,
) -> Result<(), BudgetExhausted> {
    let max_len = options.max_line_length();
    tracing::trace!(
        path = block.path(),
        old_path = block.old_path(),
        renamed = block.is_rename(),
        hunks = block.hunks().len(),
        "emitting file"
    );

    out.separate()?;
    let mut file = FileEmitter {
        out,
        report,
        max_lines: options.max_lines_per_file(),
        lines: 0,
    };

    let title = Rendered::verbatim(&format!("file: {}", block.path()), max_len);
    file.push(&title)?;

    for header in block.header_lines() {
        if file.is_full() {
            return file.truncate();
        }
        file.push(&Rendered::verbatim(header, max_len))?;
    }

    let mut hunks_emitted = 0;
    for hunk in block.hunks() {
        let lines = compact_hunk(hunk, options);
        if lines.is_empty() {
            continue;
        }

        if hunks_emitted >= options.max_hunks_per_file() {
            tracing::debug!(path = block.path(), "hunk limit reached");
            return file.truncate();
        }
        if file.is_full() {
            tracing::debug!(path = block.path(), "line limit reached");
            return file.truncate();
        }

        hunks_emitted += 1;
        file.report.hunks_emitted += 1;

        for line in &lines {
            if file.is_full() {
                tracing::debug!(path = block.path(), "line limit reached mid-hunk");
                return file.truncate();
            }
            file.push(line)?;
        }
    }

    Ok(())
}

/// Reduce one hunk to its header plus windowed body lines.
///
/// Returns nothing for a hunk whose only changes are formatting noise.
fn compact_hunk(hunk: &Hunk, options: &CompactionOptions) -> Vec<Rendered> {
    let max_len = options.max_line_length();
    let body = hunk.body();

    if !hunk.has_changes() {
        return pure_context_hunk(hunk, options);
    }

    let changes = hunk.change_indices();
    if changes.iter().all(|&i| is_noise(&body[i])) {
        return Vec::new();
    }

    // Every change anchors a window, noise included; noise lines themselves
    // are left out when emitting.
    let radius = options.context_radius();
    let last = body.len() - 1;
    let mut keep = vec![false; body.len()];
    for &i in &changes {
        let start = i.saturating_sub(radius);
        let end = i.saturating_add(radius).min(last);
        keep[start..=end].fill(true);
    }

    let mut lines = vec![Rendered::verbatim(hunk.header_line(), max_len)];
    let mut skipping = false;
    for (line, &kept) in body.iter().zip(&keep) {
        if kept {
            skipping = false;
            if !is_noise(line) {
                lines.push(render_body_line(line, max_len));
            }
        } else if !skipping {
            lines.push(Rendered::marker(ELLIPSIS));
            skipping = true;
        }
    }

    lines
}

fn pure_context_hunk(hunk: &Hunk, options: &CompactionOptions) -> Vec<Rendered> {
    let max_len = options.max_line_length();
    let body = hunk.body();
    let limit = if options.drop_pure_context_hunks() {
        body.len().min(PURE_CONTEXT_PREVIEW_LINES)
    } else {
        body.len()
    };

    let mut lines = vec![Rendered::verbatim(hunk.header_line(), max_len)];
    lines.extend(body[..limit].iter().map(|l| render_body_line(l, max_len)));
    if body.len() > limit {
        lines.push(Rendered::marker(ELLIPSIS));
    }
    lines
}

/// A changed line with nothing but whitespace, brackets or separators
fn is_noise(line: &DiffLine) -> bool {
    line.kind().is_change()
        && line
            .content()
            .trim_matches(|c: char| c.is_whitespace() || NOISE_CHARS.contains(&c))
            .is_empty()
}

/// Collapse runs of spaces and tabs and trim both ends
pub fn normalize_whitespace(content: &str) -> String {
    HORIZONTAL_WS_RE.replace_all(content, " ").trim().to_string()
}

/// Keep the diff sign, normalise what follows it, then clip
fn render_body_line(line: &DiffLine, max_len: usize) -> Rendered {
    let content = normalize_whitespace(line.content());
    let text = format!("{}{}", line.sign(), content);
    clip(text.trim_end().to_string(), max_len)
}

/// Hard-truncate to `max_len` characters, appending [`LINE_TRIMMED_MARKER`]
fn clip(text: String, max_len: usize) -> Rendered {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => Rendered {
            text: format!("{}{}", &text[..cut], LINE_TRIMMED_MARKER),
            trimmed: true,
        },
        None => Rendered {
            text,
            trimmed: false,
        },
    }
}
