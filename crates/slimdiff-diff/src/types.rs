//! Type definitions for diff compaction
//!
//! Values are built once by the segmenter and never mutated afterwards;
//! filtering and compaction produce new values or new text.

/// Classification of one hunk body line by its first character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Added,
    Removed,
    Context,
}

impl LineKind {
    /// Classify a raw body line. `+++`/`---` file markers never count as
    /// changes.
    pub fn classify(line: &str) -> Self {
        if line.starts_with("+++") || line.starts_with("---") {
            return LineKind::Context;
        }
        match line.as_bytes().first() {
            Some(b'+') => LineKind::Added,
            Some(b'-') => LineKind::Removed,
            _ => LineKind::Context,
        }
    }

    pub fn is_change(self) -> bool {
        matches!(self, LineKind::Added | LineKind::Removed)
    }
}

/// A raw hunk body line with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    kind: LineKind,
    text: String,
}

impl DiffLine {
    pub fn new(text: &str) -> Self {
        Self {
            kind: LineKind::classify(text),
            text: text.to_string(),
        }
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// The line as it appeared in the diff, sign included
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The line without its diff sign.
    ///
    /// Context lines only lose a leading space; lines such as
    /// `\ No newline at end of file` are returned whole.
    pub fn content(&self) -> &str {
        match self.kind {
            LineKind::Added | LineKind::Removed => &self.text[1..],
            LineKind::Context => self.text.strip_prefix(' ').unwrap_or(&self.text),
        }
    }

    /// The sign re-emitted in front of the normalised content
    pub fn sign(&self) -> &str {
        match self.kind {
            LineKind::Added => "+",
            LineKind::Removed => "-",
            LineKind::Context if self.text.starts_with(' ') => " ",
            LineKind::Context => "",
        }
    }
}

/// One `@@ -a,b +c,d @@` region of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    header_line: String,
    body: Vec<DiffLine>,
}

impl Hunk {
    pub(crate) fn new(header_line: &str, body: Vec<DiffLine>) -> Self {
        Self {
            header_line: header_line.to_string(),
            body,
        }
    }

    /// The literal `@@ ... @@` line, function context included
    pub fn header_line(&self) -> &str {
        &self.header_line
    }

    pub fn body(&self) -> &[DiffLine] {
        &self.body
    }

    /// Indices of added and removed lines within the body
    pub fn change_indices(&self) -> Vec<usize> {
        self.body
            .iter()
            .enumerate()
            .filter(|(_, line)| line.kind().is_change())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        self.body.iter().any(|line| line.kind().is_change())
    }
}

/// One `diff --git a/<old> b/<new>` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    old_path: String,
    path: String,
    header_lines: Vec<String>,
    hunks: Vec<Hunk>,
    is_binary: bool,
    discard: bool,
}

impl FileBlock {
    pub(crate) fn new(
        old_path: String,
        path: String,
        header_lines: Vec<String>,
        hunks: Vec<Hunk>,
        is_binary: bool,
    ) -> Self {
        Self {
            old_path,
            path,
            header_lines,
            hunks,
            is_binary,
            discard: is_binary,
        }
    }

    /// Same block with the filter decision recorded
    pub(crate) fn with_discard(self, discard: bool) -> Self {
        Self {
            discard: discard || self.is_binary,
            ..self
        }
    }

    /// Pre-image (`a/`) path
    pub fn old_path(&self) -> &str {
        &self.old_path
    }

    /// Post-image (`b/`) path
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_rename(&self) -> bool {
        self.old_path != self.path
    }

    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    pub fn is_binary(&self) -> bool {
        self.is_binary
    }

    pub fn is_discarded(&self) -> bool {
        self.discard
    }
}

/// A parsed diff: file blocks in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDocument {
    files: Vec<FileBlock>,
    source_bytes: usize,
}

impl DiffDocument {
    pub(crate) fn new(files: Vec<FileBlock>, source_bytes: usize) -> Self {
        Self {
            files,
            source_bytes,
        }
    }

    pub fn files(&self) -> &[FileBlock] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Size of the diff text this document was parsed from
    pub fn source_bytes(&self) -> usize {
        self.source_bytes
    }

    pub(crate) fn map_files<F>(self, f: F) -> Self
    where
        F: FnMut(FileBlock) -> FileBlock,
    {
        Self {
            files: self.files.into_iter().map(f).collect(),
            source_bytes: self.source_bytes,
        }
    }
}
