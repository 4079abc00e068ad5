//! Splitting raw unified-diff text into file blocks and hunks

use super::types::{DiffDocument, DiffLine, FileBlock, Hunk};
use regex::Regex;
use std::sync::LazyLock;

static DIFF_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^diff --git "?a/(.+?)"? "?b/(.+?)"?$"#).unwrap());

static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@@ .* @@").unwrap());

static BINARY_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Binary files .* differ$|GIT binary patch)").unwrap());

/// Metadata lines that belong to a file block rather than to a hunk
const HEADER_PREFIXES: &[&str] = &[
    "index ",
    "new file mode ",
    "deleted file mode ",
    "old mode ",
    "new mode ",
    "similarity index ",
    "dissimilarity index ",
    "rename from ",
    "rename to ",
    "copy from ",
    "copy to ",
    "--- ",
    "+++ ",
];

fn is_header_line(line: &str) -> bool {
    HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Parse git diff content into a document of file blocks.
///
/// Never fails: lines outside any file block, and lines inside a block that
/// are neither metadata nor part of an open hunk, are skipped.
pub fn segment(diff_content: &str) -> DiffDocument {
    let mut files = Vec::new();
    let mut current: Option<BlockBuilder> = None;

    for line in diff_content.lines() {
        if let Some(captures) = DIFF_HEADER_RE.captures(line) {
            if let Some(block) = current.take() {
                files.push(block.finish());
            }
            current = Some(BlockBuilder::new(&captures[1], &captures[2]));
            continue;
        }

        if let Some(block) = current.as_mut() {
            block.push_line(line);
        }
    }

    if let Some(block) = current.take() {
        files.push(block.finish());
    }

    tracing::debug!(files = files.len(), bytes = diff_content.len(), "segmented diff");
    DiffDocument::new(files, diff_content.len())
}

struct BlockBuilder {
    old_path: String,
    path: String,
    header_lines: Vec<String>,
    hunks: Vec<Hunk>,
    open_hunk: Option<(String, Vec<DiffLine>)>,
    is_binary: bool,
}

impl BlockBuilder {
    fn new(old_path: &str, path: &str) -> Self {
        Self {
            old_path: old_path.trim().to_string(),
            path: path.trim().to_string(),
            header_lines: Vec::new(),
            hunks: Vec::new(),
            open_hunk: None,
            is_binary: false,
        }
    }

    fn push_line(&mut self, line: &str) {
        // Binary payloads (base85 literal/delta lines) carry nothing usable
        if self.is_binary {
            return;
        }

        if BINARY_MARKER_RE.is_match(line) {
            tracing::trace!(path = %self.path, "binary patch marker");
            self.is_binary = true;
            self.hunks.clear();
            self.open_hunk = None;
            return;
        }

        if HUNK_HEADER_RE.is_match(line) {
            self.close_hunk();
            self.open_hunk = Some((line.to_string(), Vec::new()));
            return;
        }

        if let Some((_, body)) = self.open_hunk.as_mut() {
            body.push(DiffLine::new(line));
            return;
        }

        if is_header_line(line) {
            self.header_lines.push(line.to_string());
        }
    }

    fn close_hunk(&mut self) {
        if let Some((header, body)) = self.open_hunk.take() {
            self.hunks.push(Hunk::new(&header, body));
        }
    }

    fn finish(mut self) -> FileBlock {
        self.close_hunk();
        FileBlock::new(
            self.old_path,
            self.path,
            self.header_lines,
            self.hunks,
            self.is_binary,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineKind;

    #[test]
    fn test_empty_input() {
        let doc = segment("");
        assert!(doc.is_empty());
        assert_eq!(doc.source_bytes(), 0);
    }

    #[test]
    fn test_text_without_diff_header_is_empty_document() {
        let doc = segment("just some text\n@@ -1 +1 @@\n+not in a file\n");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_modified_file() {
        let diff = r#"diff --git a/modified.txt b/modified.txt
index 1a2b3c4..5d6e7f8 100644
--- a/modified.txt
+++ b/modified.txt
@@ -1,3 +1,4 @@ fn main()
 Existing line 1
-Old line 2
+Modified line 2
 Existing line 3
+Added line 4"#;

        let doc = segment(diff);
        assert_eq!(doc.len(), 1);

        let file = &doc.files()[0];
        assert_eq!(file.path(), "modified.txt");
        assert_eq!(file.old_path(), "modified.txt");
        assert!(!file.is_binary());
        assert_eq!(
            file.header_lines(),
            &[
                "index 1a2b3c4..5d6e7f8 100644".to_string(),
                "--- a/modified.txt".to_string(),
                "+++ b/modified.txt".to_string(),
            ]
        );

        assert_eq!(file.hunks().len(), 1);
        let hunk = &file.hunks()[0];
        assert_eq!(hunk.header_line(), "@@ -1,3 +1,4 @@ fn main()");
        let kinds: Vec<LineKind> = hunk.body().iter().map(|l| l.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Context,
                LineKind::Removed,
                LineKind::Added,
                LineKind::Context,
                LineKind::Added,
            ]
        );
    }

    #[test]
    fn test_multiple_files_preserve_order() {
        let diff = r#"diff --git a/z.txt b/z.txt
@@ -1 +1 @@
-z
+Z
diff --git a/a.txt b/a.txt
@@ -1 +1 @@
-a
+A
diff --git a/m.txt b/m.txt
@@ -1 +1 @@
-m
+M"#;

        let doc = segment(diff);
        let paths: Vec<&str> = doc.files().iter().map(|f| f.path()).collect();
        assert_eq!(paths, vec!["z.txt", "a.txt", "m.txt"]);
        assert!(doc.files().iter().all(|f| f.hunks().len() == 1));
    }

    #[test]
    fn test_multiple_hunks_are_closed_in_order() {
        let diff = r#"diff --git a/lib.rs b/lib.rs
@@ -1,2 +1,2 @@
-one
+ONE
@@ -10,2 +10,2 @@ impl Foo
-ten
+TEN"#;

        let doc = segment(diff);
        let file = &doc.files()[0];
        assert_eq!(file.hunks().len(), 2);
        assert_eq!(file.hunks()[0].body().len(), 2);
        assert_eq!(file.hunks()[1].header_line(), "@@ -10,2 +10,2 @@ impl Foo");
        assert_eq!(file.hunks()[1].body()[1].text(), "+TEN");
    }

    #[test]
    fn test_renamed_file_without_hunks() {
        let diff = r#"diff --git a/old_name.txt b/new_name.txt
similarity index 100%
rename from old_name.txt
rename to new_name.txt"#;

        let doc = segment(diff);
        let file = &doc.files()[0];
        assert_eq!(file.old_path(), "old_name.txt");
        assert_eq!(file.path(), "new_name.txt");
        assert!(file.is_rename());
        assert!(file.hunks().is_empty());
        assert_eq!(file.header_lines().len(), 3);
    }

    #[test]
    fn test_binary_files_differ() {
        let diff = r#"diff --git a/logo.bin b/logo.bin
index 1111111..2222222 100644
Binary files a/logo.bin and b/logo.bin differ"#;

        let doc = segment(diff);
        let file = &doc.files()[0];
        assert!(file.is_binary());
        assert!(file.is_discarded());
        assert!(file.hunks().is_empty());
    }

    #[test]
    fn test_git_binary_patch_clears_hunks_and_payload() {
        let diff = r#"diff --git a/blob b/blob
@@ -1 +1 @@
-text
+text2
GIT binary patch
literal 12
zcmZ?wbhEHbRAT@G

diff --git a/after.txt b/after.txt
@@ -1 +1 @@
+kept"#;

        let doc = segment(diff);
        assert_eq!(doc.len(), 2);
        assert!(doc.files()[0].is_binary());
        assert!(doc.files()[0].hunks().is_empty());
        assert_eq!(doc.files()[1].hunks()[0].body()[0].text(), "+kept");
    }

    #[test]
    fn test_quoted_paths() {
        let diff = "diff --git \"a/with space.txt\" \"b/with space.txt\"\n@@ -1 +1 @@\n+x\n";
        let doc = segment(diff);
        assert_eq!(doc.files()[0].path(), "with space.txt");
    }

    #[test]
    fn test_crlf_line_endings() {
        let diff = "diff --git a/win.txt b/win.txt\r\n@@ -1 +1 @@\r\n-old\r\n+new\r\n";
        let doc = segment(diff);
        let file = &doc.files()[0];
        assert_eq!(file.hunks()[0].body()[1].text(), "+new");
    }

    #[test]
    fn test_stray_lines_before_first_hunk_are_skipped() {
        let diff = "diff --git a/x b/x\nsomething unexpected\n@@ -1 +1 @@\n+y\n";
        let doc = segment(diff);
        let file = &doc.files()[0];
        assert!(file.header_lines().is_empty());
        assert_eq!(file.hunks()[0].body().len(), 1);
    }
}
