//! Keep/discard decisions for whole file blocks

use super::error::{OptionsError, OptionsResult};
use super::types::DiffDocument;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use slimdiff_core::DiffConfig;

/// Files whose diffs carry no signal: generated, vendored, lock and binary files
pub const DEFAULT_IGNORE_GLOBS: &[&str] = &[
    // generated / vendored directories
    "**/node_modules/**",
    "**/vendor/**",
    "**/.next/**",
    "**/.turbo/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/coverage/**",
    "**/__snapshots__/**",
    "**/.git/**",
    "**/.idea/**",
    "**/.vscode/**",
    // lock files and caches
    "**/package-lock.json",
    "**/yarn.lock",
    "**/pnpm-lock.yaml",
    "**/composer.lock",
    "**/Cargo.lock",
    "**/.eslintcache",
    "**/.DS_Store",
    // minified, maps and snapshots
    "**/*.min.js",
    "**/*.min.css",
    "**/*.map",
    "**/*.snap",
    // binary / media
    "**/*.{png,jpg,jpeg,gif,webp,svg,ico}",
    "**/*.{pdf,zip,gz,bz2,xz,7z,rar,tar}",
    "**/*.{ttf,otf,woff,woff2}",
    "**/*.{mp4,mov,avi,mkv,webm,mp3,wav,flac}",
    "**/*.wasm",
];

/// A compiled set of ignore globs.
///
/// Matching is case-insensitive and `*` stops at `/`; a leading `**/`
/// matches at any depth, including the repository root.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnoreRules {
    pub fn new<I, S>(patterns: I) -> OptionsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|source| OptionsError::InvalidGlob {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }

        let set = builder.build().map_err(OptionsError::GlobSet)?;
        Ok(Self {
            patterns: kept,
            set,
        })
    }

    /// The built-in rule set
    pub fn canonical() -> Self {
        Self::new(DEFAULT_IGNORE_GLOBS).expect("built-in ignore globs compile")
    }

    /// The built-in rule set plus `extra`
    pub fn canonical_with<I, S>(extra: I) -> OptionsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = DEFAULT_IGNORE_GLOBS
            .iter()
            .map(|p| p.to_string())
            .chain(extra.into_iter().map(|p| p.as_ref().to_string()))
            .collect();
        Self::new(patterns)
    }

    /// Rules that ignore nothing
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Rules from a `[diff]` config section: the built-in set unless
    /// `default_ignores = false`, plus its `ignore` list
    pub fn from_config(config: &DiffConfig) -> OptionsResult<Self> {
        if config.default_ignores.unwrap_or(true) {
            Self::canonical_with(&config.ignore)
        } else {
            Self::new(&config.ignore)
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(normalize_path(path))
    }

    /// The first pattern matching `path`, if any
    pub fn matching_pattern(&self, path: &str) -> Option<&str> {
        self.set
            .matches(normalize_path(path))
            .first()
            .and_then(|&i| self.patterns.get(i))
            .map(String::as_str)
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::canonical()
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether a file block should be dropped entirely
pub fn should_discard(path: &str, is_binary: bool, rules: &IgnoreRules) -> bool {
    is_binary || rules.is_match(path)
}

/// Record the keep/discard decision on every block of `doc`
pub fn filter(doc: DiffDocument, rules: &IgnoreRules) -> DiffDocument {
    doc.map_files(|block| {
        let discard = should_discard(block.path(), block.is_binary(), rules);
        if discard {
            if block.is_binary() {
                tracing::debug!(path = block.path(), "discarding binary file");
            } else {
                tracing::debug!(
                    path = block.path(),
                    rule = rules.matching_pattern(block.path()).unwrap_or_default(),
                    "discarding ignored file"
                );
            }
        }
        block.with_discard(discard)
    })
}
