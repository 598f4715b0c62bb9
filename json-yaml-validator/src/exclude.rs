//! Gitignore-style exclusion rules.
//!
//! Rules come from an explicit exclude file and, optionally, the VCS-ignore
//! file. Each non-comment line becomes one rule; the last rule that matches a
//! candidate decides, so a later `!pattern` re-includes what an earlier rule
//! excluded and a later exclude re-excludes what an earlier negation kept.
//!
//! Glob, directory and plain patterns use the `ignore` crate's gitignore
//! engine. An exclude-file line wrapped in slashes (`/body/`) is a raw regex
//! body instead; in the VCS-ignore file such a line is an anchored directory.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::ExcludeConfig;
use crate::error::ConfigError;
use crate::strategy::normalize_path;

/// Decides whether a discovered file is skipped.
///
/// Pipelines depend only on this capability, so tests can substitute any
/// closure `Fn(&str) -> bool`.
pub trait Exclusion {
    fn is_excluded(&self, path: &str) -> bool;
}

impl<F> Exclusion for F
where
    F: Fn(&str) -> bool,
{
    fn is_excluded(&self, path: &str) -> bool {
        self(path)
    }
}

/// The shape of the rule that fired, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Trailing `/`: everything under the directory.
    Directory,
    /// Contains `*`.
    Glob,
    /// Wrapped in `/…/`.
    Regex,
    /// Any other gitignore pattern (bare names match at any depth).
    Pattern,
}

/// Outcome of checking one path against the rules.
///
/// `Display` renders the diagnostic trace emitted for the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludeDecision {
    /// The path is literally the pattern text.
    Exact { pattern: String },
    /// A rule of the given kind matched.
    Matched { kind: RuleKind, pattern: String },
    /// The deciding rule was a negation.
    Negated { pattern: String },
    /// No rule matched.
    Unmatched { path: String },
}

impl ExcludeDecision {
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::Exact { .. } | Self::Matched { .. })
    }
}

impl fmt::Display for ExcludeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact { pattern } => write!(f, "file exactly matches exclude pattern: {pattern}"),
            Self::Matched { kind, pattern } => match kind {
                RuleKind::Directory => write!(f, "file is in exclude directory: {pattern}"),
                RuleKind::Glob => write!(f, "file matches exclude glob pattern: {pattern}"),
                RuleKind::Regex => write!(f, "file matches exclude regex pattern: {pattern}"),
                RuleKind::Pattern => write!(f, "file matches exclude pattern: {pattern}"),
            },
            Self::Negated { pattern } => {
                write!(f, "file matches exclude negation pattern: {pattern}")
            }
            Self::Unmatched { path } => {
                write!(f, "file '{path}' did not match any exclude patterns")
            }
        }
    }
}

/// Where a line came from. Only exclude-file lines may use the `/regex/` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    ExcludeFile,
    VcsIgnore,
}

#[derive(Debug)]
enum RuleMatcher {
    Gitignore(Gitignore),
    Regex(Regex),
}

#[derive(Debug)]
struct Rule {
    /// The line as written, including any `!`.
    pattern: String,
    /// The line without the negation prefix.
    body: String,
    negated: bool,
    kind: RuleKind,
    matcher: RuleMatcher,
}

impl Rule {
    /// Parse one line. Comments and blank lines yield `Ok(None)`.
    fn parse(line: &str, syntax: Syntax) -> Result<Option<Self>, ConfigError> {
        let line = line.trim();
        if line.is_empty() {
            debug!("skipping empty pattern");
            return Ok(None);
        }
        if line.starts_with('#') {
            debug!("skipping comment: {line}");
            return Ok(None);
        }

        let (negated, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let invalid = |message: String| ConfigError::InvalidExcludePattern {
            pattern: line.to_owned(),
            message,
        };

        let is_regex = syntax == Syntax::ExcludeFile
            && body.len() > 2
            && body.starts_with('/')
            && body.ends_with('/');
        let (kind, matcher) = if is_regex {
            let regex = Regex::new(&body[1..body.len() - 1]).map_err(|e| invalid(e.to_string()))?;
            (RuleKind::Regex, RuleMatcher::Regex(regex))
        } else {
            let mut builder = GitignoreBuilder::new(".");
            builder
                .add_line(None, body)
                .map_err(|e| invalid(e.to_string()))?;
            let gitignore = builder.build().map_err(|e| invalid(e.to_string()))?;
            let kind = if body.ends_with('/') {
                RuleKind::Directory
            } else if body.contains('*') {
                RuleKind::Glob
            } else {
                RuleKind::Pattern
            };
            (kind, RuleMatcher::Gitignore(gitignore))
        };

        Ok(Some(Self {
            pattern: line.to_owned(),
            body: body.to_owned(),
            negated,
            kind,
            matcher,
        }))
    }

    fn matches(&self, path: &str) -> bool {
        if path == self.body {
            return true;
        }
        match &self.matcher {
            RuleMatcher::Regex(regex) => regex.is_match(path),
            RuleMatcher::Gitignore(gitignore) => {
                let candidate = Path::new(path);
                // `matched_path_or_any_parents` only accepts paths relative to the matcher root.
                if candidate.has_root() {
                    candidate
                        .ancestors()
                        .any(|p| gitignore.matched(p, p != candidate).is_ignore())
                } else {
                    gitignore
                        .matched_path_or_any_parents(candidate, false)
                        .is_ignore()
                }
            }
        }
    }

    fn decide(&self, path: &str) -> ExcludeDecision {
        if self.negated {
            ExcludeDecision::Negated {
                pattern: self.pattern.clone(),
            }
        } else if path == self.body {
            ExcludeDecision::Exact {
                pattern: self.pattern.clone(),
            }
        } else {
            ExcludeDecision::Matched {
                kind: self.kind,
                pattern: self.pattern.clone(),
            }
        }
    }
}

/// Compiled exclusion rules. Immutable once built.
#[derive(Debug, Default)]
pub struct PatternMatcher {
    rules: Vec<Rule>,
}

impl PatternMatcher {
    /// A matcher with no rules; excludes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a matcher from pattern lines, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidExcludePattern`] for a line that is not a
    /// valid gitignore pattern or regex body.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rules = Vec::new();
        for line in lines {
            if let Some(rule) = Rule::parse(line, Syntax::ExcludeFile)? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    /// Load rules from the configured sources.
    ///
    /// VCS-ignore rules come first so the explicit exclude file can override them.
    ///
    /// # Errors
    ///
    /// Returns an error if the exclude file is required but missing or
    /// unreadable, or if it contains an invalid pattern. VCS-ignore problems are
    /// logged as warnings and never fail.
    pub fn load(config: &ExcludeConfig) -> Result<Self, ConfigError> {
        let mut rules = Vec::new();

        if config.use_gitignore {
            rules.extend(gitignore_rules(&config.gitignore_path));
        }

        if let Some(path) = &config.exclude_file {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    for line in content.lines() {
                        if let Some(rule) = Rule::parse(line, Syntax::ExcludeFile)? {
                            rules.push(rule);
                        }
                    }
                }
                Err(e) if config.exclude_file_required => {
                    return Err(if e.kind() == ErrorKind::NotFound {
                        ConfigError::ExcludeFileNotFound { path: path.clone() }
                    } else {
                        ConfigError::ExcludeFileRead {
                            path: path.clone(),
                            source: e,
                        }
                    });
                }
                Err(e) => {
                    warn!(
                        "exclude file {} could not be read ({e}); continuing without exclude patterns",
                        path.display()
                    );
                }
            }
        }

        Ok(Self { rules })
    }

    /// Number of active rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check a path and report which rule decided.
    #[must_use]
    pub fn check(&self, path: &str) -> ExcludeDecision {
        let path = normalize_path(path);
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(&path))
            .map_or(ExcludeDecision::Unmatched { path: path.clone() }, |rule| {
                rule.decide(&path)
            })
    }
}

impl Exclusion for PatternMatcher {
    fn is_excluded(&self, path: &str) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let decision = self.check(path);
        debug!("{decision}");
        decision.is_excluded()
    }
}

fn gitignore_rules(path: &Path) -> Vec<Rule> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(
                "unable to read gitignore file at {}, no gitignore patterns will be used: {e}",
                path.display()
            );
            return Vec::new();
        }
    };

    content
        .lines()
        .filter_map(|line| match Rule::parse(line, Syntax::VcsIgnore) {
            Ok(rule) => rule,
            Err(e) => {
                warn!("ignoring gitignore line: {e}");
                None
            }
        })
        .collect()
}
