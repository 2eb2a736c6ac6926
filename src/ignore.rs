//! Ignore-file pattern matching.
//!
//! Compiles `.gitignore`-style lines into anchored regular expressions and
//! answers whether a root-relative, forward-slash path is ignored.  A path
//! is ignored when *any* rule fully matches it; there is no negation.
//!
//! Supported syntax: `*`, `**`, `?`, `[...]` classes, a leading `/` (anchor
//! to the root) and a trailing `/` (directory marker).  Lines that do not
//! compile are logged and skipped.

use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

/// One compiled ignore-file line.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// The pattern text as it appeared in the file (trimmed).
    pub pattern: String,
    /// Pattern ended with `/`.
    pub directory_only: bool,
    /// Pattern started with `/`.
    pub anchored: bool,
    regex: Regex,
}

impl IgnoreRule {
    /// Compile a single pattern line.
    ///
    /// Returns `None` for blank lines and `#` comments.
    pub fn compile(line: &str) -> Option<Result<Self, regex::Error>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut body = line;
        let directory_only = body.ends_with('/');
        if directory_only {
            body = &body[..body.len() - 1];
        }
        let anchored = body.starts_with('/');
        if anchored {
            body = &body[1..];
        }

        let mut source = String::with_capacity(body.len() * 2 + 16);
        source.push_str("(?s)^");
        if !anchored {
            source.push_str("(?:.*/)?");
        }
        source.push_str(&translate(body));
        source.push_str("(?:/.*)?$");

        Some(Regex::new(&source).map(|regex| Self {
            pattern: line.to_string(),
            directory_only,
            anchored,
            regex,
        }))
    }

    /// Full-string match against a root-relative path.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.regex.is_match(relative_path)
    }
}

/// Characters with regex meaning outside a bracket class.
const META: &[char] = &['.', '(', ')', '+', '{', '}', '^', '$', '|', '\\'];

/// Translate glob wildcards into regex syntax.
///
/// Only [`META`] is escaped.  Everything else passes through, so `[...]`
/// stays a character class (`[!...]` negates) and a malformed class makes
/// the pattern fail to compile.
fn translate(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    let mut in_class = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_class {
            match c {
                ']' => {
                    in_class = false;
                    out.push(']');
                }
                '!' if chars.get(i.wrapping_sub(1)) == Some(&'[') => out.push('^'),
                c if META.contains(&c) => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
            i += 1;
            continue;
        }

        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                // `**/` spans zero or more whole segments; a bare `**` spans anything.
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                in_class = true;
                out.push('[');
            }
            c if META.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }

    out
}

/// The ordered set of rules compiled from one ignore file.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    /// Rules that ignore nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile every pattern in `text`, skipping lines that fail to compile.
    pub fn parse(text: &str) -> Self {
        let mut rules = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            match IgnoreRule::compile(line) {
                None => {}
                Some(Ok(rule)) => rules.push(rule),
                Some(Err(e)) => {
                    warn!(line = lineno + 1, pattern = %line.trim(), error = %e, "skipping uncompilable ignore pattern");
                }
            }
        }
        Self { rules }
    }

    /// Read and compile an ignore file.
    ///
    /// A missing or unreadable file yields empty rules; it never fails.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let rules = Self::parse(&text);
                debug!(path = %path.display(), rules = rules.len(), "ignore rules loaded");
                rules
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::empty(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read ignore file, nothing will be ignored");
                Self::empty()
            }
        }
    }

    /// `true` when at least one rule matches `relative_path`.
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.rules.iter().any(|r| r.matches(relative_path))
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(patterns: &[&str]) -> IgnoreRules {
        IgnoreRules::parse(&patterns.join("\n"))
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let r = IgnoreRules::parse("\n   \n# comment\n  # indented comment\n*.log\n");
        assert_eq!(r.len(), 1);
        assert_eq!(r.rules()[0].pattern, "*.log");
    }

    #[test]
    fn rule_flags() {
        let dir = IgnoreRule::compile("/out/").unwrap().unwrap();
        assert!(dir.anchored);
        assert!(dir.directory_only);

        let plain = IgnoreRule::compile("notes").unwrap().unwrap();
        assert!(!plain.anchored);
        assert!(!plain.directory_only);
    }

    #[test]
    fn mixed_patterns_against_literal_paths() {
        let r = rules(&["*.tmp", "/out/", "notes"]);
        assert!(r.is_ignored("a.tmp"));
        assert!(r.is_ignored("out/x.txt"));
        assert!(r.is_ignored("notes"));
        assert!(r.is_ignored("sub/notes"));
        assert!(!r.is_ignored("keep.txt"));
    }

    #[test]
    fn star_does_not_cross_segments() {
        let r = rules(&["/src/*.rs"]);
        assert!(r.is_ignored("src/main.rs"));
        assert!(!r.is_ignored("src/nested/main.rs"));
    }

    #[test]
    fn suffix_match_is_full_string() {
        let r = rules(&["*.log"]);
        assert!(r.is_ignored("app.log"));
        assert!(r.is_ignored("logs/app.log"));
        assert!(!r.is_ignored("app.log.bak"));
        assert!(!r.is_ignored("applog"));
    }

    #[test]
    fn anchored_pattern_only_matches_top_level() {
        let r = rules(&["/README.MD"]);
        assert!(r.is_ignored("README.MD"));
        assert!(!r.is_ignored("sub/README.MD"));
    }

    #[test]
    fn unanchored_directory_matches_at_any_depth() {
        let r = rules(&["build/"]);
        assert!(r.is_ignored("build"));
        assert!(r.is_ignored("build/out.txt"));
        assert!(r.is_ignored("a/build/out.txt"));
        assert!(!r.is_ignored("rebuild"));
        assert!(!r.is_ignored("build.rs"));
    }

    #[test]
    fn question_mark_matches_one_non_separator() {
        let r = rules(&["file?.txt"]);
        assert!(r.is_ignored("file1.txt"));
        assert!(!r.is_ignored("file10.txt"));
        assert!(!r.is_ignored("file/.txt"));
    }

    #[test]
    fn double_star_spans_segments() {
        let r = rules(&["docs/**/draft.md", "/cache/**"]);
        assert!(r.is_ignored("docs/draft.md"));
        assert!(r.is_ignored("docs/a/b/draft.md"));
        assert!(r.is_ignored("cache/x/y"));
        assert!(!r.is_ignored("docs/final.md"));
    }

    #[test]
    fn metacharacters_are_literal() {
        let r = rules(&["a+b(1).{x}$|^"]);
        assert!(r.is_ignored("a+b(1).{x}$|^"));
        assert!(!r.is_ignored("aab(1)x{x}$|^"));
    }

    #[test]
    fn bracket_class_matches_one_listed_char() {
        let r = rules(&["*.[oa]", "*.py[cod]"]);
        assert!(r.is_ignored("main.o"));
        assert!(r.is_ignored("lib/libfoo.a"));
        assert!(r.is_ignored("pkg/mod.pyc"));
        assert!(!r.is_ignored("main.c"));
        assert!(!r.is_ignored("mod.py"));
        assert!(!r.is_ignored("main.[oa]"));
    }

    #[test]
    fn negated_bracket_class() {
        let r = rules(&["v[!0-9].txt"]);
        assert!(r.is_ignored("vx.txt"));
        assert!(!r.is_ignored("v1.txt"));
    }

    #[test]
    fn malformed_class_is_skipped() {
        assert!(matches!(IgnoreRule::compile("[z-a]"), Some(Err(_))));
        assert!(matches!(IgnoreRule::compile("unclosed[ab"), Some(Err(_))));

        let r = IgnoreRules::parse("[z-a]\nok\n");
        assert_eq!(r.len(), 1);
        assert_eq!(r.rules()[0].pattern, "ok");
        assert!(r.is_ignored("ok"));
    }

    #[test]
    fn descendants_of_ignored_file_pattern_are_ignored() {
        let r = rules(&["target"]);
        assert!(r.is_ignored("target/debug/app"));
    }

    #[test]
    fn unreadable_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gitignore");
        std::fs::create_dir(&path).unwrap();
        let r = IgnoreRules::load(&path);
        assert!(r.is_empty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let r = IgnoreRules::load(&dir.path().join(".gitignore"));
        assert!(r.is_empty());
        assert!(!r.is_ignored("anything"));
    }
}
