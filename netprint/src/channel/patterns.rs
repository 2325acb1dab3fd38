//! Pattern matching for prompt detection and vendor error output.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

/// Default prompt grammar: a line ending in `#`, `>` or `$`.
pub const DEFAULT_PROMPT_PATTERN: &str = r".*(#|>|\$)\s*$";

/// Error fragments printed by most vendor CLIs when a command is rejected.
pub const DEFAULT_ERROR_PATTERNS: &[&str] = &[
    r"% ?error",
    r"% ?invalid",
    r"% ?bad",
    r"% ?unknown",
    r"% ?incomplete",
    r"% ?unrecognized",
];

static DEFAULT_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_PROMPT_PATTERN).expect("default prompt pattern is valid")
});

static DEFAULT_ERRORS: LazyLock<RegexSet> = LazyLock::new(|| {
    compile_error_set(DEFAULT_ERROR_PATTERNS).expect("default error patterns are valid")
});

fn compile_error_set(patterns: &[&str]) -> Result<RegexSet, regex::Error> {
    let patterns: Vec<String> = patterns.iter().map(|p| format!("(?i){p}")).collect();
    RegexSet::new(patterns)
}

/// Recognises the command prompt in a block of session output.
#[derive(Debug, Clone)]
pub struct PromptGrammar {
    pattern: Regex,
}

impl PromptGrammar {
    /// Create a grammar from a custom line pattern.
    ///
    /// The pattern is matched against individual trimmed lines.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Find the live prompt in `output`.
    ///
    /// Lines are trimmed and blank lines ignored. The scan runs from the last
    /// line backwards, so the most recent prompt-like line wins.
    pub fn detect(&self, output: &str) -> Option<String> {
        output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .rev()
            .find(|line| self.is_prompt(line))
            .map(str::to_string)
    }

    /// Check whether a single line looks like a prompt.
    pub fn is_prompt(&self, line: &str) -> bool {
        self.pattern.is_match(line.trim())
    }
}

impl Default for PromptGrammar {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PROMPT.clone(),
        }
    }
}

/// Case-insensitive set of patterns signalling a rejected command.
#[derive(Debug, Clone)]
pub struct ErrorPatterns {
    set: RegexSet,
}

impl ErrorPatterns {
    /// Compile a custom set of error patterns (matched case-insensitively).
    pub fn new(patterns: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            set: compile_error_set(patterns)?,
        })
    }

    /// Return the first pattern that matches `output`, if any.
    pub fn find(&self, output: &str) -> Option<&str> {
        self.set
            .matches(output)
            .iter()
            .next()
            .map(|idx| self.set.patterns()[idx].trim_start_matches("(?i)"))
    }
}

impl Default for ErrorPatterns {
    fn default() -> Self {
        Self {
            set: DEFAULT_ERRORS.clone(),
        }
    }
}
