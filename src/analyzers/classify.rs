//! Commit message classification heuristics.
//!
//! A commit counts as a defect fix when its message contains one of a fixed
//! keyword table (English plus Chinese variants), matched case-insensitively
//! over the whole message. This is a heuristic: messages like "fix typo in
//! README" match and silent fixes without keywords do not. Both are a known
//! limitation of message mining, not something this module corrects.

/// Keywords that mark a commit as a defect fix.
pub const FIX_KEYWORDS: &[&str] = &[
    "fix", "bug", "error", "issue", "patch", "correct", "hotfix", "bugfix", "修复", "错误",
];

/// Result of classifying one commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether the message indicates a defect fix.
    pub is_fix: bool,
    /// The keyword that matched, for diagnostics.
    pub matched: Option<String>,
}

impl Classification {
    fn fix(keyword: &str) -> Self {
        Self {
            is_fix: true,
            matched: Some(keyword.to_string()),
        }
    }

    fn not_a_fix() -> Self {
        Self {
            is_fix: false,
            matched: None,
        }
    }
}

/// Classify a commit message against the built-in keyword table.
pub fn classify(message: &str) -> Classification {
    classify_with(message, &[])
}

/// Classify against the built-in table plus configured extra keywords.
pub fn classify_with(message: &str, extra_keywords: &[String]) -> Classification {
    let lower = message.to_lowercase();
    for keyword in FIX_KEYWORDS {
        if lower.contains(keyword) {
            return Classification::fix(keyword);
        }
    }
    for keyword in extra_keywords {
        if lower.contains(&keyword.to_lowercase()) {
            return Classification::fix(keyword);
        }
    }
    Classification::not_a_fix()
}

/// Convenience predicate over [`classify`].
pub fn is_bug_fix(message: &str) -> bool {
    classify(message).is_fix
}
