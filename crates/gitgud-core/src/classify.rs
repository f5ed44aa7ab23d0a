//! Prompt classification and prompt filters.
//!
//! Categories are an ordered list of keyword rules evaluated top to
//! bottom; the first rule with a matching keyword wins, and the trailing
//! `general` rule has no keywords and catches everything else. The list
//! is data-driven so new categories are additive.
//!
//! The triviality filter and skip-intent detector are exact-match
//! companions: trivial prompts never advance the request counter, and
//! skip phrases only take effect while a task is pending.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic category of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Security,
    Api,
    Database,
    Debug,
    Test,
    Architecture,
    Frontend,
    Function,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Api => "api",
            Category::Database => "database",
            Category::Debug => "debug",
            Category::Test => "test",
            Category::Architecture => "architecture",
            Category::Frontend => "frontend",
            Category::Function => "function",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct CategoryRule {
    category: Category,
    /// Substring keywords; empty slice means match-all fallback.
    keywords: &'static [&'static str],
    exercises: &'static [&'static str],
}

/// Ordered rule list. Order is significant: first match wins.
const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Security,
        keywords: &[
            "auth", "login", "logout", "password", "token", "jwt", "session", "security",
            "encrypt", "hash", "credential", "permission", "role", "oauth", "apikey", "2fa", "mfa",
        ],
        exercises: &[
            "Write a password validation function that checks security requirements (length, complexity, special characters).",
            "Implement a function to sanitize user input and prevent injection attacks.",
            "Create a helper function to verify user permissions/roles.",
        ],
    },
    CategoryRule {
        category: Category::Api,
        keywords: &[
            "api", "endpoint", "route", "rest", "request", "response", "http", "fetch", "axios",
            "graphql", "webhook", "cors",
        ],
        exercises: &[
            "Write a validation schema/model for the request body or response of this endpoint.",
            "Implement a middleware function or decorator to handle a cross-cutting concern (logging, timing, error handling).",
            "Create a helper function to format error responses consistently.",
        ],
    },
    CategoryRule {
        category: Category::Database,
        keywords: &[
            "database", "query", "sql", "model", "schema", "migration", "table", "record",
            "repository", "orm", "prisma", "mongoose", "postgres", "mysql", "mongo",
        ],
        exercises: &[
            "Write a sanitization function to prevent SQL injection or validate data before insertion.",
            "Implement a helper function for paginating query results.",
            "Create a transformation function between the database model and the DTO/response.",
        ],
    },
    CategoryRule {
        category: Category::Debug,
        keywords: &[
            "bug", "debug", "error", "crash", "broken", "issue", "exception", "trace",
            "not working", "fails", "failing",
        ],
        exercises: &[
            "Write a test that reproduces the described bug. The test should fail before the fix and pass after.",
            "Implement a logging/debug helper function to trace data flow at this point in the code.",
            "Create a validation function that prevents this type of error in the future.",
        ],
    },
    CategoryRule {
        category: Category::Test,
        keywords: &[
            "test", "spec", "assert", "pytest", "jest", "unittest", "coverage", "mock", "stub",
            "spy", "vitest", "mocha",
        ],
        exercises: &[
            "Write a test for a non-obvious edge case of this functionality. Think about empty inputs, null, numeric limits.",
            "Implement an integration test that verifies the interaction between multiple components.",
            "Create a fixture or factory function to generate reusable test data.",
        ],
    },
    CategoryRule {
        category: Category::Architecture,
        keywords: &[
            "refactor", "restructure", "reorganize", "architect", "pattern", "solid", "abstract",
            "interface", "decouple", "modular",
        ],
        exercises: &[
            "Extract an interface/protocol that defines the contract for this component.",
            "Implement a factory or builder pattern for creating this object.",
            "Create a base class/module that can be extended for variants of this functionality.",
        ],
    },
    CategoryRule {
        category: Category::Frontend,
        keywords: &[
            "component", "react", "vue", "angular", "svelte", "nextjs", "nuxt", "tailwind", "css",
            "scss", "sass", "html", "style", "button", "form", "page",
        ],
        exercises: &[
            "Write a reusable presentational component (button, input, card) that you could use in this feature.",
            "Implement a custom hook or composable to manage local state for this component.",
            "Create a form validation function for the input fields of this feature.",
        ],
    },
    CategoryRule {
        category: Category::Function,
        keywords: &[
            "function", "implement", "create", "add", "write", "build", "make", "develop",
        ],
        exercises: &[
            "Write a related helper function that could be useful for this implementation. Think about input validation, output formatting, or common utilities.",
            "Implement a validation function for the main parameters of this feature. Consider edge cases and input types.",
            "Create a utility function that extracts/transforms the data needed for this operation.",
        ],
    },
    CategoryRule {
        category: Category::General,
        keywords: &[],
        exercises: &[
            "Write a utility function that could be useful in the context of this request.",
            "Implement a unit test for an existing related functionality.",
            "Create a data validation or transformation function relevant to this task.",
        ],
    },
];

/// Acknowledgment phrases that never count as a request.
const TRIVIAL_PHRASES: &[&str] = &[
    "ok", "okay", "thanks", "thank you", "thx", "ty", "yes", "no", "sure", "got it", "understood",
    "perfect", "great", "good", "nice", "cool", "fine", "k", "y", "n", "yep", "nope", "alright",
    "right", "correct", "done", "next",
];

/// Exact phrases expressing skip intent.
const SKIP_PHRASES: &[&str] = &[
    "skip",
    "/skip",
    "skip this",
    "skip task",
    "skip it",
    "i want to skip",
    "let me skip",
    "can i skip",
    "skippa",
    "salta",
];

/// Minimum trimmed length for a prompt to count.
const MIN_PROMPT_LEN: usize = 10;

/// Map a prompt to its topic category. First matching rule wins; always
/// returns a valid category.
pub fn classify(prompt: &str) -> Category {
    let lower = prompt.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|kw| lower.contains(kw)) {
            return rule.category;
        }
    }
    Category::General
}

/// Fixed exercise list for a category.
pub fn exercises(category: Category) -> &'static [&'static str] {
    RULES
        .iter()
        .find(|r| r.category == category)
        .map(|r| r.exercises)
        .unwrap_or(&[])
}

/// Whether a prompt is too short or a bare acknowledgment.
pub fn is_trivial(prompt: &str) -> bool {
    let trimmed = prompt.trim();
    if trimmed.len() < MIN_PROMPT_LEN {
        return true;
    }
    let lower = trimmed.to_lowercase();
    // Acknowledgments may carry an optional "." then "!".
    let stripped = lower.strip_suffix('!').unwrap_or(&lower);
    let stripped = stripped.strip_suffix('.').unwrap_or(stripped);
    TRIVIAL_PHRASES.contains(&stripped)
}

/// Whether the whole prompt is a skip phrase.
pub fn is_skip_request(prompt: &str) -> bool {
    let lower = prompt.trim().to_lowercase();
    SKIP_PHRASES.contains(&lower.as_str())
}
