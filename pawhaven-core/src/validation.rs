//! Input validation for account registration.
//!
//! Registration input is validated before it ever reaches the store: the
//! identifier must look like an email address and the secret must match its
//! confirmation. There is deliberately no length or strength policy beyond
//! this.

use regex::Regex;
use std::sync::OnceLock;

/// Identifier shape: non-empty local part, `@`, non-empty domain with at
/// least one dot and a non-empty final segment. Whitespace is excluded
/// everywhere; the identifier later becomes one line of the session record.
const IDENTIFIER_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@.\s]+$";

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    // The pattern is a literal; compilation cannot fail at runtime.
    IDENTIFIER.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).unwrap())
}

/// Checks whether `identifier` has the `local@domain.tld` shape accounts
/// are keyed by.
pub fn is_valid_identifier(identifier: &str) -> bool {
    identifier_regex().is_match(identifier)
}

/// Validates a registration form: identifier shape, non-empty secret, and
/// matching confirmation.
///
/// Returns `false` for any violation rather than reporting which field is
/// wrong; the presentation layer shows a single generic message, matching
/// the sign-up screen this backs.
pub fn validate_registration(identifier: &str, secret: &str, confirmation: &str) -> bool {
    if identifier.is_empty() || secret.is_empty() || confirmation.is_empty() {
        return false;
    }
    if !is_valid_identifier(identifier) {
        return false;
    }
    secret == confirmation
}
