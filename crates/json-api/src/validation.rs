//! Request body validation.

use std::sync::LazyLock;

use regex::Regex;
use salvo::prelude::StatusError;

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and is covered by tests"
)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile")
});

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 70;
const PASSWORD_MIN_CHARS: usize = 6;

/// Collects every failed rule so callers see all problems at once.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<&'static str>);

impl Violations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn check(&mut self, passed: bool, message: &'static str) -> &mut Self {
        if !passed {
            self.0.push(message);
        }

        self
    }

    /// Display names are between 3 and 70 characters.
    pub(crate) fn name(&mut self, name: &str) -> &mut Self {
        let chars = name.chars().count();

        self.check(chars >= NAME_MIN_CHARS, "Name must have at least 3 letters")
            .check(chars <= NAME_MAX_CHARS, "Name must have at most 70 letters")
    }

    pub(crate) fn email(&mut self, email: &str) -> &mut Self {
        self.check(EMAIL.is_match(email), "Email must be valid")
    }

    /// At least six characters with an uppercase letter, a lowercase letter and a digit.
    pub(crate) fn password(&mut self, password: &str) -> &mut Self {
        let strong = password.chars().count() >= PASSWORD_MIN_CHARS
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_digit());

        self.check(strong, "Password isn't strong enough")
    }

    pub(crate) fn finish(&self) -> Result<(), StatusError> {
        if self.0.is_empty() {
            return Ok(());
        }

        Err(StatusError::bad_request()
            .brief("Validation failed")
            .detail(self.0.join("; ")))
    }
}
