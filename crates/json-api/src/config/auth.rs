//! Auth Config

use clap::Args;
use jiff::SignedDuration;

/// Identity token settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Secret used to sign identity tokens
    #[arg(long, env = "AUTH_SECRET", hide_env_values = true)]
    pub auth_secret: String,

    /// Token lifetime in seconds, 0 for tokens that never expire
    #[arg(long, env = "AUTH_TOKEN_TTL_SECONDS", default_value_t = 604_800)]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn token_ttl(&self) -> Option<SignedDuration> {
        if self.token_ttl_seconds == 0 {
            return None;
        }

        i64::try_from(self.token_ttl_seconds)
            .ok()
            .map(SignedDuration::from_secs)
    }
}
