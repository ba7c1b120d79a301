//! Authentication

mod errors;
pub mod password;
mod service;
pub mod token;

pub use errors::*;
pub use service::*;
pub use token::{IdentityClaims, SigningSecret, TokenError, TokenSigner};
