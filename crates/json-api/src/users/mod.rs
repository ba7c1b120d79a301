//! Users (admin management)

mod errors;
mod handlers;

pub(crate) use handlers::*;
