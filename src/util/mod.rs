//! Small helpers shared by the library and the CLI.

pub mod token_claims;
