//! One-off administrative commands: seeding the tables and issuing tokens.

pub mod seed;
pub mod tokens;
