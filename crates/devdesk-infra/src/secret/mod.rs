//! Secret resolution for devdesk.
//!
//! API keys only ever come from the process environment (optionally seeded
//! from a `.env` file) and are held as [`secrecy::SecretString`].

pub mod env;
