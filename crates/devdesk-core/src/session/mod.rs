//! Process-wide session storage.
//!
//! `SessionStore` owns every chat history. Callers only ever receive
//! snapshot clones; mutation goes through `append`.

pub mod store;

pub use store::{SessionStore, TurnHandle};
