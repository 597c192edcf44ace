//! Adapters that call a real vision endpoint over HTTP.

pub mod chat_completions;
