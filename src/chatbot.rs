//! AI chatbot module - handles bot mentions and relays API results.

mod handler;
mod response;

pub use handler::handle_mention;
