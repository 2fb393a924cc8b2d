pub mod bot;
pub mod chatbot;
pub mod config;
pub mod error;
pub mod intent;
pub mod navy;

pub use bot::run;
