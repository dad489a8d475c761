pub mod backend;
pub mod config;
pub mod exchange;
pub mod history;
pub mod input;
pub mod state;

// Re-export main types for convenience
pub use backend::{BackendError, ChatBackend, HttpBackend, DEFAULT_ENDPOINT, FAILURE_TEXT};
pub use config::Config;
pub use exchange::{Completion, ExchangeController, Ticket, DEFAULT_GREETING};
pub use history::ChatHistory;
pub use input::InputBuffer;
pub use state::{ChatEntry, Sender};
