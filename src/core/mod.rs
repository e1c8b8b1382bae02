//! Process-wide state shared by the long-running commands.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
