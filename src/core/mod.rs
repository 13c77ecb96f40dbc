//! Process-wide state and the loaded site.

mod site;
mod state;

pub use site::Site;
pub use state::{is_serving, is_shutdown, register_server, set_serving, setup_shutdown_handler};
