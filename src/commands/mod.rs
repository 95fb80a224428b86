pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::{CommandDispatcher, create_command_registry, parse_command_line};
