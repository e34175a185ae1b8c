pub mod dispatcher;
pub mod handler;
pub mod json_command;
pub mod listener;
