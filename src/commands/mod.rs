pub mod edit_command;
pub mod inspect;
