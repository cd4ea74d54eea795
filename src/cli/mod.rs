mod commands;
mod handlers;

pub use commands::{ActionCommand, ActionSubcommand, Cli, Commands};
pub use handlers::{
    handle_action_add, handle_action_delete, handle_action_edit, handle_choices, handle_init,
    handle_list, handle_show, handle_status,
};
