pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::conversation::Conversation;
use crate::workspace::WorkspaceStore;

pub use dispatcher::create_command_registry;

/// Everything a slash-command handler may touch. Commands never call the
/// remote model.
pub struct CommandContext<'a> {
    pub workspace: &'a WorkspaceStore,
    pub conversation: &'a mut Conversation,
    pub system_prompt: &'a str,
    pub should_continue: &'a mut bool,
}
