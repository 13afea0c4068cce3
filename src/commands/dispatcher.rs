use super::CommandContext;
use super::handler::{
    ClearCommand, HelpCommand, ListFilesCommand, QuitCommand, ReadFileCommand, SearchFilesCommand,
    WorkspaceInfoCommand,
};
use super::registry::CommandRegistry;
use crate::core::error::ChatError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        ctx: &mut CommandContext<'_>,
    ) -> Result<Option<String>, ChatError> {
        self.registry.execute(command, args, ctx)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("read", ReadFileCommand);
    registry.register("list", ListFilesCommand);
    registry.register("search", SearchFilesCommand);
    registry.register("workspace", WorkspaceInfoCommand);
    registry.register_alias("info", "workspace");
    registry.register("help", HelpCommand);
    registry.register("clear", ClearCommand);
    registry.register("quit", QuitCommand);

    CommandDispatcher::new(Arc::new(registry))
}
