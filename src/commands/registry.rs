use crate::commands::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::core::error::ChatError;
use std::collections::HashMap;
use std::sync::Arc;

pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: CommandHandler + 'static>(&mut self, name: &str, command: C) {
        self.handlers.insert(name.to_string(), Arc::new(command));
    }

    /// Registers a second name for an already-registered command.
    pub fn register_alias(&mut self, alias: &str, target: &str) {
        if let Some(handler) = self.handlers.get(target).cloned() {
            self.handlers.insert(alias.to_string(), handler);
        }
    }

    /// Unknown command names are an informational result, not an error.
    pub fn execute(
        &self,
        name: &str,
        args: &[&str],
        ctx: &mut CommandContext<'_>,
    ) -> Result<Option<String>, ChatError> {
        match self.handlers.get(name) {
            Some(handler) => handler.execute(ctx, args),
            None => Ok(Some(format!(
                "Unknown command: /{name}\nType /help for available commands."
            ))),
        }
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}
