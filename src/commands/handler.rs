use crate::commands::CommandContext;
use crate::conversation::Role;
use crate::core::error::ChatError;
use crate::workspace::FileKind;
use crate::workspace::store::DEFAULT_LIST_DEPTH;

/// Search output is capped tighter than the store default so command
/// results stay readable in the chat transcript.
const SEARCH_RESULT_CAP: usize = 50;

pub trait CommandHandler: Send + Sync {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        args: &[&str],
    ) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct ReadFileCommand;
pub struct ListFilesCommand;
pub struct SearchFilesCommand;
pub struct WorkspaceInfoCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct QuitCommand;

impl CommandHandler for ReadFileCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        if args.is_empty() {
            return Ok(Some(
                "Usage: /read <file-path>\nExample: /read src/main.rs".to_string(),
            ));
        }

        let path = args.join(" ");
        let content = ctx.workspace.read_file(&path)?;

        // Inject the file into the history so the model can reference it
        // in the next exchange.
        ctx.conversation.push(
            Role::User,
            format!("I'm showing you the content of file \"{path}\":\n\n```\n{content}\n```"),
        );

        Ok(Some(format!("File \"{path}\":\n\n```\n{content}\n```")))
    }

    fn help(&self) -> &'static str {
        "/read <file-path> - Read a file and add it to the conversation context"
    }
}

impl CommandHandler for ListFilesCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let dir = args.join(" ");
        let entries = ctx.workspace.list_files(&dir, false, DEFAULT_LIST_DEPTH)?;

        let label = if dir.is_empty() {
            "project root"
        } else {
            dir.as_str()
        };
        if entries.is_empty() {
            return Ok(Some(format!("No files found in \"{label}\"")));
        }

        let mut output = format!("Files in \"{label}\" ({} items):\n\n", entries.len());
        for entry in &entries {
            let icon = match entry.kind {
                FileKind::Directory => "📁",
                FileKind::File => "📄",
            };
            output.push_str(&format!("{icon} {}\n", entry.name));
        }

        Ok(Some(output))
    }

    fn help(&self) -> &'static str {
        "/list [directory] - List files in a directory (default: project root)"
    }
}

impl CommandHandler for SearchFilesCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        if args.is_empty() {
            return Ok(Some(
                "Usage: /search <pattern>\nExample: /search *.rs".to_string(),
            ));
        }

        let pattern = args.join(" ");
        let files = ctx.workspace.search_files(&pattern, SEARCH_RESULT_CAP)?;

        if files.is_empty() {
            return Ok(Some(format!("No files found matching \"{pattern}\"")));
        }

        let mut output = format!("Files matching \"{pattern}\" ({} results):\n\n", files.len());
        for file in &files {
            output.push_str(&format!("📄 {file}\n"));
        }
        if files.len() == SEARCH_RESULT_CAP {
            output.push_str(&format!("\n(Limited to first {SEARCH_RESULT_CAP} results)"));
        }

        Ok(Some(output))
    }

    fn help(&self) -> &'static str {
        "/search <pattern> - Search for files matching a glob pattern"
    }
}

impl CommandHandler for WorkspaceInfoCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let metadata = ctx.workspace.metadata()?;

        let mark = |present: bool| if present { "✅" } else { "❌" };
        let output = format!(
            "Workspace Information:\n\n\
             📁 Name: {}\n\
             📂 Path: {}\n\
             {} Git Repository\n\
             {} Node.js Project",
            metadata.name,
            metadata.root_path.display(),
            mark(metadata.has_git),
            mark(metadata.has_package_json),
        );

        Ok(Some(output))
    }

    fn help(&self) -> &'static str {
        "/workspace - Show workspace information (alias: /info)"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _ctx: &mut CommandContext<'_>,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let help_text = [
            "Available Commands:",
            ReadFileCommand.help(),
            ListFilesCommand.help(),
            SearchFilesCommand.help(),
            WorkspaceInfoCommand.help(),
            ClearCommand.help(),
            HelpCommand.help(),
            QuitCommand.help(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show this help message"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        ctx.conversation.reset(ctx.system_prompt);
        Ok(Some("Conversation cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Clear conversation history"
    }
}

impl CommandHandler for QuitCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        *ctx.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}
