use crate::cli::Args;
use crate::commands::dispatcher::CommandDispatcher;
use crate::core::error::ChatError;
use crate::display::{self, UserChoice};
use crate::input;
use crate::parser::FileSuggestion;
use crate::session::{ChatSession, TurnOutcome};
use is_terminal::IsTerminal;
use std::io::{self, Read};

pub struct Application {
    args: Args,
    session: ChatSession,
    dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(args: Args, session: ChatSession, dispatcher: CommandDispatcher) -> Self {
        Self {
            args,
            session,
            dispatcher,
        }
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        let piped_context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        if let Some(path) = self.args.send_file.clone() {
            self.session.inject_file_context(&path)?;
            display::display_info(&format!("Added \"{path}\" to the conversation context."));
        }

        if self.args.chat {
            self.run_chat(piped_context).await
        } else {
            self.run_one_shot(piped_context).await
        }
    }

    async fn run_one_shot(&mut self, piped_context: Option<String>) -> Result<(), ChatError> {
        let query = match (self.args.query.as_deref(), piped_context) {
            (Some(arg_q), Some(stdin_ctx)) => format!("<pipe>{}</pipe>\n\n{}", stdin_ctx, arg_q),
            (None, Some(stdin_ctx)) => format!("<pipe>{}</pipe>", stdin_ctx),
            (Some(arg_q), None) => arg_q.to_string(),
            (None, None) => {
                return Err(ChatError::Input(
                    "No query provided. Pass a question or use --chat.".to_string(),
                ));
            }
        };

        match self.session.submit(&query).await? {
            TurnOutcome::Reply { text, suggestions } => {
                display::display_reply(&text);
                self.confirm_and_apply(&suggestions);
            }
            TurnOutcome::Command { output } => {
                if let Some(output) = output {
                    display::display_info(&output);
                }
            }
        }

        Ok(())
    }

    async fn run_chat(&mut self, piped_context: Option<String>) -> Result<(), ChatError> {
        if let Some(context) = piped_context {
            if !context.trim().is_empty() {
                self.session
                    .push_context(&format!("<pipe>{}</pipe>", context));
            }
        }

        display::display_info(
            "Entering chat mode. Type '/help' for available commands. Press Ctrl+D or type /quit to exit.",
        );

        let mut editor = input::create_editor(self.dispatcher.clone())?;

        while self.session.should_continue() {
            let Some(line) = input::read_input(&mut editor)? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match self.session.submit(&line).await {
                Ok(TurnOutcome::Reply { text, suggestions }) => {
                    display::display_reply(&text);
                    self.confirm_and_apply(&suggestions);
                }
                Ok(TurnOutcome::Command { output }) => {
                    if let Some(output) = output {
                        display::display_info(&output);
                    }
                }
                Err(e) => {
                    display::display_error(&e);
                }
            }
        }

        input::save_history(&mut editor)?;
        Ok(())
    }

    /// Each pending suggestion needs an explicit accept before it touches
    /// disk, unless confirmation is configured away.
    fn confirm_and_apply(&self, suggestions: &[FileSuggestion]) {
        for suggestion in suggestions {
            let auto_accept = self.args.yes || self.session.config().write_without_prompt;
            let accepted = auto_accept
                || matches!(
                    display::prompt_suggestion_confirmation(suggestion),
                    UserChoice::Accept
                );

            if !accepted {
                display::display_file_skipped(&suggestion.path);
                continue;
            }

            match self.session.apply_suggestion(suggestion) {
                Ok(()) => display::display_file_written(&suggestion.path),
                Err(e) => display::display_error(&e),
            }
        }
    }
}
