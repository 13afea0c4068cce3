use crate::commands::{CommandContext, dispatcher::CommandDispatcher};
use crate::config::Config;
use crate::conversation::{Conversation, Role};
use crate::core::error::ChatError;
use crate::parser::{self, FileSuggestion};
use crate::provider::LlmClient;
use crate::workspace::WorkspaceStore;
use tracing::{debug, warn};

/// What a single user turn produced. The presentation layer decides how to
/// render it and when to confirm pending suggestions.
#[derive(Debug)]
pub enum TurnOutcome {
    /// An assistant reply, with any file-write proposals extracted from it.
    Reply {
        text: String,
        suggestions: Vec<FileSuggestion>,
    },
    /// Informational output from a slash-command. Commands never call the
    /// remote model.
    Command { output: Option<String> },
}

/// One chat session: owns the history, the sandboxed workspace handle, and
/// the provider. `submit` takes `&mut self`, so turns are serialized and at
/// most one remote call is in flight.
pub struct ChatSession {
    config: Config,
    conversation: Conversation,
    workspace: WorkspaceStore,
    provider: Box<dyn LlmClient>,
    dispatcher: CommandDispatcher,
    should_continue: bool,
}

impl ChatSession {
    pub fn new(
        config: Config,
        workspace: WorkspaceStore,
        provider: Box<dyn LlmClient>,
        dispatcher: CommandDispatcher,
    ) -> Self {
        let conversation = Conversation::new(&config.system_prompt);
        Self {
            config,
            conversation,
            workspace,
            provider,
            dispatcher,
            should_continue: true,
        }
    }

    pub fn should_continue(&self) -> bool {
        self.should_continue
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Handles one user turn: either a slash-command dispatched to the
    /// workspace, or a plain message sent to the model.
    pub async fn submit(&mut self, input: &str) -> Result<TurnOutcome, ChatError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(TurnOutcome::Command { output: None });
        }

        if let Some(command_line) = input.strip_prefix('/') {
            return self.dispatch_command(command_line);
        }

        self.conversation.push(Role::User, input);
        self.conversation.trim(self.config.max_history_messages);

        // On failure the user's turn stays recorded and no assistant turn
        // is appended, so the history stays consistent for a retry.
        let reply = match self.provider.send(self.conversation.messages()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "LLM call failed");
                return Err(e);
            }
        };

        self.conversation.push(Role::Assistant, reply.clone());

        let suggestions = parser::extract_suggestions(&reply);
        debug!(suggestions = suggestions.len(), "parsed assistant reply");

        Ok(TurnOutcome::Reply { text: reply, suggestions })
    }

    fn dispatch_command(&mut self, command_line: &str) -> Result<TurnOutcome, ChatError> {
        let parts: Vec<&str> = command_line.split_whitespace().collect();
        let Some((name, args)) = parts.split_first() else {
            return Ok(TurnOutcome::Command { output: None });
        };

        let name = name.to_lowercase();
        let mut ctx = CommandContext {
            workspace: &self.workspace,
            conversation: &mut self.conversation,
            system_prompt: &self.config.system_prompt,
            should_continue: &mut self.should_continue,
        };

        let output = self.dispatcher.execute(&name, args, &mut ctx)?;
        Ok(TurnOutcome::Command { output })
    }

    /// Appends user-role context (for example piped stdin) without calling
    /// the model.
    pub fn push_context(&mut self, text: &str) {
        self.conversation.push(Role::User, text.to_string());
    }

    /// Reads a workspace file through the sandbox and injects it into the
    /// history as a user-role context message (the `--send-file` helper).
    pub fn inject_file_context(&mut self, relative_path: &str) -> Result<(), ChatError> {
        let content = self.workspace.read_file(relative_path)?;
        self.conversation.push(
            Role::User,
            format!(
                "I'm showing you the content of file \"{relative_path}\":\n\n```\n{content}\n```"
            ),
        );
        Ok(())
    }

    /// Writes an accepted suggestion. The path and size guards run
    /// unconditionally; confirmation policy only decides who calls this.
    pub fn apply_suggestion(&self, suggestion: &FileSuggestion) -> Result<(), ChatError> {
        self.workspace
            .write_file(&suggestion.path, &suggestion.content, self.config.max_file_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;
    use crate::conversation::Message;
    use crate::workspace::DirProject;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct FixedClient {
        reply: String,
        seen: Arc<Mutex<Vec<usize>>>,
    }

    impl FixedClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl LlmClient for FixedClient {
        async fn send(&self, messages: &[Message]) -> Result<String, ChatError> {
            self.seen.lock().unwrap().push(messages.len());
            Ok(self.reply.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn send(&self, _messages: &[Message]) -> Result<String, ChatError> {
            Err(ChatError::Timeout)
        }
    }

    fn session_with(dir: &TempDir, provider: Box<dyn LlmClient>, config: Config) -> ChatSession {
        let workspace = WorkspaceStore::new(Box::new(DirProject::new(dir.path().to_path_buf())));
        ChatSession::new(config, workspace, provider, create_command_registry())
    }

    #[tokio::test]
    async fn plain_turn_records_both_sides_of_the_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(
            &dir,
            Box::new(FixedClient::new("sure thing")),
            Config::default(),
        );

        let outcome = session.submit("hello").await.unwrap();
        match outcome {
            TurnOutcome::Reply { text, suggestions } => {
                assert_eq!(text, "sure thing");
                assert!(suggestions.is_empty());
            }
            other => panic!("expected a reply, got {other:?}"),
        }

        let roles: Vec<Role> = session
            .conversation()
            .messages()
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn reply_with_annotated_fence_yields_a_pending_suggestion() {
        let dir = tempfile::tempdir().unwrap();
        let reply = "Here:\n```file path=\"src/Foo.txt\"\nhello\n```";
        let mut session =
            session_with(&dir, Box::new(FixedClient::new(reply)), Config::default());

        let outcome = session.submit("make a file").await.unwrap();
        let TurnOutcome::Reply { suggestions, .. } = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].path, "src/Foo.txt");
        assert_eq!(suggestions[0].content, "hello");

        // Nothing is written until the suggestion is explicitly applied.
        assert!(!dir.path().join("src/Foo.txt").exists());
        session.apply_suggestion(&suggestions[0]).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/Foo.txt")).unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn provider_failure_keeps_user_turn_and_adds_no_assistant_turn() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir, Box::new(FailingClient), Config::default());

        let result = session.submit("hello").await;
        assert!(matches!(result, Err(ChatError::Timeout)));

        let roles: Vec<Role> = session
            .conversation()
            .messages()
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
    }

    #[tokio::test]
    async fn history_is_trimmed_before_the_remote_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.max_history_messages = 3;
        let client = FixedClient::new("ok");
        let seen = Arc::clone(&client.seen);
        let mut session = session_with(&dir, Box::new(client), config);

        for turn in ["one", "two", "three", "four"] {
            session.submit(turn).await.unwrap();
        }

        // After trimming, at most 3 messages go over the wire per call.
        assert!(seen.lock().unwrap().iter().all(|&n| n <= 3));

        // The system directive survives every trim.
        assert_eq!(session.conversation().messages()[0].role, Role::System);
    }

    #[tokio::test]
    async fn suggestion_with_traversal_path_is_rejected_at_apply_time() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(
            &dir,
            Box::new(FixedClient::new("n/a")),
            Config::default(),
        );

        let malicious = FileSuggestion {
            path: "../outside.txt".to_string(),
            content: "nope".to_string(),
        };
        assert!(matches!(
            session.apply_suggestion(&malicious),
            Err(ChatError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn oversized_suggestion_is_rejected_at_apply_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.max_file_size = 4;
        let session = session_with(&dir, Box::new(FixedClient::new("n/a")), config);

        let too_big = FileSuggestion {
            path: "big.txt".to_string(),
            content: "12345".to_string(),
        };
        assert!(matches!(
            session.apply_suggestion(&too_big),
            Err(ChatError::ContentTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn read_command_injects_context_for_the_next_exchange() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "remember").unwrap();
        let mut session = session_with(
            &dir,
            Box::new(FixedClient::new("ok")),
            Config::default(),
        );

        let outcome = session.submit("/read notes.txt").await.unwrap();
        let TurnOutcome::Command { output } = outcome else {
            panic!("expected command output");
        };
        assert!(output.unwrap().contains("remember"));

        let last = session.conversation().messages().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last.content.contains("remember"));
    }

    #[tokio::test]
    async fn traversal_read_command_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(
            &dir,
            Box::new(FixedClient::new("ok")),
            Config::default(),
        );

        let result = session.submit("/read ../../etc/passwd").await;
        assert!(matches!(result, Err(ChatError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn unknown_command_is_informational() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(
            &dir,
            Box::new(FixedClient::new("ok")),
            Config::default(),
        );

        let outcome = session.submit("/bogus arg").await.unwrap();
        let TurnOutcome::Command { output } = outcome else {
            panic!("expected command output");
        };
        assert!(output.unwrap().contains("Unknown command: /bogus"));
    }

    #[tokio::test]
    async fn quit_command_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(
            &dir,
            Box::new(FixedClient::new("ok")),
            Config::default(),
        );

        assert!(session.should_continue());
        session.submit("/quit").await.unwrap();
        assert!(!session.should_continue());
    }

    #[tokio::test]
    async fn inject_file_context_goes_through_the_sandbox() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ctx.txt"), "context body").unwrap();
        let mut session = session_with(
            &dir,
            Box::new(FixedClient::new("ok")),
            Config::default(),
        );

        session.inject_file_context("ctx.txt").unwrap();
        assert!(
            session
                .conversation()
                .messages()
                .last()
                .unwrap()
                .content
                .contains("context body")
        );

        assert!(matches!(
            session.inject_file_context("../etc/passwd"),
            Err(ChatError::InvalidPath(_))
        ));
    }
}
