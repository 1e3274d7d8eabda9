//! Conversation command: a single message, or the interactive REPL.

use knowbot_config::Config;
use tracing::info;

use super::build_session;
use crate::repl::Repl;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional model override
    pub model: Option<String>,
    /// Optional temperature override
    pub temperature: Option<f32>,
    /// Optional history window override
    pub history_window: Option<usize>,
}

impl ChatInput {
    /// Apply command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.agent.model.clone_from(model);
        }
        if let Some(temperature) = self.temperature {
            config.agent.temperature = temperature;
        }
        if let Some(window) = self.history_window {
            config.agent.history_window = window;
        }
    }
}

/// Strategy for executing the Chat command.
///
/// Builds one session for the lifetime of the process and hands it to the
/// presentation layer that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        input.apply(&mut config);

        let mut session = build_session(&config)?;
        info!("Session {} ready", session.id());

        if let Some(msg) = input.message {
            let reply = session.handle(&msg).await;
            println!("{reply}");
        } else {
            Repl::new(session).run().await?;
        }

        Ok(())
    }
}
