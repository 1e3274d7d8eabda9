//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is a separate strategy type with its own input, so
//! dispatch is resolved at compile time.

use std::sync::Arc;
use std::time::Duration;

use knowbot_config::Config;
use knowbot_conversation::{SessionConfig, SessionManager};
use knowbot_core::{Collaborator, EncyclopediaProvider, LLMProvider, SearchProvider};
use knowbot_providers::{DuckDuckGoSearch, OpenRouterProvider, WikipediaProvider};
use tracing::{info, warn};

mod chat;
mod info;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         // Command logic here
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Freeze the loaded configuration into per-session settings.
fn session_config(config: &Config) -> SessionConfig {
    let agent = &config.agent;
    SessionConfig {
        model: agent.model.clone(),
        temperature: agent.temperature,
        max_tokens: agent.max_tokens,
        request_timeout: agent.request_timeout(),
        history_window: agent.history_window,
        search_results: config.tools.search.max_results,
    }
}

/// Resolve the web search collaborator once, at startup.
fn resolve_search(config: &Config, timeout: Duration) -> Collaborator<Arc<dyn SearchProvider>> {
    if !config.tools.search.enabled {
        info!("Web search disabled in config");
        return Collaborator::Unavailable;
    }

    match DuckDuckGoSearch::with_base_url(&config.tools.search.base_url, timeout) {
        Ok(search) => Collaborator::Available(Arc::new(search)),
        Err(e) => {
            warn!("Web search unavailable: {e:#}");
            Collaborator::Unavailable
        }
    }
}

/// Resolve the encyclopedia collaborator once, at startup.
fn resolve_wiki(
    config: &Config,
    timeout: Duration,
) -> Collaborator<Arc<dyn EncyclopediaProvider>> {
    if !config.tools.wiki.enabled {
        info!("Wikipedia lookups disabled in config");
        return Collaborator::Unavailable;
    }

    match WikipediaProvider::new(&config.tools.wiki.language, timeout) {
        Ok(wiki) => Collaborator::Available(Arc::new(wiki)),
        Err(e) => {
            warn!("Wikipedia lookups unavailable: {e:#}");
            Collaborator::Unavailable
        }
    }
}

/// Build a ready-to-use session from configuration.
///
/// The credential is resolved first; a missing key aborts here, before any
/// session exists.
fn build_session(config: &Config) -> anyhow::Result<SessionManager> {
    config.validate()?;
    let credential = config.credential()?;
    let session_config = session_config(config);
    let timeout = session_config.request_timeout;

    let openrouter = &config.providers.openrouter;
    let provider = OpenRouterProvider::new(credential.expose().to_string(), timeout)?
        .with_base_url(openrouter.base_url.clone())
        .with_attribution(openrouter.referer.clone(), openrouter.title.clone());
    let provider: Arc<dyn LLMProvider> = Arc::new(provider);

    Ok(SessionManager::new(provider, session_config)
        .with_search(resolve_search(config, timeout))
        .with_encyclopedia(resolve_wiki(config, timeout)))
}
