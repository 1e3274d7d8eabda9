use knowbot_config::{Config, Credential};

/// Strategy for displaying configuration information.
///
/// Prints the effective configuration:
/// - Config file location
/// - API key (masked)
/// - Agent defaults (model, temperature, tokens, timeout, history window)
/// - Web search and Wikipedia availability
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::config_path()?;
        let config = Config::load()?;

        println!("=== knowbot Configuration ===\n");

        println!("Config File:");
        if path.exists() {
            println!("  Path: {}", path.display());
        } else {
            println!("  Path: {} (not found, using defaults)", path.display());
        }
        println!();

        let openrouter = &config.providers.openrouter;
        println!("OpenRouter:");
        println!("  Base URL: {}", openrouter.base_url);
        println!(
            "  API Key ({}): {}",
            openrouter.api_key_env,
            describe_credential(Credential::from_env(&openrouter.api_key_env).ok().as_ref())
        );
        println!();

        let agent = &config.agent;
        println!("Agent Defaults:");
        println!("  Model: {}", agent.model);
        println!("  Temperature: {}", agent.temperature);
        println!("  Max Tokens: {}", agent.max_tokens);
        println!("  Request Timeout: {}s", agent.request_timeout_secs);
        println!("  History Window: {} messages", agent.history_window);
        println!();

        println!("Tools:");
        println!(
            "  Web Search: {} (max {} results)",
            enabled_label(config.tools.search.enabled),
            config.tools.search.max_results
        );
        println!(
            "  Wikipedia: {} (language: {})",
            enabled_label(config.tools.wiki.enabled),
            config.tools.wiki.language
        );

        Ok(())
    }
}

fn describe_credential(credential: Option<&Credential>) -> String {
    credential.map_or_else(|| "(not set)".to_string(), Credential::masked)
}

const fn enabled_label(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
