//! The session manager: single entry point for every line of user input.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use knowbot_core::{
    ChatMessage, ChatRequest, Collaborator, EncyclopediaProvider, LLMProvider, ProviderError,
    SearchProvider,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::command::Command;
use crate::format;
use crate::history::History;

/// Settings fixed for the lifetime of a [`SessionManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Model identifier sent with every chat request
    pub model: String,
    /// Sampling temperature, 0 to 2
    pub temperature: f32,
    /// Cap on reply length
    pub max_tokens: u32,
    /// Upper bound on any single collaborator call
    pub request_timeout: Duration,
    /// Messages kept in the history window
    pub history_window: usize,
    /// Results shown for a web search
    pub search_results: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "deepseek/deepseek-chat".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            request_timeout: Duration::from_secs(30),
            history_window: 6,
            search_results: 3,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }
}

/// Conversation state plus the collaborators needed to answer the user.
///
/// One instance serves one conversation. `handle` takes `&mut self`, so
/// callers that share a manager across tasks must serialize access
/// themselves (for example behind a `tokio::sync::Mutex`).
pub struct SessionManager<P = Arc<dyn LLMProvider>>
where
    P: LLMProvider,
{
    id: Uuid,
    provider: P,
    search: Collaborator<Arc<dyn SearchProvider>>,
    encyclopedia: Collaborator<Arc<dyn EncyclopediaProvider>>,
    config: SessionConfig,
    history: History,
    created_at: DateTime<Utc>,
}

impl<P> SessionManager<P>
where
    P: LLMProvider,
{
    /// Create a session with empty history and no lookup collaborators.
    pub fn new(provider: P, config: SessionConfig) -> Self {
        let id = Uuid::now_v7();
        info!(
            "Creating session {id} (model: {}, window: {})",
            config.model, config.history_window
        );

        Self {
            id,
            provider,
            search: Collaborator::Unavailable,
            encyclopedia: Collaborator::Unavailable,
            history: History::new(config.history_window),
            config,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: Collaborator<Arc<dyn SearchProvider>>) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn with_encyclopedia(
        mut self,
        encyclopedia: Collaborator<Arc<dyn EncyclopediaProvider>>,
    ) -> Self {
        self.encyclopedia = encyclopedia;
        self
    }

    /// Answer one line of user input.
    ///
    /// Never fails: collaborator errors come back as explanatory text.
    pub async fn handle(&mut self, raw_input: &str) -> String {
        match Command::parse(raw_input) {
            Command::Clear => {
                info!("[{}] Command: clear", self.id);
                self.clear();
                format::MEMORY_CLEARED.to_string()
            }
            Command::Search(query) => {
                info!("[{}] Command: search {query:?}", self.id);
                self.search(query).await
            }
            Command::Wiki(term) => {
                info!("[{}] Command: wiki {term:?}", self.id);
                self.lookup(term).await
            }
            Command::Chat(message) => self.chat(message).await,
        }
    }

    /// Drop every remembered turn.
    pub fn clear(&mut self) {
        self.history.clear();
        debug!("[{}] History cleared", self.id);
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn search_available(&self) -> bool {
        self.search.is_available()
    }

    #[must_use]
    pub const fn wiki_available(&self) -> bool {
        self.encyclopedia.is_available()
    }

    /// Run a chat turn.
    ///
    /// The user message is recorded before the request goes out and stays
    /// recorded when the request fails, so the next turn still sends it as
    /// context. Only a successful reply is appended after it.
    async fn chat(&mut self, message: &str) -> String {
        self.history.push(ChatMessage::user(message));

        let request = ChatRequest {
            model: &self.config.model,
            messages: self.history.messages(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        debug!(
            "[{}] Chat request with {} message(s)",
            self.id,
            request.messages.len()
        );

        let result = bounded(self.config.request_timeout, self.provider.chat(&request)).await;

        match result {
            Ok(reply) => {
                self.history.push(ChatMessage::assistant(reply.content.clone()));
                reply.content
            }
            Err(e) => {
                warn!("[{}] Chat request failed ({}): {e}", self.id, e.kind());
                format::chat_error(&e)
            }
        }
    }

    async fn search(&self, query: &str) -> String {
        let Some(search) = self.search.as_available() else {
            return format::SEARCH_UNAVAILABLE.to_string();
        };

        let result = bounded(
            self.config.request_timeout,
            search.search(query, self.config.search_results),
        )
        .await;

        match result {
            Ok(mut hits) => {
                hits.truncate(self.config.search_results);
                format::search_results(&hits)
            }
            Err(e) => {
                warn!("[{}] Search failed ({}): {e}", self.id, e.kind());
                format::search_error(&e)
            }
        }
    }

    async fn lookup(&self, term: &str) -> String {
        let Some(encyclopedia) = self.encyclopedia.as_available() else {
            return format::WIKI_UNAVAILABLE.to_string();
        };

        let result = bounded(self.config.request_timeout, async {
            match encyclopedia.resolve(term).await? {
                Some(title) => encyclopedia.article(&title).await.map(Some),
                None => Ok(None),
            }
        })
        .await;

        match result {
            Ok(Some(article)) => format::article(&article),
            Ok(None) => format::ARTICLE_NOT_FOUND.to_string(),
            Err(e) => {
                warn!("[{}] Wikipedia lookup failed ({}): {e}", self.id, e.kind());
                format::wiki_error(&e)
            }
        }
    }
}

/// Bound a collaborator call by `timeout`, whatever the collaborator's own
/// client does.
async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(ProviderError::Timeout(timeout)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use knowbot_core::{Article, LLMResponse, Role, SearchHit};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Chat fake: replays scripted outcomes and records every request.
    #[derive(Default)]
    struct ScriptedChat {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
        delay: Option<Duration>,
    }

    impl ScriptedChat {
        fn answering(count: usize) -> Self {
            let replies = (0..count).map(|i| Ok(format!("reply {i}"))).collect();
            Self {
                replies: Mutex::new(replies),
                ..Self::default()
            }
        }

        fn then(self, outcome: Result<String, ProviderError>) -> Self {
            if let Ok(mut replies) = self.replies.lock() {
                replies.push_back(outcome);
            }
            self
        }

        fn sent(&self) -> Vec<Vec<ChatMessage>> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedChat {
        async fn chat(&self, request: &ChatRequest<'_>) -> Result<LLMResponse, ProviderError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.messages.to_vec());
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let next = self
                .replies
                .lock()
                .ok()
                .and_then(|mut replies| replies.pop_front());
            match next {
                Some(Ok(content)) => Ok(LLMResponse {
                    content,
                    usage: None,
                }),
                Some(Err(e)) => Err(e),
                None => Err(ProviderError::MalformedResponse("script exhausted".into())),
            }
        }
    }

    #[derive(Default)]
    struct FakeSearch {
        hits: Vec<SearchHit>,
        fail: bool,
        queries: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl SearchProvider for FakeSearch {
        async fn search(
            &self,
            query: &str,
            max_results: usize,
        ) -> Result<Vec<SearchHit>, ProviderError> {
            if let Ok(mut queries) = self.queries.lock() {
                queries.push((query.to_string(), max_results));
            }
            if self.fail {
                return Err(ProviderError::Status {
                    status: 429,
                    body: "rate limited".into(),
                });
            }
            Ok(self.hits.clone())
        }
    }

    struct FakeWiki {
        titles: Vec<String>,
        summary: String,
    }

    #[async_trait]
    impl EncyclopediaProvider for FakeWiki {
        async fn resolve(&self, _query: &str) -> Result<Option<String>, ProviderError> {
            Ok(self.titles.first().cloned())
        }

        async fn article(&self, title: &str) -> Result<Article, ProviderError> {
            Ok(Article {
                title: title.to_string(),
                summary: self.summary.clone(),
            })
        }
    }

    fn session(chat: ScriptedChat) -> SessionManager<Arc<ScriptedChat>> {
        SessionManager::new(Arc::new(chat), SessionConfig::default())
    }

    fn hits(count: usize) -> Vec<SearchHit> {
        (0..count)
            .map(|i| SearchHit {
                title: format!("Result {i}"),
                body: format!("{i}{}", "z".repeat(300)),
            })
            .collect()
    }

    #[tokio::test]
    async fn window_holds_after_four_turns() {
        let mut manager = session(ScriptedChat::answering(4));
        for i in 0..4 {
            let reply = manager.handle(&format!("question {i}")).await;
            assert_eq!(reply, format!("reply {i}"));
            assert!(manager.history().len() <= 6);
        }

        let history = manager.history().messages();
        assert_eq!(history.len(), 6);
        assert_eq!(history[0], ChatMessage::user("question 1"));
        assert_eq!(history[5], ChatMessage::assistant("reply 3"));
    }

    #[tokio::test]
    async fn request_replays_window_in_order() {
        let chat = Arc::new(ScriptedChat::answering(4));
        let mut manager = SessionManager::new(chat.clone(), SessionConfig::default());
        for i in 0..4 {
            manager.handle(&format!("q{i}")).await;
        }

        let sent = chat.sent();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], vec![ChatMessage::user("q0")]);
        // fourth request: oldest user message evicted to make room
        let fourth: Vec<&str> = sent[3].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(fourth, vec!["reply 0", "q1", "reply 1", "q2", "reply 2", "q3"]);
    }

    #[tokio::test]
    async fn failed_turn_keeps_user_message() {
        let chat = Arc::new(ScriptedChat::answering(1).then(Err(ProviderError::Status {
            status: 500,
            body: "internal error".into(),
        })));
        let mut manager = SessionManager::new(chat.clone(), SessionConfig::default());

        manager.handle("first").await;
        let reply = manager.handle("second").await;

        assert!(reply.starts_with("Sorry, I encountered an issue."));
        assert!(reply.contains("HTTP status 500"));
        assert_eq!(manager.history().len(), 3);
        assert_eq!(
            manager.history().last(),
            Some(&ChatMessage::user("second"))
        );
    }

    #[tokio::test]
    async fn unanswered_message_is_resent_as_context() {
        let chat = Arc::new(
            ScriptedChat::default()
                .then(Err(ProviderError::Transport("connection reset".into())))
                .then(Ok("better now".into())),
        );
        let mut manager = SessionManager::new(chat.clone(), SessionConfig::default());

        manager.handle("lost").await;
        assert_eq!(manager.handle("retry").await, "better now");

        let sent = chat.sent();
        assert_eq!(
            sent[1],
            vec![ChatMessage::user("lost"), ChatMessage::user("retry")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let chat = ScriptedChat {
            delay: Some(Duration::from_secs(120)),
            ..ScriptedChat::answering(1)
        };
        let config = SessionConfig::default().with_request_timeout(Duration::from_secs(5));
        let mut manager = SessionManager::new(Arc::new(chat), config);

        let reply = manager.handle("hello?").await;

        assert_eq!(
            reply,
            "Sorry, I encountered an issue. Error: request timed out after 5s"
        );
        assert_eq!(manager.history().last(), Some(&ChatMessage::user("hello?")));
        assert_eq!(manager.history().len(), 1);
    }

    #[tokio::test]
    async fn clear_keyword_empties_history() {
        let mut manager = session(ScriptedChat::answering(5));
        for i in 0..5 {
            manager.handle(&format!("q{i}")).await;
        }
        assert!(!manager.history().is_empty());

        assert_eq!(manager.handle("  Clear ").await, format::MEMORY_CLEARED);
        assert!(manager.history().is_empty());
    }

    #[tokio::test]
    async fn search_does_not_touch_history() {
        let search = Arc::new(FakeSearch {
            hits: hits(5),
            ..FakeSearch::default()
        });
        let mut manager = session(ScriptedChat::answering(1))
            .with_search(Collaborator::Available(search.clone()));
        manager.handle("hello").await;

        let reply = manager.handle("search: rust programming").await;

        assert_eq!(manager.history().len(), 2);
        assert_eq!(reply.matches("Result ").count(), 3);
        assert!(reply.contains(&format!("**1. Result 0**\n0{}...", "z".repeat(149))));
        assert!(!reply.contains("Result 3"));
        let queries = search.queries.lock().map(|q| q.clone()).unwrap_or_default();
        assert_eq!(queries, vec![("rust programming".to_string(), 3)]);
    }

    #[tokio::test]
    async fn search_query_is_trimmed() {
        let search = Arc::new(FakeSearch::default());
        let mut manager =
            session(ScriptedChat::default()).with_search(Collaborator::Available(search.clone()));

        let reply = manager.handle("  search:  rust  ").await;

        assert_eq!(reply, format::NO_SEARCH_RESULTS);
        let queries = search.queries.lock().map(|q| q.clone()).unwrap_or_default();
        assert_eq!(queries[0].0, "rust");
        assert!(manager.history().is_empty());
    }

    #[tokio::test]
    async fn search_failure_is_reported() {
        let search = Arc::new(FakeSearch {
            fail: true,
            ..FakeSearch::default()
        });
        let mut manager =
            session(ScriptedChat::default()).with_search(Collaborator::Available(search));

        let reply = manager.handle("search: anything").await;
        assert_eq!(reply, "Search error: HTTP status 429: rate limited");
        assert!(manager.history().is_empty());
    }

    #[tokio::test]
    async fn wiki_returns_title_and_capped_summary() {
        let wiki = Arc::new(FakeWiki {
            titles: vec!["Alan Turing".to_string()],
            summary: "s".repeat(800),
        });
        let mut manager =
            session(ScriptedChat::default()).with_encyclopedia(Collaborator::Available(wiki));

        let reply = manager.handle("wiki: Alan Turing").await;

        assert!(reply.starts_with("**Wikipedia: Alan Turing**"));
        assert!(reply.ends_with(&format!("{}...", "s".repeat(500))));
        assert!(manager.history().is_empty());
    }

    #[tokio::test]
    async fn wiki_without_hits_is_informational() {
        let wiki = Arc::new(FakeWiki {
            titles: Vec::new(),
            summary: String::new(),
        });
        let mut manager =
            session(ScriptedChat::default()).with_encyclopedia(Collaborator::Available(wiki));

        assert_eq!(
            manager.handle("wiki: qwxzzy").await,
            format::ARTICLE_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn unavailable_collaborators_answer_plainly() {
        let mut manager = session(ScriptedChat::default());
        assert!(!manager.search_available());
        assert!(!manager.wiki_available());

        assert_eq!(manager.handle("search: x").await, format::SEARCH_UNAVAILABLE);
        assert_eq!(manager.handle("wiki: x").await, format::WIKI_UNAVAILABLE);
        assert!(manager.history().is_empty());
    }

    #[tokio::test]
    async fn marker_inside_text_is_chat() {
        let chat = Arc::new(ScriptedChat::answering(1));
        let mut manager = SessionManager::new(chat.clone(), SessionConfig::default());

        assert_eq!(manager.handle("what does wiki: mean").await, "reply 0");
        assert_eq!(chat.sent()[0][0].content, "what does wiki: mean");
        assert_eq!(manager.history().messages()[0].role, Role::User);
    }

    #[tokio::test]
    async fn custom_window_is_honoured() {
        let config = SessionConfig::default().with_history_window(2);
        let mut manager = SessionManager::new(Arc::new(ScriptedChat::answering(3)), config);
        for i in 0..3 {
            manager.handle(&format!("q{i}")).await;
        }
        assert_eq!(manager.history().len(), 2);
        assert_eq!(manager.history().window(), 2);
    }
}
