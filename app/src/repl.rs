//! Terminal front end.
//!
//! Owns the only `SessionManager` of the process and a separate transcript
//! of what was shown to the human. Exit keywords never reach the session.

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use knowbot_conversation::{Command, SessionManager};
use knowbot_core::{ChatMessage, LLMProvider};
use tracing::info;

const EXIT_KEYWORDS: [&str; 3] = ["exit", "quit", "bye"];

/// Outcome of feeding one line to the REPL.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Exit,
    Skip,
    Reply {
        /// Shown before the reply, e.g. what is being looked up
        notice: Option<String>,
        reply: String,
    },
}

pub struct Repl<P = Arc<dyn LLMProvider>>
where
    P: LLMProvider,
{
    session: SessionManager<P>,
    transcript: Vec<ChatMessage>,
}

impl<P> Repl<P>
where
    P: LLMProvider,
{
    pub const fn new(session: SessionManager<P>) -> Self {
        Self {
            session,
            transcript: Vec::new(),
        }
    }

    /// Process one raw line of input.
    pub async fn step(&mut self, line: &str) -> Step {
        let input = line.trim();
        if EXIT_KEYWORDS.iter().any(|k| input.eq_ignore_ascii_case(k)) {
            return Step::Exit;
        }
        if input.is_empty() {
            return Step::Skip;
        }

        let command = Command::parse(input);
        let notice = match command {
            Command::Search(query) => Some(format!("📝 Searching for: {query}")),
            Command::Wiki(term) => Some(format!("📝 Looking up Wikipedia: {term}")),
            Command::Clear | Command::Chat(_) => None,
        };

        let reply = self.session.handle(input).await;

        if command == Command::Clear {
            self.transcript.clear();
        } else {
            self.transcript.push(ChatMessage::user(input));
            self.transcript.push(ChatMessage::assistant(reply.clone()));
        }

        Step::Reply { notice, reply }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        print_banner();

        let stdin = std::io::stdin();
        loop {
            print!("👤 You: ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if stdin.read_line(&mut line)? == 0 {
                println!();
                break;
            }

            match self.step(&line).await {
                Step::Exit => {
                    println!("\n🤖 Bot: Goodbye! Thanks for chatting!");
                    break;
                }
                Step::Skip => {}
                Step::Reply { notice, reply } => {
                    if let Some(notice) = notice {
                        println!("\n{notice}\n");
                    }
                    println!("🤖 Bot: {reply}\n");
                }
            }
        }

        let elapsed = Utc::now() - self.session.created_at();
        let stats = self.session.history().stats();
        info!(
            "Session {} ended after {}s: {} transcript entries, {} messages in window (~{} tokens)",
            self.session.id(),
            elapsed.num_seconds(),
            self.transcript.len(),
            stats.total_messages,
            stats.estimated_tokens
        );

        Ok(())
    }

    #[cfg(test)]
    fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }
}

fn print_banner() {
    println!("{}", "=".repeat(70));
    println!("🤖  KNOWLEDGE BOT - COMMAND LINE VERSION");
    println!("{}", "=".repeat(70));
    println!("\n📝 Commands:");
    println!("  • Type your question and press Enter");
    println!("  • 'search: <query>' - Web search");
    println!("  • 'wiki: <query>' - Wikipedia lookup");
    println!("  • 'clear' - Clear conversation memory");
    println!("  • 'exit' or 'quit' - Exit program");
    println!("\n{}\n", "-".repeat(70));
}
