use std::borrow::Cow::{self, Borrowed, Owned};
use std::env;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tracing_subscriber::EnvFilter;

use solace_core::emotion::EmotionLabel;
use solace_core::generation::TextGenerator;
use solace_core::session::{SessionStore, TurnRole};
use solace_core::vision::Frame;
use solace_engine::{
    ChatRequest, ChatService, EmotionDetectionService, EmotionHistoryCache, ResponseArbitrator,
};
use solace_infrastructure::{
    DirSessionStore, FullFrameLocalizer, MemorySessionStore, StaticEmotionEstimator,
};
use solace_interaction::OpenAiGenerator;

/// Environment variable selecting a persistent store directory.
const ENV_DATA_DIR: &str = "SOLACE_DATA_DIR";

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/detect".to_string(),
                "/feel".to_string(),
                "/history".to_string(),
                "/new".to_string(),
                "/stats".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// The main entry point for the Solace readline REPL application.
///
/// Wires a session store (in-memory, or TOML documents when `SOLACE_DATA_DIR`
/// is set), an optional OpenAI-backed generator auto-detected from the
/// environment, and the chat and detection services, then runs a colored
/// rustyline loop. `/feel <emotion>` simulates the facial signal a camera
/// client would send alongside each message; `/detect` runs the built-in
/// detection pipeline on a synthetic frame.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let store: Arc<dyn SessionStore> = match env::var(ENV_DATA_DIR) {
        Ok(dir) => {
            tracing::info!("[Repl] Using directory store at {}", dir);
            Arc::new(DirSessionStore::new(&dir).await?)
        }
        Err(_) => Arc::new(MemorySessionStore::new()),
    };

    let generator: Option<Arc<dyn TextGenerator>> = match OpenAiGenerator::try_from_env() {
        Ok(generator) => {
            println!(
                "{}",
                format!("Generative responses enabled (model: {})", generator.model())
                    .bright_black()
            );
            Some(Arc::new(generator))
        }
        Err(err) => {
            println!(
                "{}",
                format!("{} - using rule-based responses", err).bright_black()
            );
            None
        }
    };

    let history = Arc::new(EmotionHistoryCache::new());
    let chat = ChatService::new(
        store.clone(),
        ResponseArbitrator::new(generator),
        history.clone(),
    );
    let detection = EmotionDetectionService::new(
        Arc::new(FullFrameLocalizer::new()),
        Arc::new(StaticEmotionEstimator::new()),
        store.clone(),
        history,
    );

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Solace REPL ===".bright_magenta().bold());
    println!(
        "{}",
        "Say what's on your mind. '/feel <emotion>' simulates a facial reading, '/detect' runs the detection pipeline, '/history' and '/stats' inspect the session, '/new' starts over, 'quit' exits."
            .bright_black()
    );
    println!();

    // Session state: the first message creates the session; /feel is sticky
    // until cleared or a new session starts.
    let mut session_id: Option<String> = None;
    let mut current_emotion: Option<EmotionLabel> = None;

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                // Handle quit command
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Take care of yourself. Goodbye!".bright_green());
                    break;
                }

                // Skip empty lines
                if trimmed.is_empty() {
                    continue;
                }

                // Add to history
                let _ = rl.add_history_entry(&line);

                if trimmed.starts_with('/') {
                    handle_command(
                        trimmed,
                        &chat,
                        &detection,
                        &mut session_id,
                        &mut current_emotion,
                    )
                    .await;
                    continue;
                }

                // Display user input in green
                println!("{}", format!("> {}", trimmed).green());

                let mut request = ChatRequest::new(trimmed);
                if let Some(id) = &session_id {
                    request = request.with_session(id.clone());
                }
                if let Some(emotion) = current_emotion {
                    request = request.with_current_emotion(emotion);
                }

                match chat.respond(&request).await {
                    Ok(reply) => {
                        session_id = Some(reply.session_id.clone());
                        if reply.crisis_detected {
                            println!(
                                "{}",
                                "[crisis support resources follow]".bright_red().bold()
                            );
                        }
                        for line in reply.response_text.lines() {
                            println!("{}", line.bright_blue());
                        }
                        println!();
                    }
                    Err(err) => {
                        eprintln!("{}", format!("Error: {}", err).red());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Dispatches one slash command against the running services.
async fn handle_command(
    input: &str,
    chat: &ChatService,
    detection: &EmotionDetectionService,
    session_id: &mut Option<String>,
    current_emotion: &mut Option<EmotionLabel>,
) {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or_default();

    match command {
        "/new" => {
            *session_id = None;
            *current_emotion = None;
            println!(
                "{}",
                "Started fresh. Your next message opens a new session.".bright_black()
            );
        }
        "/feel" => match parts.next() {
            Some("clear") | Some("none") => {
                *current_emotion = None;
                println!("{}", "Cleared the simulated facial reading.".bright_black());
            }
            Some(name) => match EmotionLabel::from_name(name) {
                Some(label) => {
                    *current_emotion = Some(label);
                    println!(
                        "{}",
                        format!("Simulating a detected facial emotion: {}", label)
                            .bright_black()
                    );
                }
                None => {
                    let known: Vec<&str> =
                        EmotionLabel::ALL.iter().map(EmotionLabel::as_str).collect();
                    eprintln!(
                        "{}",
                        format!("Unknown emotion '{}'. Try one of: {}", name, known.join(", "))
                            .red()
                    );
                }
            },
            None => {
                println!(
                    "{}",
                    "Usage: /feel <emotion> to simulate a reading, /feel clear to stop."
                        .bright_black()
                );
            }
        },
        "/detect" => {
            let id = match ensure_session(chat, session_id).await {
                Some(id) => id,
                None => return,
            };
            // A synthetic mid-grey frame stands in for a camera capture.
            let frame = Frame::new(160, 120, vec![128; 160 * 120 * 3]);
            match detection.detect(&frame, Some(id.as_str())).await {
                Ok(reading) => {
                    println!(
                        "{}",
                        format!(
                            "Faces: {}  Dominant: {}  Confidence: {:.2}",
                            reading.faces_detected, reading.dominant_emotion, reading.confidence
                        )
                        .bright_magenta()
                    );
                    for (label, weight) in reading.emotions.iter() {
                        println!("{}", format!("  {:<9} {:.3}", label, weight).bright_black());
                    }
                }
                Err(err) => eprintln!("{}", format!("Detection failed: {}", err).red()),
            }
        }
        "/history" => {
            let Some(id) = session_id.as_deref() else {
                println!("{}", "No session yet - say something first.".bright_black());
                return;
            };
            match chat.conversation_history(id, 20).await {
                Ok(turns) if turns.is_empty() => {
                    println!("{}", "The session has no turns yet.".bright_black());
                }
                Ok(turns) => {
                    for turn in turns {
                        println!("{}", format!("[{}]", turn.role.as_str()).bright_magenta());
                        for line in turn.content.lines() {
                            match turn.role {
                                TurnRole::User => println!("{}", line.green()),
                                TurnRole::Assistant => println!("{}", line.bright_blue()),
                            }
                        }
                        println!();
                    }
                }
                Err(err) => eprintln!("{}", format!("Error: {}", err).red()),
            }
        }
        "/stats" => {
            let Some(id) = session_id.as_deref() else {
                println!("{}", "No session yet - say something first.".bright_black());
                return;
            };
            match chat.stats(id).await {
                Ok(stats) => {
                    println!(
                        "{}",
                        format!(
                            "Session {}  messages: {}  created: {}  updated: {}",
                            stats.session_id,
                            stats.message_count,
                            stats.created_at,
                            stats.updated_at
                        )
                        .bright_magenta()
                    );
                    if stats.emotion_distribution.is_empty() {
                        println!("{}", "  no emotion readings logged".bright_black());
                    }
                    for label in EmotionLabel::ALL {
                        if let Some(occurrence) = stats.emotion_distribution.get(&label) {
                            println!(
                                "{}",
                                format!(
                                    "  {:<9} seen {} time(s), avg confidence {:.2}",
                                    label, occurrence.count, occurrence.avg_confidence
                                )
                                .bright_black()
                            );
                        }
                    }
                }
                Err(err) => eprintln!("{}", format!("Error: {}", err).red()),
            }
        }
        _ => {
            println!("{}", "Unknown command".bright_black());
        }
    }
}

/// Returns the current session id, creating a session when none exists yet.
async fn ensure_session(chat: &ChatService, session_id: &mut Option<String>) -> Option<String> {
    if let Some(id) = session_id.as_deref() {
        return Some(id.to_string());
    }
    match chat.create_session().await {
        Ok(id) => {
            *session_id = Some(id.clone());
            Some(id)
        }
        Err(err) => {
            eprintln!("{}", format!("Error: {}", err).red());
            None
        }
    }
}
