//! # Interactive session
//!
//! A line-oriented front end over a [`RagSession`]. Lines starting with `/` are
//! commands; anything else is a question for the current user.
//!
//! | Command | Effect |
//! |---|---|
//! | `/user ID` | switch the current user |
//! | `/profile LEVEL STYLE` | create or update the current user's profile |
//! | `/add TOPIC DIFFICULTY CONTENT…` | add a document to the knowledge base |
//! | `/stats` | show interaction and user counts |
//! | `/help` | list commands |
//! | `/quit` | leave |
//!
//! The loop is generic over its input and output so it can be driven from tests.

use crossterm::{
    ExecutableCommand,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::error::Error;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::profile::{ExpertiseLevel, Preferences, ResponseStyle};
use crate::session::RagSession;

const HELP: &str = "\
Commands:
  /user ID                          switch the current user
  /profile LEVEL STYLE              create or update the current user's profile
                                    LEVEL: beginner | intermediate | expert
                                    STYLE: professional | casual | technical | creative
  /add TOPIC DIFFICULTY CONTENT...  add a document (TOPIC is one word)
  /stats                            show system stats
  /help                             show this help
  /quit                             leave
Anything else is asked as a question.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    SwitchUser(String),
    Profile(ExpertiseLevel, ResponseStyle),
    AddDocument {
        topic: String,
        difficulty: ExpertiseLevel,
        content: String,
    },
    Stats,
    Help,
    Quit,
    Empty,
}

/// Parse one input line. Errors are user-facing messages.
pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Empty);
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(ReplCommand::Ask(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let command = parts.next().unwrap_or_default();

    match command {
        "user" => match (parts.next(), parts.next()) {
            (Some(id), None) => Ok(ReplCommand::SwitchUser(id.to_string())),
            _ => Err("usage: /user ID".to_string()),
        },
        "profile" => match (parts.next(), parts.next(), parts.next()) {
            (Some(level), Some(style), None) => {
                Ok(ReplCommand::Profile(level.parse()?, style.parse()?))
            }
            _ => Err("usage: /profile LEVEL STYLE".to_string()),
        },
        "add" => {
            let (Some(topic), Some(difficulty)) = (parts.next(), parts.next()) else {
                return Err("usage: /add TOPIC DIFFICULTY CONTENT...".to_string());
            };
            Ok(ReplCommand::AddDocument {
                topic: topic.to_string(),
                difficulty: difficulty.parse()?,
                content: parts.collect::<Vec<_>>().join(" "),
            })
        }
        "stats" => Ok(ReplCommand::Stats),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command: /{other} (try /help)")),
    }
}

/// Run the loop until `/quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    session: &mut RagSession,
    mut user_id: String,
    input: R,
    mut output: W,
) -> Result<(), Box<dyn Error>> {
    writeln!(output, "PersonalKnowledgeRAG: personalized knowledge assistant")?;
    writeln!(output, "Type /help for commands.")?;
    prompt(&mut output, &user_id)?;

    for line in input.lines() {
        let line = line?;
        debug!("Input: {:?}", line);

        match parse_line(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(ReplCommand::Empty) => {}
            Ok(ReplCommand::Help) => writeln!(output, "{HELP}")?,
            Ok(ReplCommand::SwitchUser(id)) => {
                user_id = id;
                writeln!(output, "Now asking as {user_id}")?;
            }
            Ok(ReplCommand::Profile(level, style)) => {
                session.create_or_update_profile(&user_id, Preferences::new(level, style));
                success(&mut output, "Profile updated!")?;
            }
            Ok(ReplCommand::AddDocument {
                topic,
                difficulty,
                content,
            }) => match session.add_topic_document(&content, &topic, difficulty) {
                Ok(id) => success(
                    &mut output,
                    &format!("Document added with ID: {}...", &id[..8]),
                )?,
                Err(e) => failure(&mut output, &e.to_string())?,
            },
            Ok(ReplCommand::Stats) => print_stats(session, &user_id, &mut output)?,
            Ok(ReplCommand::Ask(question)) => {
                match session.get_personalized_answer(&question, &user_id) {
                    Ok(answer) => {
                        output.execute(SetAttribute(Attribute::Bold))?;
                        writeln!(output, "Personalized Answer:")?;
                        output.execute(SetAttribute(Attribute::Reset))?;
                        output.execute(SetForegroundColor(Color::Blue))?;
                        writeln!(output, "{}", answer.response)?;
                        output.execute(ResetColor)?;
                        writeln!(
                            output,
                            "Retrieved {} relevant documents",
                            answer.retrieved_docs
                        )?;
                    }
                    Err(e) => failure(&mut output, &e.to_string())?,
                }
            }
            Err(message) => failure(&mut output, &message)?,
        }

        prompt(&mut output, &user_id)?;
    }

    writeln!(output)?;
    Ok(())
}

pub fn print_stats<W: Write>(
    session: &RagSession,
    user_id: &str,
    output: &mut W,
) -> Result<(), Box<dyn Error>> {
    let stats = session.stats(user_id);

    writeln!(output, "System Stats")?;
    if let Some(user) = stats.user {
        writeln!(output, "  Interactions: {}", user.interaction_count)?;
        writeln!(output, "  Expertise: {}", user.expertise_level)?;
        writeln!(output, "  Style: {}", user.response_style)?;
    }
    writeln!(output, "  Total Users: {}", stats.total_users)?;
    writeln!(output, "  Total Interactions: {}", stats.total_interactions)?;
    writeln!(output, "  Documents: {}", stats.total_documents)?;
    Ok(())
}

fn prompt<W: Write>(output: &mut W, user_id: &str) -> Result<(), Box<dyn Error>> {
    output.execute(SetForegroundColor(Color::Cyan))?;
    output.execute(Print(format!("{user_id}> ")))?;
    output.execute(ResetColor)?;
    output.flush()?;
    Ok(())
}

fn success<W: Write>(output: &mut W, message: &str) -> Result<(), Box<dyn Error>> {
    output.execute(SetForegroundColor(Color::Green))?;
    writeln!(output, "{message}")?;
    output.execute(ResetColor)?;
    Ok(())
}

fn failure<W: Write>(output: &mut W, message: &str) -> Result<(), Box<dyn Error>> {
    output.execute(SetForegroundColor(Color::Red))?;
    writeln!(output, "{message}")?;
    output.execute(ResetColor)?;
    Ok(())
}
