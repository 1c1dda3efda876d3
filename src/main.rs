//! Batchbot - CLI Interface
//!
//! Thin read-print loop around the dialogue engine. The engine does all
//! the work; this binary only reads lines and renders responses.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};

use batchbot::{DialogueEngine, EngineConfig, Payload, Response};

#[derive(Parser)]
#[command(name = "batchbot", about = "Rule-based batch-operations chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive chat loop
    Repl,
    /// Feed a single line and print the response
    Parse {
        /// Input text (joined with spaces)
        text: Vec<String>,
    },
    /// Play a scripted conversation
    Demo,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Repl => run_repl(),
        Command::Parse { text } => parse_line(&text.join(" ")),
        Command::Demo => run_demo(),
    }
}

/// Interactive chat loop
fn run_repl() -> Result<()> {
    println!("Batchbot ready! Type your message (type 'exit' to quit).\n");

    let mut engine = DialogueEngine::new(EngineConfig::default());
    let stdin = io::stdin();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match engine.handle_turn(line) {
            Response::Exit => {
                println!("Bot: Bye!");
                break;
            }
            Response::Prompt(message) => println!("Bot: {}", message),
            Response::Completed(payload) => print_payload(&payload)?,
        }
    }

    Ok(())
}

/// Single-turn parse, mostly useful for quick checks and scripting
fn parse_line(text: &str) -> Result<()> {
    let mut engine = DialogueEngine::new(EngineConfig::default());

    match engine.handle_turn(text) {
        Response::Exit => println!("(exit)"),
        Response::Prompt(message) => println!("{}", message),
        Response::Completed(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
    }

    Ok(())
}

/// Scripted conversation showing the full slot-filling flow
fn run_demo() -> Result<()> {
    let turns = [
        "hello",
        "what is the weather",
        "generate batch",
        "batch1, 500000, March 2025",
        "create batch",
        "default",
        "delete batch",
        "batch42",
    ];

    let mut engine = DialogueEngine::new(EngineConfig::default());

    for turn in turns {
        println!("You: {}", turn);
        match engine.handle_turn(turn) {
            Response::Exit => {
                println!("Bot: Bye!");
                break;
            }
            Response::Prompt(message) => println!("Bot: {}", message),
            Response::Completed(payload) => print_payload(&payload)?,
        }
        println!();
    }

    Ok(())
}

/// Render a completed payload the way the chat loop shows it
fn print_payload(payload: &Payload) -> Result<()> {
    println!("Bot:");
    println!("  Extracted keywords -> {:?}", payload.keywords);
    println!(
        "  Extracted values   -> {}",
        serde_json::to_string(&payload)?
    );
    Ok(())
}
