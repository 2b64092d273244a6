//! REPL (Read-Eval-Print Loop) for interactive command sessions

use crate::ConsoleFormatter;
use crate::OutputFormat;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use steward_application::{CommandSessionUseCase, ToolExecutorPort};
use steward_domain::EntityRegistry;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Result of handling a slash command
#[derive(Debug, PartialEq, Eq)]
enum CommandResult {
    Exit,
    Continue,
}

/// Interactive command REPL
pub struct ChatRepl {
    session: CommandSessionUseCase,
    tools: Arc<dyn ToolExecutorPort>,
    entities: EntityRegistry,
    output: OutputFormat,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(session: CommandSessionUseCase, tools: Arc<dyn ToolExecutorPort>, entities: EntityRegistry) -> Self {
        Self {
            session,
            tools,
            entities,
            output: OutputFormat::Pretty,
            history_path: Self::default_history_path(),
        }
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Override the history file; `None` keeps history in memory only
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// `<data dir>/steward/history.txt`
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("steward").join("history.txt"))
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_path else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "History file unavailable");
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("steward".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(buffer) => {
                    let line = buffer.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        match self.handle_command(line) {
                            CommandResult::Exit => break,
                            CommandResult::Continue => continue,
                        }
                    }
                    self.process_command(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn process_command(&mut self, line: &str) {
        let report = self.session.handle(line, &self.entities).await;
        match self.output {
            OutputFormat::Pretty => print!("{}", ConsoleFormatter::format_report(&report)),
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&report)),
        }
    }

    fn handle_command(&self, line: &str) -> CommandResult {
        let command = line.split_whitespace().next().unwrap_or(line);
        match command {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                CommandResult::Exit
            }
            "/help" | "/h" | "/?" => {
                self.print_help();
                CommandResult::Continue
            }
            "/tools" => {
                print!("{}", ConsoleFormatter::format_tools(self.tools.tool_spec()));
                CommandResult::Continue
            }
            "/devices" => {
                if self.entities.is_empty() {
                    println!("{}", "No devices configured.".dimmed());
                }
                for name in self.entities.names() {
                    println!("  {} {}", name.bold(), self.entities.get(name).unwrap_or_default().dimmed());
                }
                CommandResult::Continue
            }
            "/last" => {
                match self.session.last_output() {
                    Some(text) => println!("{}", text),
                    None => println!("{}", "No tool output yet.".dimmed()),
                }
                CommandResult::Continue
            }
            _ => {
                println!("{} {} (try /help)", "Unknown command:".yellow(), command);
                CommandResult::Continue
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "+--------------------------------------------+".cyan());
        println!("{}", "|               Steward Chat                 |".cyan());
        println!("{}", "+--------------------------------------------+".cyan());
        println!();
        println!(
            "{} {}  {} {}",
            "Tools:".bold(),
            self.tools.tool_spec().len(),
            "Devices:".bold(),
            self.entities.len()
        );
        println!("Type a command, or /help. Ctrl-D to quit.");
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Commands:".bold());
        println!("  /help      Show this help");
        println!("  /tools     List available tools");
        println!("  /devices   List configured devices");
        println!("  /last      Print the last tool output");
        println!("  /quit      Leave the session");
        println!();
        println!("{}", "Examples:".bold());
        println!("  list containers");
        println!("  turn off the kitchen lights");
        println!("  summarize this video https://youtu.be/...");
        println!("  research rust async runtimes and save a note");
        println!();
    }
}
