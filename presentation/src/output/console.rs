//! Console output formatter for steward results

use colored::Colorize;
use serde::Serialize;
use steward_application::{CommandReport, IntentOutcome, Resolution, ResolutionOutcome, ResolutionTier};
use steward_domain::{Intent, IntentType, PlannerOutcome, StepOutcome, Termination, ToolSpec};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Intents produced for `command`, and which tier produced them
    pub fn format_resolution(command: &str, resolution: &Resolution) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "Command:".cyan().bold(), command));
        output.push_str(&format!(
            "{} {}\n",
            "Resolved:".cyan().bold(),
            Self::describe_outcome(&resolution.outcome)
        ));
        if resolution.model_calls > 0 {
            output.push_str(&format!(
                "{} {}\n",
                "Model calls:".dimmed(),
                resolution.model_calls
            ));
        }

        if !resolution.intents.is_empty() {
            output.push_str(&Self::section_header("Intents"));
            for (i, intent) in resolution.intents.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, Self::describe_intent(intent)));
            }
        }
        output
    }

    /// What was done for each intent of one command
    pub fn format_report(report: &CommandReport) -> String {
        if report.intents.is_empty() {
            let line = match report.resolution {
                ResolutionOutcome::NoIntent => "Nothing to do.".dimmed().to_string(),
                _ => "Sorry, I didn't understand that.".yellow().to_string(),
            };
            return format!("{}\n", line);
        }

        let mut output = String::new();
        for (intent, outcome) in report.intents.iter().zip(&report.outcomes) {
            output.push_str(&format!("{} {}\n", "->".cyan(), Self::describe_intent(intent)));
            output.push_str(&Self::describe_intent_outcome(outcome));
            output.push('\n');
        }
        output
    }

    /// Summary and step log of a planner run
    pub fn format_planner(outcome: &PlannerOutcome) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Automation"));
        output.push('\n');

        output.push_str(&Self::section_header("Steps"));
        for entry in outcome.history.entries() {
            let tool = entry.tool_name.as_deref().unwrap_or("-");
            let (mark, text) = match &entry.outcome {
                StepOutcome::Success(text) => ("v".green(), text),
                StepOutcome::Error(text) => ("x".red(), text),
                StepOutcome::ParseFailure(raw) => ("?".yellow(), raw),
            };
            output.push_str(&format!(
                "  {} {} {}\n{}\n",
                mark,
                format!("[{}]", entry.step_index).dimmed(),
                tool.bold(),
                Self::indent(&Self::first_lines(text, 3), "      ")
            ));
        }

        let status = match outcome.termination {
            Termination::Completed => "completed".green(),
            Termination::Finalized => "finalized".green(),
            Termination::BudgetExhausted => "step budget exhausted".yellow(),
        };
        output.push_str(&format!(
            "\n{} {} after {} step(s)\n\n",
            "Status:".cyan().bold(),
            status,
            outcome.iterations
        ));
        output.push_str(&outcome.summary);
        output.push('\n');
        output.push_str(&Self::footer());
        output
    }

    /// Tool catalogue, one line per tool
    pub fn format_tools(spec: &ToolSpec) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header(&format!("Tools ({})", spec.len())));
        for tool in spec.all() {
            let origin = match &tool.backend {
                Some(backend) => format!("[{}]", backend).dimmed().to_string(),
                None => "[internal]".green().to_string(),
            };
            output.push_str(&format!(
                "  {:<24} {} {}\n",
                tool.name.bold(),
                origin,
                tool.description
            ));
        }
        output
    }

    /// Format any result as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn describe_outcome(outcome: &ResolutionOutcome) -> String {
        match outcome {
            ResolutionOutcome::Matched(ResolutionTier::Pattern { rule }) => {
                format!("pattern rule {}", rule.green())
            }
            ResolutionOutcome::Matched(ResolutionTier::Fuzzy { score }) => {
                format!("fuzzy device match ({:.2})", score)
            }
            ResolutionOutcome::Matched(ResolutionTier::Model { model }) => {
                format!("model {}", model.to_string().green())
            }
            ResolutionOutcome::NoIntent => "no actionable intent".dimmed().to_string(),
            ResolutionOutcome::Unresolved => "unresolved".yellow().to_string(),
        }
    }

    fn describe_intent(intent: &Intent) -> String {
        let confidence = format!("({:.2})", intent.confidence).dimmed();
        match intent.intent_type {
            IntentType::ToolCall => {
                let name = intent.tool_name.as_deref().unwrap_or("?");
                let args = serde_json::to_string(&intent.arguments).unwrap_or_default();
                format!("{} {} {}", name.bold(), args.dimmed(), confidence)
            }
            IntentType::Control => format!(
                "{} {} {}",
                intent.action.as_deref().unwrap_or("?").bold(),
                intent.target_device.as_deref().unwrap_or("?"),
                confidence
            ),
            IntentType::Query => format!(
                "{} {} {}",
                "query".bold(),
                intent.target_device.as_deref().unwrap_or(""),
                confidence
            ),
        }
    }

    fn describe_intent_outcome(outcome: &IntentOutcome) -> String {
        match outcome {
            IntentOutcome::Tool { result } if result.is_success() => Self::indent(&result.text(), "   "),
            IntentOutcome::Tool { result } => Self::indent(&result.text(), "   ").red().to_string(),
            IntentOutcome::Device { result: Ok(text), .. } => format!("   {}", text.green()),
            IntentOutcome::Device { result: Err(e), .. } => format!("   {}", e.red()),
            IntentOutcome::UnknownTool { tool_name } => {
                format!("   {}", format!("Unknown tool '{}'", tool_name).red())
            }
            IntentOutcome::Aborted { tool_name, reason } => format!(
                "   {}",
                format!("{} not run: {}", tool_name, reason).yellow()
            ),
            IntentOutcome::Skipped { reason } => format!("   {}", reason.dimmed()),
        }
    }

    fn first_lines(text: &str, n: usize) -> String {
        let mut lines: Vec<&str> = text.lines().take(n + 1).collect();
        if lines.len() > n {
            lines.truncate(n);
            lines.push("...");
        }
        lines.join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_domain::{ExecutionHistory, ToolCall, ToolDefinition, ToolResult};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_report_for_tool_outcome() {
        plain();
        let report = CommandReport {
            command: "list containers".to_string(),
            resolution: ResolutionOutcome::Matched(ResolutionTier::Pattern { rule: "docker_list" }),
            intents: vec![Intent::tool_call("list_containers")],
            outcomes: vec![IntentOutcome::Tool {
                result: ToolResult::success("list_containers", "web-1\ndb-1"),
            }],
        };
        let text = ConsoleFormatter::format_report(&report);
        assert!(text.contains("list_containers"));
        assert!(text.contains("   web-1\n   db-1"));
    }

    #[test]
    fn test_report_without_intents() {
        plain();
        let report = CommandReport {
            command: "hello".to_string(),
            resolution: ResolutionOutcome::Unresolved,
            intents: vec![],
            outcomes: vec![],
        };
        assert!(ConsoleFormatter::format_report(&report).contains("didn't understand"));
    }

    #[test]
    fn test_planner_summary_and_steps() {
        plain();
        let mut history = ExecutionHistory::new(3000);
        history.record_success(1, &ToolCall::new("duckduckgo_search"), "a\nb\nc\nd\ne");
        let outcome = PlannerOutcome::completed("Rust is fast.", 2, history);

        let text = ConsoleFormatter::format_planner(&outcome);

        assert!(text.contains("duckduckgo_search"));
        assert!(text.contains("      a\n      b\n      c\n      ..."));
        assert!(text.contains("completed after 2 step(s)"));
        assert!(text.contains("Rust is fast."));
    }

    #[test]
    fn test_tools_listing_marks_origin() {
        plain();
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("synthesize_content", "Summarize"))
            .register(ToolDefinition::new("list_containers", "List").with_backend("docker"));
        let text = ConsoleFormatter::format_tools(&spec);
        assert!(text.contains("Tools (2)"));
        assert!(text.contains("[internal]"));
        assert!(text.contains("[docker]"));
    }

    #[test]
    fn test_resolution_json_is_tagged() {
        let resolution = Resolution {
            intents: vec![],
            outcome: ResolutionOutcome::NoIntent,
            model_calls: 1,
        };
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&resolution)).unwrap();
        assert_eq!(json["outcome"]["outcome"], "no_intent");
        assert_eq!(json["model_calls"], 1);
    }
}
