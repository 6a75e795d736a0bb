//! Interactive REPL for the AgenticContext MCP server.
//!
//! Launch with `agentic-context-mcp repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;

use agentic_context::{ContextError, Dispatcher, Registry};

use crate::types::{PromptGetResult, ResourceContent, ToolCallResult};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/tools", "List registered tools"),
    ("/resources", "List resources and templates"),
    ("/prompts", "List prompt templates"),
    ("/call", "Call a tool: /call <name> [json args]"),
    ("/read", "Read a resource: /read <uri>"),
    ("/prompt", "Expand a prompt: /prompt <name> [json args]"),
    ("/info", "Show server capabilities"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion of commands and catalog names.
struct ContextHelper {
    tools: Vec<String>,
    uris: Vec<String>,
    prompts: Vec<String>,
}

impl ContextHelper {
    fn new(dispatcher: &Dispatcher) -> Self {
        let registry = dispatcher.registry();
        Self {
            tools: registry.tools().map(|t| t.name.clone()).collect(),
            uris: uri_candidates(registry),
            prompts: registry.prompts().map(|p| p.name.clone()).collect(),
        }
    }
}

/// Static URIs complete whole. A template only offers its literal prefix,
/// ending at the first placeholder, so the user types the rest.
fn uri_candidates(registry: &Registry) -> Vec<String> {
    let mut uris: Vec<String> = Vec::new();
    for resource in registry.resources() {
        let pattern = resource.template.as_str();
        let candidate = if resource.template.is_static() {
            pattern
        } else {
            pattern.split('{').next().unwrap_or(pattern)
        };
        if !uris.iter().any(|u| u == candidate) {
            uris.push(candidate.to_string());
        }
    }
    uris
}

impl Completer for ContextHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let cmd = parts[0];
        let args = if parts.len() > 1 { parts[1] } else { "" };
        if args.contains(' ') {
            return Ok((pos, Vec::new()));
        }

        let names = match cmd {
            "/call" => &self.tools,
            "/read" => &self.uris,
            "/prompt" => &self.prompts,
            _ => return Ok((pos, Vec::new())),
        };
        let prefix_start = input.len() - args.len();
        let matches: Vec<Pair> = names
            .iter()
            .filter(|n| n.starts_with(args))
            .map(|n| Pair {
                display: n.clone(),
                replacement: if n.ends_with('/') {
                    n.clone()
                } else {
                    format!("{n} ")
                },
            })
            .collect();
        Ok((prefix_start, matches))
    }
}

impl Hinter for ContextHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for ContextHelper {}
impl Validator for ContextHelper {}
impl Helper for ContextHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Run the interactive REPL.
///
/// Blocks on readline, so call it from a blocking thread; `runtime` drives
/// the handler futures.
pub fn run(dispatcher: Arc<Dispatcher>, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1magentic-context-mcp v{}\x1b[0m \x1b[90m\u{2014} Tools, resources and prompts for AI clients\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<ContextHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(ContextHelper::new(&dispatcher)));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".agentic_context_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[36mcontext>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&dispatcher),
                    "tools" => cmd_tools(&dispatcher),
                    "resources" => cmd_resources(&dispatcher),
                    "prompts" => cmd_prompts(&dispatcher),
                    "call" => cmd_call(args, &dispatcher, &runtime),
                    "read" => cmd_read(args, &dispatcher, &runtime),
                    "prompt" => cmd_prompt(args, &dispatcher, &runtime),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(hist_path.parent().unwrap_or(std::path::Path::new(".")));
    let _ = rl.save_history(&hist_path);

    Ok(())
}

/// Split `<name> [json]` into a name and optional arguments.
fn split_name_args(args: &str) -> Result<(&str, Option<Value>), String> {
    let mut parts = args.splitn(2, ' ');
    let name = parts.next().unwrap_or("").trim();
    if name.is_empty() {
        return Err("a name is required".to_string());
    }
    let raw = parts.next().unwrap_or("").trim();
    if raw.is_empty() {
        return Ok((name, None));
    }
    serde_json::from_str(raw)
        .map(|v| (name, Some(v)))
        .map_err(|e| format!("arguments must be JSON: {e}"))
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            eprintln!();
            for line in text.lines() {
                eprintln!("  {line}");
            }
            eprintln!();
        }
        Err(e) => eprintln!("  Cannot render result: {e}"),
    }
}

fn print_error(err: &ContextError) {
    eprintln!("  \x1b[31m{}\x1b[0m: {err}", err.kind());
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands, tool names, URIs and prompt names.");
    eprintln!();
}

fn cmd_info(dispatcher: &Dispatcher) {
    let capabilities = crate::types::InitializeResult::default_result();
    let registry = dispatcher.registry();
    eprintln!();
    eprintln!(
        "  Server:    {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol:  {}", capabilities.protocol_version);
    eprintln!("  Tools:     {}", registry.tool_count());
    eprintln!("  Resources: {}", registry.resource_count());
    eprintln!("  Prompts:   {}", registry.prompt_count());
    eprintln!();
}

fn cmd_tools(dispatcher: &Dispatcher) {
    let tools = dispatcher.registry().tool_infos();
    eprintln!();
    eprintln!("  {} tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        let params: Vec<String> = tool
            .params
            .iter()
            .map(|p| {
                let marker = if p.required { "" } else { "?" };
                format!("{}{marker}: {}", p.name, p.ty.as_str())
            })
            .collect();
        eprintln!(
            "    {:<28} {}",
            format!("{}({})", tool.name, params.join(", ")),
            tool.description.as_deref().unwrap_or("")
        );
    }
    eprintln!();
}

fn cmd_resources(dispatcher: &Dispatcher) {
    let resources = dispatcher.resolver().list();
    eprintln!();
    eprintln!("  {} resources registered:", resources.len());
    eprintln!();
    for resource in &resources {
        let marker = if resource.templated { " (template)" } else { "" };
        eprintln!(
            "    {:<28} {}{marker}",
            resource.uri,
            resource.description.as_deref().unwrap_or(&resource.name)
        );
    }
    eprintln!();
}

fn cmd_prompts(dispatcher: &Dispatcher) {
    let prompts = dispatcher.registry().prompt_infos();
    eprintln!();
    eprintln!("  {} prompts available:", prompts.len());
    eprintln!();
    for prompt in &prompts {
        eprintln!(
            "    {:<28} {}",
            prompt.name,
            prompt.description.as_deref().unwrap_or("")
        );
    }
    eprintln!();
}

fn cmd_call(args: &str, dispatcher: &Dispatcher, runtime: &Handle) {
    let (name, arguments) = match split_name_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("  Usage: /call <tool> [json args] ({e})");
            return;
        }
    };
    match runtime.block_on(dispatcher.invoker().invoke(name, arguments)) {
        Ok(result) => print_json(&ToolCallResult::from(result)),
        Err(e) => print_error(&e),
    }
}

fn cmd_read(args: &str, dispatcher: &Dispatcher, runtime: &Handle) {
    if args.is_empty() {
        eprintln!("  Usage: /read <uri>");
        return;
    }
    match runtime.block_on(dispatcher.resolver().read(args)) {
        Ok(read) => print_json(&ResourceContent::from(read)),
        Err(e) => print_error(&e),
    }
}

fn cmd_prompt(args: &str, dispatcher: &Dispatcher, runtime: &Handle) {
    let (name, arguments) = match split_name_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("  Usage: /prompt <name> [json args] ({e})");
            return;
        }
    };
    match runtime.block_on(dispatcher.expander().get_prompt(name, arguments)) {
        Ok(expansion) => print_json(&PromptGetResult::from(expansion)),
        Err(e) => print_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_name_args() {
        let (name, args) = split_name_args(r#"divide {"a": 1, "b": 2}"#).unwrap();
        assert_eq!(name, "divide");
        assert_eq!(args, Some(json!({"a": 1, "b": 2})));

        let (name, args) = split_name_args("add").unwrap();
        assert_eq!(name, "add");
        assert!(args.is_none());

        assert!(split_name_args("").is_err());
        assert!(split_name_args("add {oops").is_err());
    }

    #[test]
    fn test_uri_candidates_never_offer_placeholders() {
        let registry = crate::catalog::build_registry().unwrap();
        let uris = uri_candidates(&registry);
        assert!(uris.iter().all(|u| !u.contains('{')), "{uris:?}");
        assert!(uris.contains(&"config://app".to_string()));
        assert!(uris.contains(&"user://admin/profile".to_string()));
        assert!(uris.contains(&"user://".to_string()));
        assert!(uris.contains(&"file://docs/".to_string()));
    }
}
