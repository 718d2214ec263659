//! Interactive REPL (Read-Eval-Print Loop) for the queue board.
//!
//! Every board operation is a slash command. The board is aged in the
//! background by a `BoardRuntime`, and the statistics line is reprinted after
//! any command that changed the board.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use queueboard_models::{Entry, EntryId, Priority, ProviderId, ProviderStatus};
use queueboard_queue::{
    BoardChange, BoardConfig, BoardStats, DialogState, FilterView, QueueFilter, QueueStore,
    TransferDialog,
};
use queueboard_runtime::{BoardRuntime, RuntimeConfig};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::debug;

use crate::render::{render_board, render_stats};

/// Largest `/tick` accepted: one day of minutes.
pub const MAX_TICK_MINUTES: u32 = 24 * 60;

/// Help information for a command.
pub struct CommandHelp {
    /// Command name (e.g., "move").
    pub name: &'static str,
    /// Command aliases (e.g., ["mv"]).
    pub aliases: &'static [&'static str],
    /// Brief one-line description.
    pub brief: &'static str,
    /// Usage syntax.
    pub usage: &'static str,
}

/// Static help entries for all commands.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "board",
        aliases: &["b"],
        brief: "Show the queues (optionally through a filter)",
        usage: "/board [all|urgent|waiting|overdue]",
    },
    CommandHelp {
        name: "filter",
        aliases: &["f"],
        brief: "Set the default filter for /board",
        usage: "/filter <all|urgent|waiting|overdue>",
    },
    CommandHelp {
        name: "stats",
        aliases: &["s"],
        brief: "Show board statistics",
        usage: "/stats",
    },
    CommandHelp {
        name: "move",
        aliases: &["mv"],
        brief: "Move an entry to the end of another queue",
        usage: "/move <entry> <provider>",
    },
    CommandHelp {
        name: "review",
        aliases: &["r"],
        brief: "Start a reviewed transfer for an entry",
        usage: "/review <entry>",
    },
    CommandHelp {
        name: "to",
        aliases: &[],
        brief: "Reviewed transfer: choose the destination",
        usage: "/to <provider>",
    },
    CommandHelp {
        name: "priority",
        aliases: &["p"],
        brief: "Reviewed transfer: choose the new priority",
        usage: "/priority <normal|high|urgent>",
    },
    CommandHelp {
        name: "why",
        aliases: &[],
        brief: "Reviewed transfer: write the justification",
        usage: "/why <text>",
    },
    CommandHelp {
        name: "submit",
        aliases: &[],
        brief: "Reviewed transfer: validate and apply",
        usage: "/submit",
    },
    CommandHelp {
        name: "cancel",
        aliases: &[],
        brief: "Reviewed transfer: discard",
        usage: "/cancel",
    },
    CommandHelp {
        name: "cycle",
        aliases: &["c"],
        brief: "Advance priority normal -> high -> urgent -> normal",
        usage: "/cycle <entry>",
    },
    CommandHelp {
        name: "reorder",
        aliases: &["ro"],
        brief: "Move an entry within its queue (positions start at 1)",
        usage: "/reorder <provider> <from> <to>",
    },
    CommandHelp {
        name: "tick",
        aliases: &[],
        brief: "Age every entry by N minutes now (default 1, at most 1440)",
        usage: "/tick [n]",
    },
    CommandHelp {
        name: "call",
        aliases: &[],
        brief: "Start consultation: remove the entry from the board",
        usage: "/call <entry>",
    },
    CommandHelp {
        name: "status",
        aliases: &[],
        brief: "Set a provider's availability",
        usage: "/status <provider> <available|busy|break|unavailable>",
    },
    CommandHelp {
        name: "add",
        aliases: &[],
        brief: "Register a walk-in at the end of a queue",
        usage: "/add <provider> <priority> <name...>",
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        brief: "Show help",
        usage: "/help [command]",
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        brief: "Exit the REPL",
        usage: "/quit",
    },
];

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] = &[
        "/add", "/board", "/call", "/cancel", "/cycle", "/filter", "/help", "/move",
        "/priority", "/quit", "/reorder", "/review", "/stats", "/status", "/submit", "/tick",
        "/to", "/why",
    ];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Commands available in the REPL.
///
/// Queue positions are 1-based on screen and 0-based here.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Show the board, optionally with a one-off filter
    Board(Option<QueueFilter>),
    /// Change the default filter
    Filter(QueueFilter),
    /// Show statistics
    Stats,
    /// Direct transfer
    Move { entry: EntryId, to: ProviderId },
    /// Open the reviewed-transfer dialog
    Review(EntryId),
    /// Dialog: destination
    To(ProviderId),
    /// Dialog: priority
    Priority(Priority),
    /// Dialog: justification
    Why(String),
    /// Dialog: submit
    Submit,
    /// Dialog: cancel
    Cancel,
    /// Cycle an entry's priority
    Cycle(EntryId),
    /// Move an entry within its queue
    Reorder {
        provider: ProviderId,
        from: usize,
        to: usize,
    },
    /// Age the board now
    Tick(u32),
    /// Start consultation for an entry
    Call(EntryId),
    /// Set provider availability
    Status {
        provider: ProviderId,
        status: ProviderStatus,
    },
    /// Register a walk-in
    Add {
        provider: ProviderId,
        priority: Priority,
        name: String,
    },
    /// Show help (optionally for a specific command)
    Help(Option<String>),
    /// Quit the REPL
    Quit,
    /// Blank line
    Empty,
    /// Unknown or malformed command
    Unknown(String),
}

impl ReplCommand {
    /// Parses input into a REPL command. The leading slash is optional.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return ReplCommand::Empty;
        }

        let stripped = input.strip_prefix('/').unwrap_or(input);
        let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());
        let args: Vec<&str> = arg.map(|a| a.split_whitespace().collect()).unwrap_or_default();

        match cmd.as_str() {
            "board" | "b" => match arg {
                None => ReplCommand::Board(None),
                Some(f) => f
                    .parse()
                    .map(|f| ReplCommand::Board(Some(f)))
                    .unwrap_or_else(ReplCommand::Unknown),
            },
            "filter" | "f" => match arg {
                Some(f) => f
                    .parse()
                    .map(ReplCommand::Filter)
                    .unwrap_or_else(ReplCommand::Unknown),
                None => ReplCommand::Unknown("filter requires a value".to_string()),
            },
            "stats" | "s" => ReplCommand::Stats,
            "move" | "mv" => match args.as_slice() {
                [entry, to] => ReplCommand::Move {
                    entry: EntryId::from(*entry),
                    to: ProviderId::from(*to),
                },
                _ => ReplCommand::Unknown("usage: /move <entry> <provider>".to_string()),
            },
            "review" | "r" => match args.as_slice() {
                [entry] => ReplCommand::Review(EntryId::from(*entry)),
                _ => ReplCommand::Unknown("usage: /review <entry>".to_string()),
            },
            "to" => match args.as_slice() {
                [provider] => ReplCommand::To(ProviderId::from(*provider)),
                _ => ReplCommand::Unknown("usage: /to <provider>".to_string()),
            },
            "priority" | "p" => match arg {
                Some(p) => p
                    .parse()
                    .map(ReplCommand::Priority)
                    .unwrap_or_else(ReplCommand::Unknown),
                None => ReplCommand::Unknown("priority requires a value".to_string()),
            },
            "why" => ReplCommand::Why(arg.unwrap_or_default().to_string()),
            "submit" => ReplCommand::Submit,
            "cancel" => ReplCommand::Cancel,
            "cycle" | "c" => match args.as_slice() {
                [entry] => ReplCommand::Cycle(EntryId::from(*entry)),
                _ => ReplCommand::Unknown("usage: /cycle <entry>".to_string()),
            },
            "reorder" | "ro" => Self::parse_reorder(&args),
            "tick" => match arg {
                None => ReplCommand::Tick(1),
                Some(n) => match n.parse::<u32>() {
                    Ok(n) if (1..=MAX_TICK_MINUTES).contains(&n) => ReplCommand::Tick(n),
                    _ => ReplCommand::Unknown(format!(
                        "tick takes 1 to {} minutes, got {}",
                        MAX_TICK_MINUTES, n
                    )),
                },
            },
            "call" => match args.as_slice() {
                [entry] => ReplCommand::Call(EntryId::from(*entry)),
                _ => ReplCommand::Unknown("usage: /call <entry>".to_string()),
            },
            "status" => match args.as_slice() {
                [provider, status] => status
                    .parse()
                    .map(|status| ReplCommand::Status {
                        provider: ProviderId::from(*provider),
                        status,
                    })
                    .unwrap_or_else(ReplCommand::Unknown),
                _ => ReplCommand::Unknown("usage: /status <provider> <status>".to_string()),
            },
            "add" => match args.as_slice() {
                [provider, priority, name @ ..] if !name.is_empty() => priority
                    .parse()
                    .map(|priority| ReplCommand::Add {
                        provider: ProviderId::from(*provider),
                        priority,
                        name: name.join(" "),
                    })
                    .unwrap_or_else(ReplCommand::Unknown),
                _ => {
                    ReplCommand::Unknown("usage: /add <provider> <priority> <name...>".to_string())
                }
            },
            "help" | "h" | "?" => ReplCommand::Help(arg.map(String::from)),
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(format!("unknown command: {}", cmd)),
        }
    }

    fn parse_reorder(args: &[&str]) -> Self {
        let [provider, from, to] = args else {
            return ReplCommand::Unknown("usage: /reorder <provider> <from> <to>".to_string());
        };

        match (from.parse::<usize>(), to.parse::<usize>()) {
            (Ok(from), Ok(to)) if from >= 1 && to >= 1 => ReplCommand::Reorder {
                provider: ProviderId::from(*provider),
                from: from - 1,
                to: to - 1,
            },
            _ => ReplCommand::Unknown("positions are numbers starting at 1".to_string()),
        }
    }
}

/// Finds the help entry for a command name or alias.
fn find_help(name: &str) -> Option<&'static CommandHelp> {
    let name = name.trim_start_matches('/');
    COMMAND_HELP
        .iter()
        .find(|h| h.name == name || h.aliases.contains(&name))
}

/// Interactive REPL session.
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    store: Arc<QueueStore>,
    changes: Receiver<BoardChange>,
    dialog: TransferDialog,
    config: BoardConfig,
    filter: QueueFilter,
    runtime: tokio::runtime::Runtime,
    board_runtime: BoardRuntime,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Creates a REPL over `store` and starts aging it in the background.
    pub fn new(
        store: QueueStore,
        config: BoardConfig,
        runtime_config: RuntimeConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let rl_config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(rl_config)?;
        editor.set_helper(Some(CommandCompleter));

        let history_path = dirs::home_dir().map(|h| h.join(".queueboard_history"));
        if let Some(path) = history_path.as_ref().filter(|p| p.exists()) {
            let _ = editor.load_history(path);
        }

        let store = Arc::new(store);
        let changes = store.subscribe();

        let runtime = tokio::runtime::Runtime::new()?;
        let mut board_runtime = BoardRuntime::new(Arc::clone(&store), runtime_config);
        {
            let _guard = runtime.enter();
            board_runtime.start()?;
        }

        Ok(Self {
            editor,
            store,
            changes,
            dialog: TransferDialog::new().with_min_justification_len(config.min_justification_len),
            config,
            filter: QueueFilter::All,
            runtime,
            board_runtime,
            history_path,
        })
    }

    /// Runs the REPL loop.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        println!("Queueboard REPL v{}", env!("CARGO_PKG_VERSION"));
        println!(
            "Wait times age every {}s. Type /help for commands, /quit to exit",
            self.board_runtime.config().tick_interval.as_secs()
        );
        println!();
        self.show_board(None)?;

        loop {
            let prompt = self.prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    self.editor.add_history_entry(&line)?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match self.handle_command(cmd) {
                        Ok(true) => break, // Quit requested
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }

                    self.report_changes()?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            let _ = self.editor.save_history(path);
        }

        self.runtime.block_on(self.board_runtime.shutdown())?;

        println!("Goodbye!");
        Ok(())
    }

    /// Returns the prompt string.
    fn prompt(&self) -> String {
        match self.dialog.draft() {
            Some(draft) => format!("queueboard [review {}]> ", draft.entry_id),
            None => "queueboard> ".to_string(),
        }
    }

    /// Prints the statistics line if a command changed the board.
    ///
    /// Ticks from the background runtime are drained silently.
    fn report_changes(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mutated = self
            .changes
            .try_iter()
            .filter(|c| !c.is_tick())
            .count();

        if mutated > 0 {
            println!("{}", render_stats(&self.stats()?));
        }
        Ok(())
    }

    fn stats(&self) -> Result<BoardStats, Box<dyn std::error::Error>> {
        let snapshot = self.store.snapshot()?;
        Ok(BoardStats::compute_with_capacity(
            &snapshot,
            self.config.capacity_per_provider,
        ))
    }

    fn show_board(&self, filter: Option<QueueFilter>) -> Result<(), Box<dyn std::error::Error>> {
        let filter = filter.unwrap_or(self.filter);
        let snapshot = self.store.snapshot()?;
        let views = FilterView::new(filter)
            .with_overdue_after(self.config.overdue_after_minutes)
            .apply(&snapshot);
        let full = FilterView::new(QueueFilter::All).apply(&snapshot);

        println!("{}\n", render_stats(&self.stats()?));
        print!("{}", render_board(&views, &full, filter));
        Ok(())
    }

    /// Looks up which queue currently holds an entry.
    fn locate(&self, entry: &EntryId) -> Result<(ProviderId, Entry), Box<dyn std::error::Error>> {
        self.store
            .find(entry)?
            .ok_or_else(|| format!("no entry {} on the board", entry).into())
    }

    /// Handles a REPL command. Returns Ok(true) if should quit.
    fn handle_command(&mut self, cmd: ReplCommand) -> Result<bool, Box<dyn std::error::Error>> {
        match cmd {
            ReplCommand::Board(filter) => self.show_board(filter)?,
            ReplCommand::Filter(filter) => {
                self.filter = filter;
                println!("Filter set to {}.", filter);
            }
            ReplCommand::Stats => println!("{}", render_stats(&self.stats()?)),
            ReplCommand::Move { entry, to } => {
                let (from, _) = self.locate(&entry)?;
                self.store.transfer_direct(&entry, &from, &to)?;
                println!("Moved {} from {} to the end of {}.", entry, from, to);
            }
            ReplCommand::Review(entry) => {
                let (from, found) = self.locate(&entry)?;
                self.dialog.open(&self.store, &entry, &from)?;
                println!(
                    "Reviewing transfer of {} ({}, {}) out of {}.",
                    entry, found.name, found.priority, from
                );
                println!("Use /to, /priority and /why, then /submit or /cancel.");
            }
            ReplCommand::To(provider) => {
                if self.store.providers()?.iter().all(|p| p.id != provider) {
                    return Err(format!("no provider {}", provider).into());
                }
                self.dialog.set_destination(provider)?;
                self.show_draft();
            }
            ReplCommand::Priority(priority) => {
                self.dialog.set_priority(priority)?;
                self.show_draft();
            }
            ReplCommand::Why(text) => {
                self.dialog.set_justification(text)?;
                self.show_draft();
            }
            ReplCommand::Submit => {
                let record = self.dialog.submit(&self.store)?;
                println!(
                    "Transferred {} from {} to {} as {}.",
                    record.entry_id, record.from_provider_id, record.to_provider_id, record.priority
                );
            }
            ReplCommand::Cancel => {
                if matches!(self.dialog.state(), DialogState::Closed) {
                    println!("No transfer in progress.");
                } else {
                    self.dialog.cancel();
                    println!("Transfer discarded.");
                }
            }
            ReplCommand::Cycle(entry) => {
                let (provider, _) = self.locate(&entry)?;
                let priority = self.store.cycle_priority(&entry, &provider)?;
                println!("{} is now {}.", entry, priority);
            }
            ReplCommand::Reorder { provider, from, to } => {
                self.store.reorder(&provider, from, to)?;
                println!("Moved position {} to {} in {}.", from + 1, to + 1, provider);
            }
            ReplCommand::Tick(n) => {
                self.store.tick_by(n)?;
                println!("Aged every entry by {} min.", n);
            }
            ReplCommand::Call(entry) => {
                let (provider, _) = self.locate(&entry)?;
                let called = self.store.start_consultation(&entry, &provider)?;
                println!("{} ({}) called in by {}.", called.name, called.id, provider);
            }
            ReplCommand::Status { provider, status } => {
                self.store.set_provider_status(&provider, status)?;
                println!("{} is now {}.", provider, status);
            }
            ReplCommand::Add {
                provider,
                priority,
                name,
            } => {
                let entry = Entry::builder(name, "Walk-in").priority(priority).build();
                let id = self.store.enqueue(&provider, entry)?;
                println!("Registered {} in {}.", id, provider);
            }
            ReplCommand::Help(topic) => self.show_help(topic.as_deref()),
            ReplCommand::Quit => return Ok(true),
            ReplCommand::Empty => {}
            ReplCommand::Unknown(msg) => {
                println!("{}. Type /help for commands.", msg);
            }
        }

        Ok(false)
    }

    fn show_draft(&self) {
        let Some(draft) = self.dialog.draft() else {
            return;
        };

        println!(
            "  destination: {}  priority: {}  justification: {:?}",
            draft
                .destination
                .as_ref()
                .map(ProviderId::to_string)
                .unwrap_or_else(|| "-".to_string()),
            draft.priority,
            draft.justification,
        );
        if self.dialog.can_submit() {
            println!("  ready: /submit");
        } else {
            println!(
                "  needs a destination and at least {} characters of justification",
                self.config.min_justification_len
            );
        }
    }

    fn show_help(&self, topic: Option<&str>) {
        match topic {
            Some(name) => match find_help(name) {
                Some(help) => {
                    println!("/{} - {}", help.name, help.brief);
                    println!("Usage: {}", help.usage);
                    if !help.aliases.is_empty() {
                        println!("Aliases: {}", help.aliases.join(", "));
                    }
                }
                None => println!("No help for '{}'.", name),
            },
            None => {
                println!("Commands:");
                for help in COMMAND_HELP {
                    println!("  {:<44} {}", help.usage, help.brief);
                }
            }
        }
    }
}
