use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
    sync::Arc,
};

use chrono::{Datelike, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Input};
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::{join, split};
use strsim::levenshtein;
use tracing::debug;

use crate::cli::output;
use crate::cli::presenter::{TerminalConfirmer, TerminalPresenter};
use crate::cli::CliError;
use crate::core::format::escape_control;
use crate::core::{Session, SystemClock};
use crate::ledger::{AnalyticsPeriod, Category, ExpenseForm, DATE_FORMAT};
use crate::storage::{JsonFileStore, KeyValueStore};

pub const SCRIPT_ENV: &str = "EXPENSE_TRACKER_CLI_SCRIPT";

const QUOTES: &[&str] = &[
    "Beware of little expenses; a small leak will sink a great ship. - Benjamin Franklin",
    "A budget is telling your money where to go instead of wondering where it went. - Dave Ramsey",
    "Financial freedom is available to those who learn about it and work for it. - Robert Kiyosaki",
    "Do not save what is left after spending, but spend what is left after saving. - Warren Buffett",
    "The best way to predict the future is to create it. - Peter Drucker",
    "Money is a terrible master but an excellent servant. - P.T. Barnum",
];

struct CommandSpec {
    name: &'static str,
    usage: &'static str,
    about: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "add",
        usage: "add <amount> <description> <category> [YYYY-MM-DD]",
        about: "Record an expense (date defaults to today)",
    },
    CommandSpec {
        name: "list",
        usage: "list",
        about: "Show expenses matching the current filter and search",
    },
    CommandSpec {
        name: "edit",
        usage: "edit <id> [amount] [description] [category] [date]",
        about: "Change an expense; omitted fields keep their value",
    },
    CommandSpec {
        name: "delete",
        usage: "delete <id>",
        about: "Delete one expense after confirmation",
    },
    CommandSpec {
        name: "clear",
        usage: "clear",
        about: "Delete every expense after confirmation",
    },
    CommandSpec {
        name: "filter",
        usage: "filter [category]",
        about: "Filter the list by category; no argument shows all",
    },
    CommandSpec {
        name: "search",
        usage: "search [text]",
        about: "Search descriptions; no argument clears the search",
    },
    CommandSpec {
        name: "period",
        usage: "period <last7days|last30days|alltime>",
        about: "Select the analytics period",
    },
    CommandSpec {
        name: "analytics",
        usage: "analytics",
        about: "Show period analytics and budget status",
    },
    CommandSpec {
        name: "budget",
        usage: "budget [value]",
        about: "Set the budget limit (0 disables it) or show its status",
    },
    CommandSpec {
        name: "currency",
        usage: "currency <symbol>",
        about: "Change the currency symbol",
    },
    CommandSpec {
        name: "categories",
        usage: "categories",
        about: "List category keys accepted by add and filter",
    },
    CommandSpec {
        name: "theme",
        usage: "theme",
        about: "Toggle between light and dark output",
    },
    CommandSpec {
        name: "help",
        usage: "help",
        about: "Show this help",
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        about: "Leave the shell",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new_default()?);
    let mut shell = Shell::new(storage, mode);
    shell.start();

    match mode {
        CliMode::Interactive => run_interactive(&mut shell),
        CliMode::Script => run_script(&mut shell),
    }
}

fn run_interactive(shell: &mut Shell) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new()));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    loop {
        match editor.readline(&shell.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if shell.handle_line(trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(shell: &mut Shell) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if shell.handle_line(&line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

pub(crate) struct Shell {
    session: Session<TerminalPresenter>,
    confirmer: TerminalConfirmer,
    mode: CliMode,
}

impl Shell {
    pub(crate) fn new(storage: Arc<dyn KeyValueStore>, mode: CliMode) -> Self {
        let script = mode == CliMode::Script;
        Self {
            session: Session::new(
                storage,
                Box::new(SystemClock),
                TerminalPresenter::new(script),
            ),
            confirmer: TerminalConfirmer::new(script),
            mode,
        }
    }

    fn start(&mut self) {
        self.session.start();
        if self.mode == CliMode::Interactive {
            output::section("Expense Tracker");
            output::line(quote_for(self.session.now().date()));
            self.session.presenter().print_budget();
            output::info("Type `help` to see available commands.");
        }
    }

    fn prompt(&self) -> String {
        match self.session.filter().category {
            Some(category) => format!("expenses [{}]> ", category.key()),
            None => "expenses> ".to_string(),
        }
    }

    pub(crate) fn handle_line(&mut self, line: &str) -> LoopControl {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return LoopControl::Continue;
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return LoopControl::Continue;
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        debug!(command = %command, args = args.len(), "dispatching command");

        match self.dispatch(&command, &args) {
            Ok(control) => control,
            Err(CliError::Input(message)) => {
                output::warning(message);
                LoopControl::Continue
            }
            Err(err) => {
                output::error(err);
                LoopControl::Continue
            }
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
        match command {
            "add" => self.cmd_add(args)?,
            "list" | "ls" => self.session.presenter().print_list(),
            "edit" => self.cmd_edit(args)?,
            "delete" | "rm" => {
                let id = parse_id(args)?;
                let request = self.session.on_delete_request(id);
                self.session.confirm_with(request, &mut self.confirmer);
            }
            "clear" => {
                if let Some(request) = self.session.on_clear_all_request() {
                    self.session.confirm_with(request, &mut self.confirmer);
                }
            }
            "filter" => {
                self.session.on_filter_change(args.first().copied().unwrap_or(""));
                self.session.presenter().print_list();
            }
            "search" => {
                let text = args.join(" ");
                self.session.on_search(&text);
                let searching = !self.session.filter().search.is_empty();
                self.session.presenter_mut().set_searching(searching);
                self.session.presenter().print_list();
            }
            "period" => {
                let Some(raw) = args.first() else {
                    return Err(CliError::Input(format!(
                        "Usage: period <{}>",
                        period_names()
                    )));
                };
                self.session.on_period_change(raw);
                self.session.presenter().print_analytics();
            }
            "analytics" | "stats" => {
                self.session.presenter().print_analytics();
                self.session.presenter().print_budget();
            }
            "budget" => {
                if let Some(raw) = args.first() {
                    self.session.on_budget_set(raw);
                }
                self.session.presenter().print_budget();
            }
            "currency" => {
                let Some(symbol) = args.first() else {
                    output::info(format!(
                        "Current currency: {}",
                        self.session.settings().currency
                    ));
                    return Ok(LoopControl::Continue);
                };
                self.session.on_currency_change(symbol);
                output::info(format!(
                    "Currency: {}",
                    self.session.settings().currency
                ));
            }
            "categories" => {
                output::section("Categories");
                for category in Category::ALL {
                    output::line(format!("{:<14} {}", category.key(), category.display_label()));
                }
            }
            "theme" => self.session.on_theme_toggle(),
            "help" | "?" => print_help(),
            "exit" | "quit" => {
                output::info("Goodbye!");
                return Ok(LoopControl::Exit);
            }
            other => suggest_command(other),
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_add(&mut self, args: &[&str]) -> Result<(), CliError> {
        let [amount, description, category, rest @ ..] = args else {
            return Err(CliError::Input(format!("Usage: {}", usage_of("add"))));
        };
        let date = match rest.first() {
            Some(date) => date.to_string(),
            None => self.today(),
        };
        let form = ExpenseForm {
            amount: amount.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            date,
        };
        self.session.on_submit(&form);
        Ok(())
    }

    /// The record leaves the ledger while it is being edited. If the changed
    /// fields are rejected or the prompt is aborted it stays removed and the
    /// user is shown the `add` line that brings it back.
    fn cmd_edit(&mut self, args: &[&str]) -> Result<(), CliError> {
        let id = parse_id(args)?;
        let overrides = &args[1..];
        let Some(original) = self.session.on_edit_request(id) else {
            return Ok(());
        };

        let edited = if overrides.is_empty() && self.mode == CliMode::Interactive {
            match prompt_form(&original) {
                Ok(form) => form,
                Err(err) => {
                    discarded_edit(&original);
                    return Err(err);
                }
            }
        } else {
            apply_overrides(&original, overrides)
        };

        if self.session.on_submit(&edited).is_none() {
            discarded_edit(&original);
        }
        Ok(())
    }

    fn today(&self) -> String {
        self.session.now().date().format(DATE_FORMAT).to_string()
    }
}

fn discarded_edit(original: &ExpenseForm) {
    output::warning(format!(
        "Edit discarded; the expense was removed. Re-add it with: {}",
        escape_control(&readd_command(original))
    ));
}

/// An `add` line that recreates the record from its form fields.
fn readd_command(form: &ExpenseForm) -> String {
    let args = [
        form.amount.as_str(),
        form.description.as_str(),
        form.category.as_str(),
        form.date.as_str(),
    ];
    format!("add {}", join(args))
}

fn parse_id(args: &[&str]) -> Result<i64, CliError> {
    let raw = args
        .first()
        .ok_or_else(|| CliError::Input("An expense id is required.".into()))?;
    raw.parse::<i64>()
        .map_err(|_| CliError::Input(format!("`{}` is not a valid expense id.", raw)))
}

fn apply_overrides(original: &ExpenseForm, overrides: &[&str]) -> ExpenseForm {
    let pick = |index: usize, fallback: &String| {
        overrides
            .get(index)
            .map(|value| value.to_string())
            .unwrap_or_else(|| fallback.clone())
    };
    ExpenseForm {
        amount: pick(0, &original.amount),
        description: pick(1, &original.description),
        category: pick(2, &original.category),
        date: pick(3, &original.date),
    }
}

fn prompt_form(original: &ExpenseForm) -> Result<ExpenseForm, CliError> {
    let theme = ColorfulTheme::default();
    let ask = |label: &str, current: &str| -> Result<String, CliError> {
        let value: String = Input::with_theme(&theme)
            .with_prompt(label)
            .default(current.to_string())
            .interact_text()?;
        Ok(value)
    };
    Ok(ExpenseForm {
        amount: ask("Amount", &original.amount)?,
        description: ask("Description", &original.description)?,
        category: ask("Category", &original.category)?,
        date: ask("Date (YYYY-MM-DD)", &original.date)?,
    })
}

fn usage_of(name: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.usage)
        .unwrap_or("")
}

fn period_names() -> String {
    [
        AnalyticsPeriod::Last7Days,
        AnalyticsPeriod::Last30Days,
        AnalyticsPeriod::AllTime,
    ]
    .iter()
    .map(|period| period.as_str())
    .collect::<Vec<_>>()
    .join("|")
}

fn print_help() {
    output::section("Commands");
    for spec in COMMANDS {
        output::line(format!("  {:<52} {}", spec.usage, spec.about));
    }
}

fn suggest_command(input: &str) {
    output::warning(format!(
        "Unknown command `{}`. Type `help` to see available commands.",
        input
    ));
    let best = COMMANDS
        .iter()
        .map(|spec| (levenshtein(spec.name, input), spec.name))
        .min_by_key(|(distance, _)| *distance);
    if let Some((distance, name)) = best {
        if distance <= 3 {
            output::info(format!("Suggestion: `{}`?", name));
        }
    }
}

/// Same quote all day, a different one the next.
pub(crate) fn quote_for(date: NaiveDate) -> &'static str {
    QUOTES[date.ordinal0() as usize % QUOTES.len()]
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new() -> Self {
        let mut commands: Vec<String> = COMMANDS.iter().map(|spec| spec.name.to_string()).collect();
        commands.sort();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let needle = prefix[start..].to_ascii_lowercase();
        let trimmed = prefix.trim_start();
        let first_word = !trimmed.contains(char::is_whitespace);
        let words: Vec<String> = if first_word {
            self.commands.clone()
        } else if trimmed.starts_with("filter ") || trimmed.starts_with("add ") {
            Category::ALL.iter().map(|c| c.key().to_string()).collect()
        } else if trimmed.starts_with("period ") {
            period_names().split('|').map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let candidates = words
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
