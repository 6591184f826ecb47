//! Parsing of interactive session commands.

use nursedesk_core::{ExportFormat, SortColumn};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Sort(SortColumn),
    Search(String),
    Clear,
    Add,
    Edit(i64),
    Delete(i64),
    Export(ExportFormat, Option<PathBuf>),
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  list                     show the table
  sort <column>            sort by name|license|dob|age (again to reverse)
  search <text>            show only matching rows
  clear                    clear the search
  add                      create a nurse
  edit <id>                edit a nurse
  delete <id>              delete a nurse (asks for confirmation)
  export csv|xlsx [path]   save the visible rows
  reload                   fetch the full list from the server
  help                     show this help
  quit                     leave";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" | "list" | "ls" => Ok(Command::List),
        "sort" => rest.parse().map(Command::Sort),
        "search" | "find" => Ok(Command::Search(rest.to_string())),
        "clear" => Ok(Command::Clear),
        "add" | "new" => Ok(Command::Add),
        "edit" => parse_id(rest).map(Command::Edit),
        "delete" | "rm" => parse_id(rest).map(Command::Delete),
        "export" => {
            let (format, path) = match rest.split_once(char::is_whitespace) {
                Some((f, p)) => (f, Some(PathBuf::from(p.trim()))),
                None => (rest, None),
            };
            let format = format.parse::<ExportFormat>().map_err(|e| e.user_message())?;
            Ok(Command::Export(format, path))
        }
        "reload" | "refresh" => Ok(Command::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other} (try 'help')")),
    }
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("expected a numeric id, got '{raw}'"))
}
