//! The interactive table session: one roster, one dialog, one request at a time.

use crate::command::{self, Command, HELP};
use crate::render;
use chrono::{Local, NaiveDate};
use nursedesk_core::{
    export, export_filename, ApiClient, ClientError, ExportFormat, Modal, NoticeKind, NurseFields,
    NurseForm, Roster, ViewState,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const COLLECTION_NAME: &str = "nurses";

pub struct Session {
    client: ApiClient,
    roster: Roster,
    view: ViewState,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            roster: Roster::new(),
            view: ViewState::new(),
        }
    }

    /// Replaces the roster with the server's full list.
    pub fn load(&mut self) -> Result<usize, ClientError> {
        let records = self.client.list()?;
        let count = records.len();
        self.roster.replace_all(records);
        log::debug!("loaded {count} nurses from {}", self.client.base_url());
        Ok(count)
    }

    /// Reads commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        self.print_table(out)?;
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            let keep_going = match command::parse(&line) {
                Ok(cmd) => self.dispatch(cmd, input, out)?,
                Err(msg) => {
                    writeln!(out, "{msg}")?;
                    true
                }
            };
            self.print_notice(out)?;
            if !keep_going {
                break;
            }
        }
        Ok(())
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        cmd: Command,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<bool> {
        match cmd {
            Command::List => self.print_table(out)?,
            Command::Sort(column) => {
                self.roster.toggle_sort(column);
                self.print_table(out)?;
            }
            Command::Search(query) => {
                self.roster.set_search(query);
                self.print_table(out)?;
            }
            Command::Clear => {
                self.roster.set_search("");
                self.print_table(out)?;
            }
            Command::Add => {
                self.view.open_create();
                self.edit_and_submit(input, out)?;
            }
            Command::Edit(id) => match self.roster.find(id).cloned() {
                Some(record) => {
                    self.view.open_edit(&record);
                    self.edit_and_submit(input, out)?;
                }
                None => self.missing(id),
            },
            Command::Delete(id) => match self.roster.find(id).cloned() {
                Some(record) => {
                    self.view.open_delete(&record);
                    self.confirm_delete(input, out)?;
                }
                None => self.missing(id),
            },
            Command::Export(format, path) => self.export(format, path),
            Command::Reload => {
                if let Err(e) = self.load() {
                    self.view.notify(NoticeKind::Error, e.to_string());
                } else {
                    self.print_table(out)?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn missing(&mut self, id: i64) {
        self.view
            .notify(NoticeKind::Error, format!("No nurse with id {id} in the table"));
    }

    fn edit_and_submit<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        let today = Local::now().date_naive();
        let form = match self.view.modal_mut() {
            Modal::Editing(form) => {
                if !prompt_form(form, input, out, today)? {
                    self.view.close();
                    return Ok(());
                }
                form.clone()
            }
            _ => return Ok(()),
        };

        let fields = match form.submit() {
            Ok(fields) => fields,
            Err(e) => {
                self.view.notify(NoticeKind::Error, e.user_message());
                self.view.close();
                return Ok(());
            }
        };

        self.submit(form.editing, &fields);
        self.view.close();
        Ok(())
    }

    fn submit(&mut self, editing: Option<i64>, fields: &NurseFields) {
        if !self.view.begin_request() {
            self.view
                .notify(NoticeKind::Error, "Another request is still in progress");
            return;
        }

        let result = match editing {
            None => self.client.create(fields).map(|record| {
                let message = format!("Added {} (id {})", record.name, record.id);
                self.roster.apply_created(record);
                message
            }),
            Some(id) => self.client.update(id, fields).map(|record| {
                let message = format!("Updated {} (id {})", record.name, record.id);
                self.roster.apply_updated(record);
                message
            }),
        };
        self.view.finish_request();

        match result {
            Ok(message) => self.view.notify(NoticeKind::Success, message),
            Err(e) => self.view.notify(NoticeKind::Error, e.to_string()),
        }
    }

    fn confirm_delete<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        let (id, name) = match self.view.modal() {
            Modal::ConfirmDelete { id, name } => (*id, name.clone()),
            _ => return Ok(()),
        };

        write!(out, "Delete {name} (id {id})? [y/N] ")?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            self.view.close();
            return Ok(());
        }

        if self.view.begin_request() {
            let result = self.client.delete(id);
            self.view.finish_request();
            match result {
                Ok(()) => {
                    self.roster.apply_removed(id);
                    self.view.notify(NoticeKind::Success, format!("Deleted {name}"));
                }
                Err(e) => self.view.notify(NoticeKind::Error, e.to_string()),
            }
        }
        self.view.close();
        Ok(())
    }

    fn export(&mut self, format: ExportFormat, path: Option<PathBuf>) {
        let rows = self.roster.visible();
        let path = path.unwrap_or_else(|| {
            PathBuf::from(export_filename(
                COLLECTION_NAME,
                format,
                Local::now().date_naive(),
            ))
        });

        let written = export::render(format, &rows)
            .map_err(|e| e.user_message())
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(|e| e.to_string()));

        match written {
            Ok(()) => self.view.notify(
                NoticeKind::Success,
                format!("Exported {} rows to {}", rows.len(), path.display()),
            ),
            Err(msg) => self.view.notify(NoticeKind::Error, msg),
        }
    }

    fn print_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rows = self.roster.visible();
        writeln!(out, "{}", render::table(&rows, self.roster.sort_state()))?;
        if self.roster.is_empty() {
            writeln!(out, "No nurses yet, type 'add' to create one")
        } else if self.roster.search().trim().is_empty() {
            writeln!(out, "{} nurses", self.roster.len())
        } else {
            writeln!(
                out,
                "{} of {} nurses match '{}'",
                rows.len(),
                self.roster.len(),
                self.roster.search().trim()
            )
        }
    }

    fn print_notice<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.view.take_notice() {
            Some(notice) if notice.kind == NoticeKind::Error => writeln!(out, "error: {}", notice.text),
            Some(notice) => writeln!(out, "{}", notice.text),
            None => Ok(()),
        }
    }
}

/// Asks for each form field in turn; an empty answer keeps the shown value.
///
/// Entering a date of birth fills in the derived age as the default for the
/// age prompt. Returns `false` if input ended before the form was complete.
pub fn prompt_form<R: BufRead, W: Write>(
    form: &mut NurseForm,
    input: &mut R,
    out: &mut W,
    today: NaiveDate,
) -> io::Result<bool> {
    let Some(name) = ask(input, out, "Name", &form.name)? else {
        return Ok(false);
    };
    form.name = name;

    let Some(license) = ask(input, out, "License number", &form.license_number)? else {
        return Ok(false);
    };
    form.license_number = license;

    let Some(dob) = ask(input, out, "Date of birth (YYYY-MM-DD)", &form.dob)? else {
        return Ok(false);
    };
    if dob != form.dob {
        form.set_dob(&dob, today);
    }

    let Some(age) = ask(input, out, "Age", &form.age)? else {
        return Ok(false);
    };
    form.set_age(&age);
    Ok(true)
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: &str,
) -> io::Result<Option<String>> {
    if current.is_empty() {
        write!(out, "{label}: ")?;
    } else {
        write!(out, "{label} [{current}]: ")?;
    }
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    Ok(Some(if answer.is_empty() {
        current.to_string()
    } else {
        answer.to_string()
    }))
}
