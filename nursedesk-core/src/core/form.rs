//! Form and modal state for the create/edit/delete interactions.

use crate::{NurseFields, NurseInput, NurseRecord, Result, DOB_FORMAT};
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

/// Whole years elapsed between `dob` and `today`.
///
/// The calendar-year difference, minus one if this year's birthday (month and
/// day) has not yet arrived. A `dob` in the future yields 0.
pub fn derive_age(dob: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Editable values of the create/edit form, held as raw text.
///
/// `editing` is the id of the record being edited, or `None` when creating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NurseForm {
    pub editing: Option<i64>,
    pub name: String,
    pub license_number: String,
    pub dob: String,
    pub age: String,
}

impl NurseForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn for_record(record: &NurseRecord) -> Self {
        Self {
            editing: Some(record.id),
            name: record.name.clone(),
            license_number: record.license_number.clone(),
            dob: record.dob_string(),
            age: record.age.to_string(),
        }
    }

    /// Sets the date of birth and, if it parses, fills `age` with the derived value.
    ///
    /// The filled age stays editable; nothing re-checks it against `dob` later.
    pub fn set_dob(&mut self, dob: &str, today: NaiveDate) {
        self.dob = dob.trim().to_string();
        if let Ok(parsed) = NaiveDate::parse_from_str(&self.dob, DOB_FORMAT) {
            self.age = derive_age(parsed, today).to_string();
        }
    }

    pub fn set_age(&mut self, age: &str) {
        self.age = age.trim().to_string();
    }

    /// Validates the form the same way the server validates a request body.
    pub fn submit(&self) -> Result<NurseFields> {
        NurseInput {
            name: Some(self.name.clone()),
            license_number: Some(self.license_number.clone()),
            dob: Some(self.dob.clone()),
            age: Some(Value::String(self.age.clone())),
        }
        .validate()
    }
}

/// Which dialog, if any, is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Editing(NurseForm),
    ConfirmDelete { id: i64, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message shown after an action completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Dialog state plus the single-request-in-flight guard.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    modal: Modal,
    pending: bool,
    notice: Option<Notice>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut Modal {
        &mut self.modal
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Editing(NurseForm::blank());
    }

    pub fn open_edit(&mut self, record: &NurseRecord) {
        self.modal = Modal::Editing(NurseForm::for_record(record));
    }

    pub fn open_delete(&mut self, record: &NurseRecord) {
        self.modal = Modal::ConfirmDelete {
            id: record.id,
            name: record.name.clone(),
        };
    }

    pub fn close(&mut self) {
        self.modal = Modal::Closed;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Marks a request as in flight. Returns `false`, changing nothing, if one
    /// already is.
    pub fn begin_request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn finish_request(&mut self) {
        self.pending = false;
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    /// Takes the pending notice, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NursedeskError;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_derive_age_before_and_after_birthday() {
        let dob = date(1990, 6, 15);
        assert_eq!(derive_age(dob, date(2024, 6, 14)), 33);
        assert_eq!(derive_age(dob, date(2024, 6, 15)), 34);
        assert_eq!(derive_age(dob, date(2024, 12, 1)), 34);
    }

    #[test]
    fn test_derive_age_future_dob_is_zero() {
        assert_eq!(derive_age(date(2030, 1, 1), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_set_dob_fills_age_but_age_stays_editable() {
        let mut form = NurseForm::blank();
        form.set_dob("1990-01-01", date(2024, 3, 1));
        assert_eq!(form.age, "34");

        form.set_age("50");
        let fields = form_with_identity(form).submit().unwrap();
        assert_eq!(fields.age, 50);
        assert_eq!(fields.dob, date(1990, 1, 1));
    }

    #[test]
    fn test_set_dob_unparseable_keeps_previous_age() {
        let mut form = NurseForm::blank();
        form.set_age("40");
        form.set_dob("1990-13-01", date(2024, 3, 1));
        assert_eq!(form.age, "40");
        assert_eq!(form.dob, "1990-13-01");
    }

    #[test]
    fn test_submit_rejects_missing_name() {
        let mut form = NurseForm::blank();
        form.license_number = "RN-1".to_string();
        form.set_dob("1990-01-01", date(2024, 3, 1));
        assert!(matches!(form.submit(), Err(NursedeskError::Validation(_))));
    }

    #[test]
    fn test_edit_form_prefills_record() {
        let now = Utc::now();
        let record = NurseRecord {
            id: 4,
            name: "Ann Lee".to_string(),
            license_number: "RN-1".to_string(),
            dob: date(1990, 1, 1),
            age: 34,
            created_at: now,
            updated_at: now,
        };

        let mut view = ViewState::new();
        view.open_edit(&record);
        match view.modal() {
            Modal::Editing(form) => {
                assert_eq!(form.editing, Some(4));
                assert_eq!(form.dob, "1990-01-01");
                assert_eq!(form.age, "34");
            }
            other => panic!("unexpected modal: {other:?}"),
        }

        view.open_delete(&record);
        assert_eq!(
            view.modal(),
            &Modal::ConfirmDelete {
                id: 4,
                name: "Ann Lee".to_string()
            }
        );
        view.close();
        assert_eq!(view.modal(), &Modal::Closed);
    }

    #[test]
    fn test_only_one_request_in_flight() {
        let mut view = ViewState::new();
        assert!(view.begin_request());
        assert!(!view.begin_request());
        view.finish_request();
        assert!(!view.is_pending());
        assert!(view.begin_request());
    }

    #[test]
    fn test_notice_is_taken_once() {
        let mut view = ViewState::new();
        view.notify(NoticeKind::Error, "License number already exists");
        assert_eq!(
            view.take_notice().map(|n| n.text),
            Some("License number already exists".to_string())
        );
        assert!(view.take_notice().is_none());
    }

    fn form_with_identity(mut form: NurseForm) -> NurseForm {
        form.name = "Ann Lee".to_string();
        form.license_number = "RN-1".to_string();
        form
    }
}
