//! Core library for Nursedesk, a nurse personnel record manager.
//!
//! The server-side entry point is [`NurseStore`], a SQLite-backed table of
//! [`NurseRecord`]s. Client-side code mirrors that table in a [`Roster`],
//! orders and narrows it with the pure functions in [`query`], drives the
//! create/edit/delete dialogs through [`ViewState`], and writes the visible
//! rows out with [`export`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

pub use self::core::{export, query};

// Re-export commonly used types.
#[doc(inline)]
pub use self::core::{
    error::{NursedeskError, Result},
    export::{export_filename, ExportFormat, EXPORT_HEADERS},
    form::{derive_age, Modal, Notice, NoticeKind, NurseForm, ViewState},
    nurse::{NurseFields, NurseInput, NurseRecord, DOB_FORMAT},
    query::{SortColumn, SortDirection, SortState},
    roster::Roster,
    storage::Storage,
    store::NurseStore,
};

#[cfg(feature = "client")]
#[doc(inline)]
pub use self::core::client::{ApiClient, ClientError, ClientResult};
