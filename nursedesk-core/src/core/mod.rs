//! Internal domain modules for the Nursedesk core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

#[cfg(feature = "client")]
pub mod client;
pub mod error;
pub mod export;
pub mod form;
pub mod nurse;
pub mod query;
pub mod roster;
pub mod storage;
pub mod store;
