#![deny(unused_imports)]

pub mod collector;
pub mod filler;
pub mod form;

pub use collector::{annotate_document, ask_document_type, pending_documents, run_session, PendingDocument, SessionOutcome};
pub use filler::{ScriptedFiller, TerminalFormFiller};
pub use form::{fill_form, form_for, FieldDescriptor, FieldKind, Presence};
