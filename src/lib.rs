//! Product Form
//!
//! Lifecycle engine for a form that creates or edits a single product record:
//! mode resolution and loading, a revision date derived from the release date,
//! an asynchronous identifier uniqueness check, and single-flight submission
//! to a remote record store.

pub mod cache;
pub mod calendar;
pub mod config;
pub mod derived;
pub mod form;
pub mod lifecycle;
pub mod navigation;
pub mod prelude;
pub mod products;
pub mod scope;
pub mod store;
pub mod submission;
pub mod uniqueness;
