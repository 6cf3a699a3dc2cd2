//! Snipbin - a small web application for sharing short, expiring text snippets.
//!
//! Visitors browse the ten most recent snippets, view a single snippet, and
//! submit new ones through a validated HTML form. Every snippet carries an
//! expiry timestamp; expired rows stay in the database but are invisible to
//! every read.
//!
//! # Architecture
//!
//! - **Store**: snippet repository over SQLite, expiry enforced as a query
//!   predicate rather than a background reaper
//! - **Templates**: all page templates are composed from layout and partial
//!   fragments once at startup and cached immutably by page name
//! - **Forms**: declarative field validation accumulating per-field messages
//! - **Flash**: one-shot notification carried in a signed cookie across a
//!   redirect-then-render cycle
//! - **Middleware**: panic recovery, request logging and security headers
//!   wrap every route; static assets bypass the flash/session layer
//!
//! # Routes
//!
//! ```text
//! GET  /                  Latest snippets
//! GET  /snippet/{id}      View one snippet
//! GET  /snippet/create    New snippet form
//! POST /snippet/create    Submit a new snippet
//! GET  /static/*          Static assets
//! ```

pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
pub mod templates;

pub use config::Config;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
