//! Database connectivity for the web application.
//!
//! Only MongoDB is supported. The connection model follows the bootstrap's
//! contract: opening the client never blocks startup, and connectivity
//! failures are logged rather than escalated.

pub mod mongo;
