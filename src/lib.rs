//! taskdeck: a client-side task and project store over a remote REST API.
//!
//! The core is [`store::EntityStore`]: the authoritative in-memory entity
//! list plus a derived filtered/sorted view, with mutation methods that call
//! the remote service and reconcile local state. Everything else (the CLI,
//! the HTTP client, snapshot persistence) is a thin collaborator around it.

pub mod cli;
pub mod io;
pub mod model;
pub mod remote;
pub mod store;
