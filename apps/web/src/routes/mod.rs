//! Route collaborators mounted by the bootstrap: `/` and `/api`.

pub mod api;
pub mod index;
