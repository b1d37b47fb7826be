//! Console frontend for the shopfront catalog.
//!
//! Pages bridge user input and the resource services the way the
//! browser UI does: a form, the cached collection, and reactions to
//! operation outcomes. Rendering stays out of the pages so they can be
//! driven from the command loop in `main` and from tests alike.

pub mod config;
pub mod pages;
pub mod routes;
