//! Types shared between the todo controller, its task sources, and front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
