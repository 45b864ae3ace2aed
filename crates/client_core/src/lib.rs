//! Client-side todo list core: task sources, the list controller, and
//! settings for front-ends that host it.

mod controller;
pub mod settings;
pub mod source;

pub use controller::{LoadState, TodoController};
pub use settings::{load_settings, Settings};
pub use source::{
    HttpTaskSource, JsonFileTaskSource, SourceError, SourceResult, StaticTaskSource, TaskSource,
};
