pub mod config;
pub mod corpus;
pub mod dates;
pub mod document;
pub mod error;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod print;
pub mod rotation;
pub mod splice;
pub mod verse;
pub mod workspace;

pub use error::{AgendaError, Result};
