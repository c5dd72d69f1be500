//! Program structure and dataflow shared by both schedulers.

mod deps;
mod sections;


pub use deps::{analyze, Analysis, Carried, Dep, Dependencies};
pub use sections::Sections;
