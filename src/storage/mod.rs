pub mod tables;

pub use tables::{ResultWriter, TableKind, TableRow};
