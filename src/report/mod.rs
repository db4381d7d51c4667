//! Result-table assembly and formatted terminal output.

pub mod table;

pub use table::*;
