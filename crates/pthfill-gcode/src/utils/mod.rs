//! File helpers

pub mod file_io;

pub use file_io::{read_program, write_program};
