pub mod log;
pub mod shell;
pub mod students;
