pub mod command;
pub mod output;
pub mod runner;

pub use runner::run;
