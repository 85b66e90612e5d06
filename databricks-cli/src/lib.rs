pub mod cli;
pub mod config;
pub mod dbfs;
mod local;
pub mod logging;
pub mod paths;
pub mod remote;
pub mod workspace;

#[cfg(test)]
mod testing;
