pub mod cli;
pub mod data;
pub mod game;
pub mod server;
