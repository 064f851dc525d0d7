mod dto;
mod errors;
mod server;

pub use server::run_stdio_server;
