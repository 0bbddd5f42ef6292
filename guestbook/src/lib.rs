pub mod api;
pub mod config;
pub mod entry;
pub mod global;
pub mod service;
pub mod store;
pub mod template;

#[cfg(test)]
mod tests;
