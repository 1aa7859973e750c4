pub mod app;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod repository;
pub mod services;
pub mod telegram;

#[cfg(test)]
mod test_support;
