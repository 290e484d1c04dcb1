mod app;
mod commands;
mod direct;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
