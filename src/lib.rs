pub mod app;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod seed;
pub mod session;
pub mod storage;
pub mod tui;
pub mod wiring;
