pub mod config;
pub mod logging;
pub mod session;

pub mod capture;
pub mod content_api;
pub mod css;
pub mod dom;
pub mod editor;
pub mod repo_path;
pub mod retry;
pub mod surface;
