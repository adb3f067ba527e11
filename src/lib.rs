//! # teamrace lib

use std::{
    env,
    fs::create_dir_all,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use directories::ProjectDirs;

pub mod api;
pub mod catalog;
pub mod data;
pub mod error;
pub mod gui;
pub mod race;
pub mod utils;

pub static CHANNEL_BUFFER_DEFAULT: usize = 64;
pub static VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init(workspace: Option<PathBuf>) {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();

    if let Some(workspace) = workspace {
        if let Ok(mut w) = WORKSPACE.write() {
            *w = workspace;
        }
    }

    if let Ok(workspace) = WORKSPACE.read() {
        if let Err(err) = create_dir_all(&*workspace) {
            panic!("Initialize workspace error: {err}");
        }
    }
}

mod config;
mod ds;
mod fetch;
mod prefs;
mod store;

static APP_NAME: &str = env!("CARGO_PKG_NAME");

static CONFIG: LazyLock<tokio::sync::RwLock<config::Config>> =
    LazyLock::new(|| tokio::sync::RwLock::new(config::load().unwrap_or_default()));

static WORKSPACE: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        Some(proj_dirs) => proj_dirs.data_dir().to_path_buf(),
        None => env::current_dir().expect("Unable to get current directory!"),
    })
});
