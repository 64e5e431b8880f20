//! Desktop control panel and live preview

mod app;
mod components;
mod constants;
mod textures;

pub use app::run_gui;
