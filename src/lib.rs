pub mod api;
pub mod config;
pub mod controls;
pub mod dataset;
pub mod error;
pub mod export;
pub mod grid;
pub mod index;
pub mod playback;
pub mod state;
pub mod throttle;
pub mod timekey;
