pub mod config;
pub mod heal;
pub mod inspect;
pub mod migrate;
pub mod render;
pub mod show;
pub mod task;
