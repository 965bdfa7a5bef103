#[allow(non_snake_case)]
pub mod Reactions;
#[allow(non_snake_case)]
pub mod Substances;
pub mod cli;
pub mod library_manager;
pub mod settings;
