/// interactive terminal menu driving one simulation session
pub mod cli_main;
