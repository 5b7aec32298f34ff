pub mod debug_cli;
