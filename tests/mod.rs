mod common;
mod config_tests;
