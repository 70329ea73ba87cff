pub mod cli;
pub mod config;
pub mod map;
pub mod storage;
pub mod xml;
