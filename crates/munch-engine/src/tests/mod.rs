mod common;
mod file_store;
mod statistics;
