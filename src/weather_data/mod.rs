pub mod data_loader;
pub mod error;
pub mod responses;
pub mod table_fetcher;
