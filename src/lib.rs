pub mod extractor;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod output;
pub mod pagination;
pub mod parser;
pub mod prompt;
pub mod selectors;
