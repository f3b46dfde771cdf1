pub mod classifier;
pub mod finbert;
pub mod mock;
pub mod post_source;
pub mod quote_provider;
pub mod twitter;
pub mod yahoo;
