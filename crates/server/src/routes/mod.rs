// HTTP routes
pub mod export;
pub mod health;
pub mod scrape;
pub mod static_files;

pub use export::*;
pub use health::*;
pub use scrape::*;
pub use static_files::*;
