pub mod errors;
pub mod handlers;
pub mod pipeline;
pub mod types;
pub mod utils;
