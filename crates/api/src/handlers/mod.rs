pub mod health;
pub mod query;
pub mod stats;

pub use health::health_check;
pub use query::{handle_get, handle_post, method_not_supported};
pub use stats::get_stats;
