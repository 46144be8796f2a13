pub mod health;
pub mod vital_trends;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
pub use vital_trends::{get_highest_by_day, get_weekly_averages, get_weekly_overview};
