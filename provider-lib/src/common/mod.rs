pub mod features;
pub mod utils;
