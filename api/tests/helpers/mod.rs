pub mod app;
pub mod fixtures;

pub use app::{TestApp, make_test_app};
