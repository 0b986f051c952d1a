
pub use test_helper::with_temp_dir;
