mod trim;

pub use trim::{trim, TrimOptions};
