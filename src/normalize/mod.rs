pub mod clean;
pub mod format;
pub mod record;

pub use clean::{artist_key, clean, decade_of, split_multi, to_year};
pub use format::normalize_format;
