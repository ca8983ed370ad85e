pub mod entry;

pub use entry::{parse_timestamp, Entry, Store};
