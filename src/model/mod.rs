//! Data model for keyed numeric tables

mod key;
mod table;

pub use key::{key_bits, sorted_key_union};
pub use table::KeyedTable;
