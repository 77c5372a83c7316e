pub mod counter;
pub mod date_key;
pub mod edition;

pub use counter::DateCounter;
pub use date_key::DateKey;
pub use edition::{EditionName, PAYLOAD_EXTENSION, TRANSCRIPT_EXTENSION};
