//! Platform abstraction layer
//!
//! Everything the host environment supplies:
//! - Frame timestamps
//! - Input events
//! - Key/value storage (LocalStorage on web, a JSON file natively)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{Command, InputEvent, InputRouter, Key, MenuChoice};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use time::FrameClock;
