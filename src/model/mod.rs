pub mod book;
pub mod config;
pub mod entity;
pub mod message;
pub mod record;
pub mod vault;

pub use book::*;
pub use config::*;
pub use entity::*;
pub use message::*;
pub use record::*;
pub use vault::*;
