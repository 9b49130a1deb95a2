pub mod book;
pub mod classify;
pub mod delivery;
pub mod index;
