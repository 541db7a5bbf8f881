pub mod console;
pub mod events;
pub mod theme;
