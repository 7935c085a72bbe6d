mod dashboard;
pub mod dialogs;
pub mod form_field;
pub mod keybindings;
mod panels;
pub mod terminal_guard;
pub mod theme;

pub use dashboard::{Dashboard, FocusedPanel};
