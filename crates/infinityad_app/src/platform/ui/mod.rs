pub mod constants;
pub mod render;
pub mod widgets;

pub use widgets::Palette;
