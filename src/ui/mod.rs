//! Hardware front panel: GPIO buttons and the ILI9342C TFT.

pub mod buttons;
pub mod screen;

pub use buttons::PanelButtons;
pub use screen::PanelScreen;
