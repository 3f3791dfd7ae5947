pub mod errors;
pub mod geography;
pub mod logging;
pub mod playback;
pub mod screen;
pub mod trades;
