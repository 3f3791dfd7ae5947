pub mod bootstrap;
pub mod wasm_api;

pub use bootstrap::{MapCanvases, load_map};
pub use wasm_api::MuhuratMapApi;
