use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::domain::logging::{LogComponent, get_logger};

pub mod app;
pub mod application;
pub mod domain;
pub mod ecs;
pub mod event_utils;
pub mod global_state;
pub mod infrastructure;
pub mod macros;
pub mod presentation;
pub mod time_utils;
pub mod view_state;

/// Installs the panic hook, the console logger and the browser clock.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    // Create the UI signals outside any component so no owner disposes them.
    global_state::globals();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(
        infrastructure::services::BrowserTimeProvider::new(),
    ));

    get_logger().info(LogComponent::Presentation("Initialize"), "Trade map runtime initialized");
}

/// Mounts the Leptos app into `<body>`.
#[wasm_bindgen]
pub fn mount_app() {
    leptos::mount_to_body(|| leptos::view! { <App /> });
}
