pub mod http;
pub mod rendering;
pub mod runtime;
pub mod services;

pub use http::{LoadProgress, TradeDataClient};
pub use runtime::BrowserSession;
pub use services::{BrowserTimeProvider, ConsoleLogger};
