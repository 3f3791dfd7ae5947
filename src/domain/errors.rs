/// Flat error set: every failure degrades to "nothing renders" plus a log line.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    NetworkError(String),
    DataError(String),
    BoundaryError(String),
    RenderingError(String),
    ValidationError(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            AppError::DataError(msg) => write!(f, "Data Error: {}", msg),
            AppError::BoundaryError(msg) => write!(f, "Boundary Error: {}", msg),
            AppError::RenderingError(msg) => write!(f, "Rendering Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::DataError(error.to_string())
    }
}

impl From<AppError> for wasm_bindgen::JsValue {
    fn from(error: AppError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}

pub type NetworkResult<T> = Result<T, AppError>;
pub type DataResult<T> = Result<T, AppError>;
pub type RenderingResult<T> = Result<T, AppError>;
