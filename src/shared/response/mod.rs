pub mod json;
pub mod render;
pub mod types;


pub use json::JsonRenderer;
pub use render::Renderer;
pub use types::{Response, ResponseBody, StatusCode};
