use crate::shared::response::types::Response;

/// Serializes a `Response` for a given transport.
pub trait Renderer: Send + Sync {
    fn render(&self, response: &Response) -> Vec<u8>;

    fn content_type(&self) -> &'static str;
}
