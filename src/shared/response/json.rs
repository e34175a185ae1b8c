use crate::shared::response::render::Renderer;
use crate::shared::response::types::{Response, ResponseBody};
use serde::Serialize;
use serde_json::Value;

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonResponse<'a> {
    count: usize,
    status: u16,
    message: &'a str,
    results: Results<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Results<'a> {
    Lines(&'a [String]),
    Values(&'a [Value]),
}

impl Renderer for JsonRenderer {
    fn render(&self, response: &Response) -> Vec<u8> {
        let results = match &response.body {
            ResponseBody::Lines(lines) => Results::Lines(lines),
            ResponseBody::JsonArray(values) => Results::Values(values),
        };

        let payload = JsonResponse {
            count: response.count,
            status: response.status.code(),
            message: &response.message,
            results,
        };

        let mut buf = Vec::with_capacity(estimate_json_size(response));
        if serde_json::to_writer(&mut buf, &payload).is_err() {
            buf = b"{\"status\":500,\"message\":\"Failed to serialize JSON\"}".to_vec();
        }

        buf.push(b'\n');
        buf
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

fn estimate_json_size(response: &Response) -> usize {
    // {"count":X,"status":XXX,"message":"...","results":[]}
    let base = 64 + response.message.len();

    match &response.body {
        ResponseBody::Lines(lines) => base + lines.iter().map(|l| l.len() + 3).sum::<usize>(),
        ResponseBody::JsonArray(values) => base + values.len() * 128,
    }
}
