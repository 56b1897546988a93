//! HTTP surface: route dispatch and the worker serve loop
//!
//! Transport boilerplate only; all request semantics live in the pipeline.
//! Routes: `POST /wcl` renders, `/` answers a health string, everything
//! else is 404/405. Each worker thread pulls requests off the shared
//! acceptor and runs the pipeline synchronously end to end.

use std::sync::Arc;

use anyhow::anyhow;
use log::{error, info, warn};
use tiny_http::{Header, Method, Response, Server};

use crate::masks::MaskStore;
use crate::pipeline::Pipeline;
use crate::render::CloudRenderer;
use crate::request::RenderRequest;

const HOME_BODY: &str = r"\_O_/";

/// A transport-agnostic response triple, kept separate from `tiny_http`
/// types so dispatch stays unit-testable without sockets.
#[derive(Debug)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpReply {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
        }
    }

    fn error_json(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string().into_bytes();
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }
}

/// Route one request to a reply.
pub fn dispatch<R: CloudRenderer, M: MaskStore>(
    pipeline: &Pipeline<R, M>,
    method: &Method,
    url: &str,
    body: &[u8],
) -> HttpReply {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get | Method::Post, "/") => HttpReply::text(200, HOME_BODY),
        (Method::Post, "/wcl") => {
            let request: RenderRequest = match serde_json::from_slice(body) {
                Ok(request) => request,
                Err(e) => return HttpReply::error_json(400, &format!("Invalid JSON body: {e}")),
            };
            match pipeline.handle(&request) {
                Ok(png) => HttpReply {
                    status: 200,
                    content_type: "image/png",
                    body: png,
                },
                Err(e) => {
                    let status = e.status();
                    if status >= 500 {
                        error!("render request failed: {e}");
                    }
                    HttpReply::error_json(status, &e.to_string())
                }
            }
        }
        (_, "/wcl") => HttpReply::error_json(405, "Method not allowed"),
        _ => HttpReply::error_json(404, "Not found"),
    }
}

fn into_response(reply: HttpReply) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }
    response
}

/// Bind `addr` and serve until the process exits.
///
/// `workers` threads share one acceptor; each request is handled
/// synchronously on the thread that accepted it. Per-request failures are
/// logged and answered, never allowed to take a worker down.
pub fn serve<R, M>(addr: &str, pipeline: Arc<Pipeline<R, M>>, workers: usize) -> anyhow::Result<()>
where
    R: CloudRenderer + 'static,
    M: MaskStore + 'static,
{
    let server =
        Arc::new(Server::http(addr).map_err(|e| anyhow!("failed to bind {addr}: {e}"))?);
    info!("listening on http://{addr} with {workers} workers");

    let mut handles = Vec::with_capacity(workers);
    for worker in 0..workers {
        let server = Arc::clone(&server);
        let pipeline = Arc::clone(&pipeline);
        handles.push(std::thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = Vec::new();
                if let Err(e) = request.as_reader().read_to_end(&mut body) {
                    warn!("worker {worker}: failed to read request body: {e}");
                    let _ = request.respond(Response::empty(400));
                    continue;
                }
                let reply = dispatch(&pipeline, request.method(), request.url(), &body);
                if let Err(e) = request.respond(into_response(reply)) {
                    warn!("worker {worker}: failed to send response: {e}");
                }
            }
        }));
    }

    for handle in handles {
        let _ = handle.join();
    }
    Ok(())
}
