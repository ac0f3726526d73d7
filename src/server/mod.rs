//! Site + admin HTTP server.
//!
//! Runs a tiny HTTP server on a background thread. Public routes render
//! pages, products and blog posts; `/admin/api/...` lists the widget
//! catalog and loads or replaces widget lists. Handlers are async and run
//! on the tokio runtime the server was started from.
//!
//! - `routes`: request line → route
//! - `site`: route → reply

mod routes;
mod site;

pub use site::{RenderedPage, Reply, Site};

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use tokio::runtime::Handle;

use crate::constants::MAX_ADMIN_BODY_BYTES;

/// A running server. Dropping it leaves the thread running; call
/// [`ServerHandle::shutdown`] to stop it.
pub struct ServerHandle {
    addr: SocketAddr,
    server: Arc<tiny_http::Server>,
    thread: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// The bound address (useful when started on port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting requests and wait for the server thread to exit.
    pub fn shutdown(mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Bind `addr` and serve `site` on a background thread.
pub fn start_server(addr: &str, site: Arc<Site>, runtime: Handle) -> Result<ServerHandle> {
    let server = tiny_http::Server::http(addr)
        .map_err(|e| anyhow!("failed to bind {}: {}", addr, e))?;
    let bound = server
        .server_addr()
        .to_ip()
        .context("server is not listening on an IP address")?;
    let server = Arc::new(server);
    let worker = Arc::clone(&server);

    let thread = std::thread::Builder::new()
        .name("vitrine-http".to_string())
        .spawn(move || {
            for mut request in worker.incoming_requests() {
                let method = request.method().as_str().to_string();
                let url = request.url().to_string();

                let reply = match read_body(&mut request) {
                    Ok(body) => runtime.block_on(site.handle(&method, &url, &body)),
                    Err(reply) => reply,
                };
                tracing::debug!(%method, %url, status = reply.status, "request");

                let mut response =
                    tiny_http::Response::from_string(reply.body).with_status_code(reply.status);
                if let Ok(header) =
                    tiny_http::Header::from_bytes("Content-Type", reply.content_type)
                {
                    response = response.with_header(header);
                }
                if let Err(e) = request.respond(response) {
                    tracing::debug!("failed to send response: {}", e);
                }
            }
        })
        .context("failed to spawn server thread")?;

    tracing::info!(addr = %bound, "server started");
    Ok(ServerHandle {
        addr: bound,
        server,
        thread: Some(thread),
    })
}

/// Read the request body, refusing anything over the admin limit.
fn read_body(request: &mut tiny_http::Request) -> Result<String, Reply> {
    if request
        .body_length()
        .is_some_and(|len| len > MAX_ADMIN_BODY_BYTES)
    {
        return Err(Reply::error(413, "request body too large"));
    }
    let mut body = String::new();
    request
        .as_reader()
        .take(MAX_ADMIN_BODY_BYTES as u64 + 1)
        .read_to_string(&mut body)
        .map_err(|e| Reply::error(400, format!("unreadable body: {}", e)))?;
    if body.len() > MAX_ADMIN_BODY_BYTES {
        return Err(Reply::error(413, "request body too large"));
    }
    Ok(body)
}
