//! libcurl transport: one `Easy` handle per client, reset before every attempt.

use std::fmt;

use curl::easy::{Auth, Easy, List};

use super::{Attempt, TransportExecutor};
use crate::request::{CompiledRequest, Method};

/// [`TransportExecutor`] backed by a single libcurl easy handle.
///
/// The handle is reused across attempts and requests so libcurl can keep
/// connections alive; `reset()` wipes every option before the next attempt.
pub struct CurlTransport {
    easy: Easy,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self { easy: Easy::new() }
    }

    fn configure(&mut self, req: &CompiledRequest) -> Result<(), curl::Error> {
        let easy = &mut self.easy;
        easy.url(&req.url)?;

        match (req.method, req.body.is_empty()) {
            (Method::Head, _) => easy.nobody(true)?,
            (Method::Get, true) => easy.get(true)?,
            (Method::Post, _) => {
                easy.post(true)?;
                easy.post_fields_copy(&req.body)?;
            }
            (method, true) => easy.custom_request(method.as_str())?,
            (method, false) => {
                easy.custom_request(method.as_str())?;
                easy.post_fields_copy(&req.body)?;
            }
        }

        if !req.headers.is_empty() {
            let mut list = List::new();
            for (name, value) in &req.headers {
                list.append(&format!("{}: {}", name.trim(), value.trim()))?;
            }
            easy.http_headers(list)?;
        }

        if let Some(timeout) = req.timeout {
            easy.timeout(timeout)?;
        }
        easy.ssl_verify_peer(req.verify_peer)?;
        easy.ssl_verify_host(req.verify_host)?;

        if let Some(proxy) = &req.proxy {
            easy.proxy(&proxy.url)?;
            if let Some(user) = &proxy.username {
                easy.proxy_username(user)?;
            }
            if let Some(pass) = &proxy.password {
                easy.proxy_password(pass)?;
            }
        }

        if let Some(auth) = &req.auth {
            easy.username(&auth.username)?;
            easy.password(&auth.password)?;
            let mut scheme = Auth::new();
            scheme.basic(true);
            easy.http_auth(&scheme)?;
        }

        Ok(())
    }

    /// Returns (status, raw header block, body).
    fn perform(&mut self, req: &CompiledRequest) -> Result<(u32, String, Vec<u8>), curl::Error> {
        self.configure(req)?;

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|data| {
                // Lossy so non-UTF-8 lines are kept. Leading whitespace marks folded lines.
                let line = String::from_utf8_lossy(data);
                header_lines.push(line.trim_end_matches(['\r', '\n']).to_string());
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = self.easy.response_code()?;
        Ok((code, header_lines.join("\r\n"), body))
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CurlTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlTransport").finish_non_exhaustive()
    }
}

impl TransportExecutor for CurlTransport {
    fn reset(&mut self) {
        self.easy.reset();
    }

    fn execute(&mut self, req: &CompiledRequest) -> Attempt {
        tracing::trace!(method = %req.method, url = %req.url, "curl round trip");
        match self.perform(req) {
            Ok((code, raw_headers, body)) => match u16::try_from(code) {
                Ok(status) if status > 0 => {
                    Attempt::from_raw(status, &raw_headers, String::from_utf8_lossy(&body))
                }
                _ => Attempt::failed(format!("no HTTP status received (code {code})"), false),
            },
            Err(e) => Attempt::failed(e.to_string(), e.is_operation_timedout()),
        }
    }
}
