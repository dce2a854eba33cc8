// API client module: the remote side of upload mode. `Uploader` is the
// narrow seam the rewrite pass calls through; `XmlRpcUploader` is the real
// implementation, a small blocking client for the WordPress XML-RPC
// `wp.uploadFile` method.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::UploadError;

/// Media type sent with every upload; the endpoint sniffs the real one.
pub const UPLOAD_MIME: &str = "image/*";

/// Anything that can turn image bytes into a remote URL.
pub trait Uploader {
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String, UploadError>;
}

impl<U: Uploader + ?Sized> Uploader for &U {
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String, UploadError> {
        (**self).upload(bytes, filename)
    }
}

/// Blocking XML-RPC client holding the endpoint URL and credentials.
pub struct XmlRpcUploader {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
    timeout_secs: u64,
}

impl XmlRpcUploader {
    /// Build a client from the stored configuration. The request timeout
    /// comes from `timeout_secs`.
    pub fn new(config: &Config) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UploadError::Network {
                url: config.url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(XmlRpcUploader {
            client,
            endpoint: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

impl Uploader for XmlRpcUploader {
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String, UploadError> {
        let body = upload_file_call(&self.username, &self.password, filename, bytes);
        debug!(endpoint = %self.endpoint, filename, size = bytes.len(), "sending wp.uploadFile");

        let res = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    UploadError::Timeout {
                        url: self.endpoint.clone(),
                        secs: self.timeout_secs,
                    }
                } else {
                    UploadError::Network {
                        url: self.endpoint.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().unwrap_or_else(|_| "".into());
            return Err(UploadError::Status { status, body });
        }
        let text = res.text().map_err(|e| UploadError::Network {
            url: self.endpoint.clone(),
            reason: format!("failed to read response body: {e}"),
        })?;

        let url = parse_upload_response(&text)?;
        info!(filename, %url, "uploaded image");
        Ok(url)
    }
}

/// Serialize a `wp.uploadFile` method call. Blog id is always 0.
pub fn upload_file_call(username: &str, password: &str, filename: &str, bytes: &[u8]) -> String {
    use quick_xml::escape::escape;
    format!(
        concat!(
            r#"<?xml version="1.0"?>"#,
            "<methodCall><methodName>wp.uploadFile</methodName><params>",
            "<param><value><int>0</int></value></param>",
            "<param><value><string>{}</string></value></param>",
            "<param><value><string>{}</string></value></param>",
            "<param><value><struct>",
            "<member><name>name</name><value><string>{}</string></value></member>",
            "<member><name>type</name><value><string>{}</string></value></member>",
            "<member><name>bits</name><value><base64>{}</base64></value></member>",
            "</struct></value></param>",
            "</params></methodCall>"
        ),
        escape(username),
        escape(password),
        escape(filename),
        UPLOAD_MIME,
        STANDARD.encode(bytes)
    )
}

/// Scalar struct members of a method response, plus whether it was a fault.
#[derive(Debug, Default)]
struct MethodResponse {
    fault: bool,
    members: HashMap<String, String>,
}

fn read_method_response(body: &str) -> Result<MethodResponse, UploadError> {
    let mut reader = Reader::from_reader(body.as_bytes());
    reader.config_mut().trim_text(true);

    let mut out = MethodResponse::default();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut member_name: Option<String> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = e.name().as_ref().to_vec();
                if tag == b"fault" {
                    out.fault = true;
                }
                open.push(tag);
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"member" {
                    member_name = None;
                }
                open.pop();
            }
            Ok(Event::Text(te)) => {
                let text = te
                    .unescape()
                    .map_err(|e| UploadError::MalformedResponse(e.to_string()))?
                    .into_owned();
                match open.last().map(Vec::as_slice) {
                    Some(b"name") => member_name = Some(text),
                    Some(_) if open.iter().any(|t| t == b"value") => {
                        if let Some(name) = member_name.take() {
                            out.members.entry(name).or_insert(text);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(UploadError::MalformedResponse(format!(
                    "invalid XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

/// Pull the uploaded file's URL out of a `wp.uploadFile` response.
pub fn parse_upload_response(body: &str) -> Result<String, UploadError> {
    let response = read_method_response(body)?;
    if response.fault {
        let code = response
            .members
            .get("faultCode")
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(0);
        let message = response
            .members
            .get("faultString")
            .cloned()
            .unwrap_or_default();
        return Err(UploadError::Fault { code, message });
    }
    response
        .members
        .get("url")
        .cloned()
        .ok_or_else(|| UploadError::MalformedResponse("response has no `url` member".into()))
}
