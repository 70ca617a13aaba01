use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use super::credential::CredentialSource;
use super::parsing::Document;
use crate::core::{Result, Settings, XbrlError};

pub const TASK_PARAM: &str = "Task";
pub const API_KEY_PARAM: &str = "API_Key";

/// One remote call: a task plus scalar parameters in the order they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub task: &'static str,
    pub params: Vec<(String, String)>,
    pub requires_credential: bool,
}

impl Request {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes one remote operation and returns the parsed response.
pub trait Transport {
    fn execute(&self, request: &Request) -> Result<Document>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &Request) -> Result<Document> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &Request) -> Result<Document> {
        (**self).execute(request)
    }
}

/// Blocking HTTP transport against the dispatch endpoint.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credential: Box<dyn CredentialSource>,
}

impl HttpTransport {
    pub fn new(settings: &Settings, credential: Box<dyn CredentialSource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            credential,
        })
    }

    /// Full request URL. The credential is fetched first so a missing key fails
    /// before anything is sent.
    pub fn request_url(&self, request: &Request) -> Result<Url> {
        let api_key = if request.requires_credential {
            Some(self.credential.get()?)
        } else {
            None
        };

        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(TASK_PARAM, request.task);
            for (name, value) in &request.params {
                query.append_pair(name, value);
            }
            if let Some(key) = &api_key {
                query.append_pair(API_KEY_PARAM, key);
            }
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> Result<Document> {
        let url = self.request_url(request)?;
        debug!("GET {} {:?}", request.task, request.params);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/xml, application/xml")
            .send()?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text()?;

        debug!("Response status: {}, {} bytes", status, body.len());
        interpret_response(status, content_type.as_deref(), &body)
    }
}

/// Validates status and content type, then parses the body.
pub fn interpret_response(status: u16, content_type: Option<&str>, body: &str) -> Result<Document> {
    if status >= 400 {
        let detail = match Document::parse(body) {
            Ok(doc) => doc.root.text_content(),
            Err(_) => body.trim().to_string(),
        };
        warn!("Remote service returned {}: {}", status, detail);
        return Err(XbrlError::Transport {
            status,
            message: detail,
        });
    }

    if !is_xml(content_type) {
        warn!("Unexpected content type {:?}", content_type);
        return Err(XbrlError::Transport {
            status,
            message: format!(
                "expected an XML response, got {}: {}",
                content_type.unwrap_or("no content type"),
                body.trim()
            ),
        });
    }

    Document::parse(body)
}

fn is_xml(content_type: Option<&str>) -> bool {
    let Some(parsed) = content_type.and_then(|ct| ct.parse::<mime::Mime>().ok()) else {
        return false;
    };
    parsed.subtype() == mime::XML || parsed.suffix() == Some(mime::XML)
}
