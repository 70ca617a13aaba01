use once_cell::sync::OnceCell;

use crate::core::{Result, XbrlError};

/// Supplies the API key attached to requests.
pub trait CredentialSource: Send + Sync {
    fn get(&self) -> Result<String>;
}

/// Reads the key from an environment variable on first use and keeps it for the
/// rest of the process.
#[derive(Debug)]
pub struct EnvCredential {
    var: String,
    cached: OnceCell<String>,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            cached: OnceCell::new(),
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialSource for EnvCredential {
    fn get(&self) -> Result<String> {
        self.cached
            .get_or_try_init(|| {
                let value = std::env::var(&self.var).unwrap_or_default();
                non_blank(value).ok_or_else(|| {
                    XbrlError::config(format!(
                        "{} environment variable not set. Please run with: {}=your-key-here",
                        self.var, self.var
                    ))
                })
            })
            .cloned()
    }
}

/// Fixed key, for callers that manage secrets themselves.
#[derive(Debug, Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        StaticCredential(key.into())
    }
}

impl CredentialSource for StaticCredential {
    fn get(&self) -> Result<String> {
        non_blank(self.0.clone()).ok_or_else(|| XbrlError::config("API key is empty"))
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
