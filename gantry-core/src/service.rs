//! Services under test

use std::collections::HashMap;

/// One service under test: a compose service name plus the framework it
/// represents and its resolved base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    /// Compose service name (e.g. "fastapi")
    pub service: String,
    /// Framework display name, used in the results table and for base URL
    /// lookup
    pub framework: String,
    /// Resolved base URL; `None` means the service is skipped entirely
    pub base_url: Option<String>,
    /// Whether request paths must carry a trailing slash (Django convention)
    pub trailing_slash: bool,
}

impl ServiceDescriptor {
    /// Build a descriptor for a compose service, resolving its base URL from
    /// the configured framework → URL map.
    pub fn resolve(service: &str, frameworks: &HashMap<String, String>) -> Self {
        let framework = display_name(service);
        let base_url = frameworks.get(&framework).cloned();
        let trailing_slash = framework.to_ascii_lowercase().contains("django");
        Self {
            service: service.to_string(),
            framework,
            base_url,
            trailing_slash,
        }
    }

    /// Apply the service's path convention before dispatch.
    pub fn normalize_path(&self, path: &str) -> String {
        if self.trailing_slash && !path.ends_with('/') {
            format!("{}/", path)
        } else {
            path.to_string()
        }
    }
}

/// Framework display name for a compose service ("fastapi" → "Fastapi").
fn display_name(service: &str) -> String {
    let mut chars = service.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
