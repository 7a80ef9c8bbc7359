use reqwest::cookie::Jar;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

/// Browser storage state saved after logging in to ClubWise.
///
/// Only the cookies are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "root_path")]
    pub path: String,
}

fn root_path() -> String {
    "/".to_string()
}

impl StoredCookie {
    /// `Set-Cookie` style string and the URL it was set from.
    ///
    /// Browsers store host-only cookies without a leading dot; those are
    /// replayed without a `Domain` attribute so they stay host-only.
    pub fn to_set_cookie(&self) -> Option<(String, Url)> {
        let host = self.domain.trim_start_matches('.');
        let url = Url::parse(&format!("https://{host}{}", self.path)).ok()?;
        let mut header = format!("{}={}", self.name, self.value);
        if self.domain.starts_with('.') {
            header.push_str(&format!("; Domain={}", self.domain));
        }
        header.push_str(&format!("; Path={}", self.path));
        Some((header, url))
    }
}

impl StorageState {
    /// A cookie jar holding every stored cookie for its own domain and path.
    pub fn cookie_jar(&self) -> Jar {
        let jar = Jar::default();
        for cookie in &self.cookies {
            match cookie.to_set_cookie() {
                Some((header, url)) => jar.add_cookie_str(&header, &url),
                None => warn!(
                    domain = %cookie.domain,
                    name = %cookie.name,
                    "skipping cookie with unusable domain"
                ),
            }
        }
        debug!(count = self.cookies.len(), "loaded session cookies");
        jar
    }
}
