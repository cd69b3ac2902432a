use std::time::Duration;

/// Explicit session context for API-calling code. Created once on load and
/// cleared on logout; nothing reads ambient storage.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl Session {
    pub fn init(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Logout: drop the token but keep the connection pool.
    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(self.url(path)))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.post(self.url(path)))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.put(self.url(path)))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.delete(self.url(path)))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_init_then_clear() {
        let mut session = Session::init("http://localhost:8080/");
        assert!(!session.is_authenticated());
        assert_eq!(session.url("/api/candidates"), "http://localhost:8080/api/candidates");

        session.set_token("tok");
        assert!(session.is_authenticated());

        session.clear();
        assert!(!session.is_authenticated());
    }
}
