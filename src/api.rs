use crate::model::{User, UserDraft};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The remote users resource. A trait so the views can run against a fake.
pub trait UserApi {
    fn list_users(&self) -> Result<Vec<User>>;
    fn get_user(&self, id: &str) -> Result<User>;
    fn create_user(&self, draft: &UserDraft) -> Result<User>;
    fn update_user(&self, id: u64, draft: &UserDraft) -> Result<User>;
    fn delete_user(&self, id: u64) -> Result<()>;
}

pub struct HttpClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

fn read_json<T: DeserializeOwned>(resp: Result<ureq::Response, ureq::Error>) -> Result<T> {
    match resp {
        Ok(r) => {
            let body: T = r.into_json()?;
            Ok(body)
        }
        Err(e) => Err(request_error(e)),
    }
}

fn request_error(err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            anyhow!("API error {}: {}", code, body)
        }
        e => anyhow!("Request failed: {}", e),
    }
}

impl UserApi for HttpClient {
    fn list_users(&self) -> Result<Vec<User>> {
        read_json(self.agent.get(&self.users_url()).call())
    }

    fn get_user(&self, id: &str) -> Result<User> {
        read_json(self.agent.get(&self.user_url(id)).call())
    }

    fn create_user(&self, draft: &UserDraft) -> Result<User> {
        read_json(
            self.agent
                .post(&self.users_url())
                .set("Content-Type", "application/json")
                .send_json(draft),
        )
    }

    fn update_user(&self, id: u64, draft: &UserDraft) -> Result<User> {
        read_json(
            self.agent
                .put(&self.user_url(id))
                .set("Content-Type", "application/json")
                .send_json(draft),
        )
    }

    fn delete_user(&self, id: u64) -> Result<()> {
        // Body is ignored; the demo service answers with `{}`.
        self.agent
            .delete(&self.user_url(id))
            .call()
            .map(|_| ())
            .map_err(request_error)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = HttpClient::new("https://example.test/api/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "https://example.test/api");
        assert_eq!(client.users_url(), "https://example.test/api/users");
        assert_eq!(client.user_url(42), "https://example.test/api/users/42");
        assert_eq!(client.user_url("abc"), "https://example.test/api/users/abc");
    }

    #[test]
    fn test_unreachable_host_is_an_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let client = HttpClient::new("http://127.0.0.1:9", Duration::from_millis(500));
        let err = client.list_users().unwrap_err();
        assert!(err.to_string().starts_with("Request failed"));
    }
}
