use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use crate::error::FeedtuiError;
use crate::models::post::{Author, RawPost};

/// Read-only credentials and identity for one signed-in (or anonymous)
/// viewer. Built from the config once and passed by reference into every
/// remote call; the engine never mutates it.
#[derive(Debug, Clone)]
pub struct Session {
    pub api_key: String,
    pub bearer_token: Option<String>,
    pub viewer_id: Option<String>,
}

impl Session {
    pub fn viewer(&self) -> Option<&str> {
        self.viewer_id.as_deref()
    }
}

/// The remote calls the engine depends on. `FeedClient` is the real HTTP
/// implementation; tests substitute their own.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn fetch_posts(&self, session: &Session) -> Result<Vec<RawPost>, FeedtuiError>;
    async fn create_post(&self, session: &Session, content: &str) -> Result<(), FeedtuiError>;
    async fn delete_post(&self, session: &Session, post_id: &str) -> Result<(), FeedtuiError>;
    async fn toggle_like(&self, session: &Session, post_id: &str) -> Result<(), FeedtuiError>;
    async fn create_comment(
        &self,
        session: &Session,
        post_id: &str,
        content: &str,
    ) -> Result<(), FeedtuiError>;
    async fn delete_comment(&self, session: &Session, comment_id: &str)
        -> Result<(), FeedtuiError>;
}

#[derive(Debug, Clone)]
pub struct FeedClient {
    base_url: String,
    http: HttpClient,
}

#[derive(Deserialize)]
struct FeedEnvelope {
    #[serde(default)]
    data: Vec<RawPost>,
}

#[derive(Deserialize)]
struct ViewerEnvelope {
    data: Author,
}

// Rejections arrive as {"error": ...} or {"message": ...} depending on the
// endpoint.
#[derive(Deserialize, Default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: HttpClient::new(),
        }
    }

    fn request(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("accept", "application/json")
            .header("x-api-key", &session.api_key);
        if let Some(token) = &session.bearer_token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, FeedtuiError> {
        let res = req
            .send()
            .await
            .map_err(|e| FeedtuiError::Transport(e.to_string()))?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.message))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(FeedtuiError::Server(status.as_u16(), message))
    }

    /// Fetch the signed-in viewer's own record, `GET /me`. Used once at
    /// startup to hydrate a config that has a token but no viewer id.
    pub async fn fetch_viewer(&self, session: &Session) -> Result<Author, FeedtuiError> {
        let res = self.send(self.request(Method::GET, "/me", session)).await?;
        let envelope = res
            .json::<ViewerEnvelope>()
            .await
            .map_err(|_| FeedtuiError::EmptyResponse)?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl FeedTransport for FeedClient {
    async fn fetch_posts(&self, session: &Session) -> Result<Vec<RawPost>, FeedtuiError> {
        let res = self
            .send(self.request(Method::GET, "/status", session))
            .await?;
        let envelope = res
            .json::<FeedEnvelope>()
            .await
            .map_err(|_| FeedtuiError::EmptyResponse)?;
        Ok(envelope.data)
    }

    async fn create_post(&self, session: &Session, content: &str) -> Result<(), FeedtuiError> {
        let req = self
            .request(Method::POST, "/status", session)
            .json(&json!({ "content": content }));
        self.send(req).await.map(|_| ())
    }

    async fn delete_post(&self, session: &Session, post_id: &str) -> Result<(), FeedtuiError> {
        let path = format!("/status/{}", post_id);
        self.send(self.request(Method::DELETE, &path, session))
            .await
            .map(|_| ())
    }

    async fn toggle_like(&self, session: &Session, post_id: &str) -> Result<(), FeedtuiError> {
        let req = self
            .request(Method::POST, "/like", session)
            .json(&json!({ "statusId": post_id }));
        self.send(req).await.map(|_| ())
    }

    async fn create_comment(
        &self,
        session: &Session,
        post_id: &str,
        content: &str,
    ) -> Result<(), FeedtuiError> {
        let req = self
            .request(Method::POST, "/comment", session)
            .json(&json!({ "content": content, "statusId": post_id }));
        self.send(req).await.map(|_| ())
    }

    async fn delete_comment(
        &self,
        session: &Session,
        comment_id: &str,
    ) -> Result<(), FeedtuiError> {
        let path = format!("/comment/{}", comment_id);
        self.send(self.request(Method::DELETE, &path, session))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn session() -> Session {
        Session {
            api_key: "key-123".to_string(),
            bearer_token: Some("tok-456".to_string()),
            viewer_id: Some("u1".to_string()),
        }
    }

    #[tokio::test]
    async fn fetch_posts_sends_credentials_and_parses_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/status")
            .match_header("x-api-key", "key-123")
            .match_header("authorization", "Bearer tok-456")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": [{"_id": "p1", "content": "hi",
                    "createdAt": "2024-03-01T10:00:00.000Z",
                    "createdBy": {"_id": "u1", "email": "a@b.c"},
                    "like": [{"_id": "u2"}], "comment": []}]}"#,
            )
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        let posts = client.fetch_posts(&session()).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "p1");
        assert_eq!(posts[0].like.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_posts_with_unreadable_body_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        let err = client.fetch_posts(&session()).await.unwrap_err();
        assert!(matches!(err, FeedtuiError::EmptyResponse));
    }

    #[tokio::test]
    async fn rejection_payload_becomes_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/like")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "no such post"}"#)
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        let err = client.toggle_like(&session(), "p1").await.unwrap_err();
        match err {
            FeedtuiError::Server(status, message) => {
                assert_eq!(status, 403);
                assert_eq!(message, "no such post");
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejection_without_payload_uses_status_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/status/p1")
            .with_status(500)
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        let err = client.delete_post(&session(), "p1").await.unwrap_err();
        assert!(matches!(err, FeedtuiError::Server(500, _)));
    }

    #[tokio::test]
    async fn toggle_like_posts_the_status_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/like")
            .match_body(Matcher::Json(json!({ "statusId": "p7" })))
            .with_status(200)
            .with_body(r#"{"message": "ok"}"#)
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        client.toggle_like(&session(), "p7").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_comment_posts_content_and_parent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/comment")
            .match_body(Matcher::Json(json!({ "content": "nice", "statusId": "p1" })))
            .with_status(200)
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        client.create_comment(&session(), "p1", "nice").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_comment_hits_the_comment_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/comment/c9")
            .with_status(200)
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        client.delete_comment(&session(), "c9").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_viewer_parses_the_me_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/me")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"_id": "u1", "email": "a@b.c", "firstname": "Ada"}}"#)
            .create_async()
            .await;

        let client = FeedClient::new(server.url());
        let viewer = client.fetch_viewer(&session()).await.unwrap();
        assert_eq!(viewer.id, "u1");
        assert_eq!(viewer.display_name(), "Ada");
    }
}
