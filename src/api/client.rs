//! API client for communicating with the Rollcall attendance REST API.
//!
//! This module provides the `ApiClient` struct: the authenticated
//! request gateway plus typed endpoint methods for courses, class
//! sessions, and attendance records.
//!
//! The gateway attaches the session's access token to every request.
//! On a 401 it refreshes the token once and replays the request with
//! the new token; a failed refresh, or a second 401 on the replay,
//! tears the session down. One refresh-and-replay per request, never
//! more.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{SessionHandle, SessionTokens};
use crate::cache::CacheStore;
use crate::models::{
    Attendance, ClassSession, Course, MessageResponse, NewSession, PasswordResetConfirm,
};
use crate::notify::{LogNotifier, Notifier};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Path prefix for authentication endpoints (token issue/refresh, password reset)
const AUTH_PREFIX: &str = "api-auth/v1";

/// Path prefix for data endpoints
const API_PREFIX: &str = "api/v1";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TokenPairResponse {
    access: String,
    refresh: String,
}

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access: String,
}

/// API client for the Rollcall attendance service.
/// Clone is cheap - reqwest::Client and the session handle are Arc-backed.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionHandle,
    notifier: Arc<dyn Notifier>,
    cache: Option<Arc<CacheStore>>,
}

impl ApiClient {
    /// Create a new API client against `base_url`, using the given
    /// session as its credential context.
    pub fn new(base_url: &str, session: SessionHandle) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            notifier: Arc::new(LogNotifier),
            cache: None,
        })
    }

    /// Replace the default log-based notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Attach a disk cache. List responses are written through to it
    /// and mutations invalidate the affected entries.
    pub fn with_cache(mut self, cache: Arc<CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_deref()
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    // ===== Request gateway =====

    /// Send one HTTP request, optionally with a bearer token.
    /// Requests are rebuilt per attempt, so a replay never aliases
    /// state with the original dispatch.
    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// The authenticated request path. Attaches the current access
    /// token, intercepts the first 401 with a refresh-and-replay, and
    /// tears the session down when re-authentication is hopeless.
    async fn request_authed(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, path);
        let token = self.session.access_token().await;

        let response = self
            .dispatch(&method, &url, body.as_ref(), token.as_deref())
            .await
            .with_context(|| format!("Failed to send {} request to {}", method, url))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return self.check_response(response).await;
        }

        // First 401 for this request: one refresh, then one replay.
        // The 401 itself is swallowed; only the replay's outcome is
        // reported to the caller.
        debug!(url = %url, "Received 401, refreshing access token");
        let access = match self.refresh_access_token().await {
            Ok(access) => access,
            Err(err) => {
                warn!(url = %url, error = %err, "Token refresh failed, ending session");
                self.teardown_session().await;
                self.notifier.error("Session expired", &err.to_string());
                return Err(err.into());
            }
        };

        let response = self
            .dispatch(&method, &url, body.as_ref(), Some(&access))
            .await
            .with_context(|| format!("Failed to replay {} request to {}", method, url))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // The replay was rejected too. Terminal: no second refresh.
            warn!(url = %url, "Replayed request still unauthorized, ending session");
            self.teardown_session().await;
            let err = ApiError::Unauthorized;
            self.notifier.error("Session expired", &err.to_string());
            return Err(err.into());
        }

        self.check_response(response).await
    }

    /// Exchange the stored refresh token for a new access token and
    /// store it in the session.
    ///
    /// Concurrent 401s may each call this; the session lock makes each
    /// store atomic and the last refresh wins. Refreshes are not
    /// de-duplicated.
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh = self
            .session
            .refresh_token()
            .await
            .ok_or_else(|| ApiError::RefreshFailed("no refresh token in session".to_string()))?;

        let url = format!("{}/{}/token/refresh/", self.base_url, AUTH_PREFIX);
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::RefreshFailed(format!(
                "refresh endpoint returned {}",
                response.status()
            )));
        }

        let parsed: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::RefreshFailed(format!("invalid refresh response: {}", e)))?;

        self.session
            .store_access_token(parsed.access.clone())
            .await
            .map_err(|e| ApiError::RefreshFailed(format!("failed to store access token: {}", e)))?;

        debug!("Access token refreshed");
        Ok(parsed.access)
    }

    fn invalidate_courses(&self) {
        if let Some(ref cache) = self.cache {
            if let Err(err) = cache.invalidate_courses() {
                warn!(error = %err, "Failed to invalidate cached courses");
            }
        }
    }

    fn invalidate_sessions(&self, course_id: i64) {
        if let Some(ref cache) = self.cache {
            if let Err(err) = cache.invalidate_sessions(course_id) {
                warn!(error = %err, course_id, "Failed to invalidate cached sessions");
            }
        }
    }

    async fn teardown_session(&self) {
        if let Err(err) = self.session.clear().await {
            warn!(error = %err, "Failed to clear session state");
        }
    }

    /// Check if response is successful, returning an error with body if
    /// not. Every failure that reaches here is terminal and produces
    /// one user-facing notification.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            self.notifier.error("Request failed", &err.to_string());
            Err(err.into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request_authed(Method::GET, path, None).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> Result<T> {
        let response = self.request_authed(Method::POST, path, body).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.request_authed(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Auth endpoints dispatch without credentials and without the
    /// refresh interceptor: a 401 from them is just a failed login.
    async fn post_unauthenticated<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .dispatch(&Method::POST, &url, Some(&body), None)
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &text).into());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Auth =====

    /// Authenticate and store the issued token pair in the session
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let body = serde_json::json!({ "email": email, "password": password });
        let pair: TokenPairResponse = self
            .post_unauthenticated(&format!("{}/token/", AUTH_PREFIX), body)
            .await?;

        self.session
            .store_tokens(SessionTokens::new(pair.access, pair.refresh, None))
            .await?;
        debug!("Login succeeded, session stored");
        Ok(())
    }

    /// Clear the session (client-side teardown only)
    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await
    }

    /// Request a password reset email
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let body = serde_json::json!({ "email": email });
        self.post_unauthenticated(&format!("{}/password/reset/", AUTH_PREFIX), body)
            .await
    }

    /// Complete a password reset from an emailed uid/token pair
    pub async fn reset_password_confirm(
        &self,
        confirm: &PasswordResetConfirm,
    ) -> Result<MessageResponse> {
        let body = serde_json::to_value(confirm)?;
        self.post_unauthenticated(&format!("{}/password/reset/confirm/", AUTH_PREFIX), body)
            .await
    }

    // ===== Courses =====

    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        let courses: Vec<Course> = self.get(&format!("{}/course/", API_PREFIX)).await?;
        if let Some(ref cache) = self.cache {
            if let Err(err) = cache.save_courses(&courses) {
                warn!(error = %err, "Failed to cache course list");
            }
        }
        Ok(courses)
    }

    pub async fn get_course(&self, course_id: i64) -> Result<Course> {
        self.get(&format!("{}/course/{}/", API_PREFIX, course_id))
            .await
    }

    pub async fn create_course(&self, name: &str) -> Result<Course> {
        let body = serde_json::json!({ "name": name });
        let course = self
            .post(&format!("{}/course/", API_PREFIX), Some(body))
            .await?;
        self.invalidate_courses();
        Ok(course)
    }

    pub async fn delete_course(&self, course_id: i64) -> Result<()> {
        self.delete(&format!("{}/course/{}/", API_PREFIX, course_id))
            .await?;
        self.invalidate_courses();
        // The course's cached session list would otherwise linger on disk
        self.invalidate_sessions(course_id);
        Ok(())
    }

    // ===== Class sessions =====

    pub async fn list_sessions(&self, course_id: i64) -> Result<Vec<ClassSession>> {
        let sessions: Vec<ClassSession> = self
            .get(&format!("{}/course/{}/session/", API_PREFIX, course_id))
            .await?;
        if let Some(ref cache) = self.cache {
            if let Err(err) = cache.save_sessions(course_id, &sessions) {
                warn!(error = %err, course_id, "Failed to cache session list");
            }
        }
        Ok(sessions)
    }

    pub async fn create_session(&self, new_session: &NewSession) -> Result<ClassSession> {
        let body = serde_json::to_value(new_session)?;
        let session: ClassSession = self
            .post(&format!("{}/session/", API_PREFIX), Some(body))
            .await?;
        self.invalidate_sessions(session.course_id.id);
        Ok(session)
    }

    /// Close an active session; late attendance is no longer accepted
    pub async fn end_session(&self, session_id: i64) -> Result<ClassSession> {
        let session: ClassSession = self
            .post(&format!("{}/session/{}/end/", API_PREFIX, session_id), None)
            .await?;
        self.invalidate_sessions(session.course_id.id);
        Ok(session)
    }

    /// Delete a session. The DELETE response carries no body, so the
    /// owning course id is taken as a parameter for cache invalidation.
    pub async fn delete_session(&self, course_id: i64, session_id: i64) -> Result<()> {
        self.delete(&format!("{}/session/{}/", API_PREFIX, session_id))
            .await?;
        self.invalidate_sessions(course_id);
        Ok(())
    }

    // ===== Attendance =====

    pub async fn list_attendance(&self, session_id: i64) -> Result<Vec<Attendance>> {
        self.get(&format!("{}/session/{}/attendance/", API_PREFIX, session_id))
            .await
    }

    /// Mark an attendance record present by hand, overriding the
    /// face recognition outcome
    pub async fn override_attendance(&self, attendance_id: i64) -> Result<Attendance> {
        self.post(
            &format!("{}/attendance/{}/override/", API_PREFIX, attendance_id),
            None,
        )
        .await
    }
}
