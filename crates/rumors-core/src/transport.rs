//! How GraphQL requests reach the server.

use std::time::Duration;

use tracing::debug;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::query::GraphqlRequest;

/// Executes one GraphQL request and returns the raw JSON response body.
pub trait GraphqlTransport {
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the request cannot be completed.
    fn execute(&self, request: &GraphqlRequest) -> Result<serde_json::Value, FetchError>;
}

impl<T: GraphqlTransport + ?Sized> GraphqlTransport for &T {
    fn execute(&self, request: &GraphqlRequest) -> Result<serde_json::Value, FetchError> {
        (**self).execute(request)
    }
}

/// Blocking HTTP transport backed by `ureq`.
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
    app_id: Option<String>,
}

impl HttpTransport {
    #[must_use]
    pub fn new(api: &ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(concat!("rumors/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            endpoint: api.endpoint.clone(),
            app_id: api.app_id.clone(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GraphqlTransport for HttpTransport {
    fn execute(&self, request: &GraphqlRequest) -> Result<serde_json::Value, FetchError> {
        debug!(
            endpoint = %self.endpoint,
            operation = request.operation_name,
            after = request.variables.after.as_deref().unwrap_or(""),
            "POST graphql"
        );

        let mut call = self
            .agent
            .post(&self.endpoint)
            .set("Accept", "application/json");
        if let Some(app_id) = &self.app_id {
            call = call.set("x-app-id", app_id);
        }

        let response = match call.send_json(request) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                // GraphQL servers often answer query errors with 400 and a normal envelope.
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body)
                    && value.get("errors").is_some()
                {
                    return Ok(value);
                }
                return Err(FetchError::Status { code, body });
            }
            Err(err) => return Err(FetchError::Transport(err.to_string())),
        };

        response
            .into_json::<serde_json::Value>()
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}
