use crate::config::LivyConfig;
use crate::error::{LivyError, Result};
use crate::models::{
    CreateSession, SessionCreated, SessionId, SessionInfo, SessionState, StatementCreated,
    StatementId, StatementInfo, StatementReport, SubmitStatement,
};
use diagnostics::*;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

const PASSCODE_HEADER: &str = "x-passcode";

/// The Livy REST calls used by the job controller.
pub trait SessionApi {
    fn create_session(&self, kind: &str) -> Result<SessionId>;

    fn session_state(&self, session: &SessionId) -> Result<SessionState>;

    fn submit_statement(&self, session: &SessionId, code: &str) -> Result<StatementId>;

    fn statement(&self, session: &SessionId, statement: &StatementId) -> Result<StatementReport>;

    fn delete_session(&self, session: &SessionId) -> Result<()>;
}

impl<T: SessionApi + ?Sized> SessionApi for &T {
    fn create_session(&self, kind: &str) -> Result<SessionId> {
        (**self).create_session(kind)
    }

    fn session_state(&self, session: &SessionId) -> Result<SessionState> {
        (**self).session_state(session)
    }

    fn submit_statement(&self, session: &SessionId, code: &str) -> Result<StatementId> {
        (**self).submit_statement(session, code)
    }

    fn statement(&self, session: &SessionId, statement: &StatementId) -> Result<StatementReport> {
        (**self).statement(session, statement)
    }

    fn delete_session(&self, session: &SessionId) -> Result<()> {
        (**self).delete_session(session)
    }
}

/// Blocking Livy client authenticating against a Knox gateway with a
/// bearer token and passcode.
pub struct HttpSessionApi {
    http: Client,
    base: Url,
}

impl HttpSessionApi {
    pub fn new(config: &LivyConfig) -> Result<Self> {
        let token = config
            .bearer_token
            .as_deref()
            .ok_or_else(|| LivyError::Configuration("Livy bearer token is not set".to_string()))?;
        let passcode = config
            .passcode
            .as_deref()
            .ok_or_else(|| LivyError::Configuration("Livy passcode token is not set".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {token}"))?);
        headers.insert(HeaderName::from_static(PASSCODE_HEADER), sensitive(passcode)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if config.insecure_tls {
            warn!("TLS certificate verification is disabled for {url}", url: config.url.as_str());
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.insecure_tls)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base: base_url(&config.url)?,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// Send a request and return the body of a 2xx response.
    fn send(&self, method: &'static str, url: &Url, request: RequestBuilder) -> Result<String> {
        debug!("{method} {url}", method: method, url: url.as_str());
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(LivyError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn parse<T: for<'de> serde::Deserialize<'de>>(url: &Url, body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|source| LivyError::Response {
            url: url.to_string(),
            source,
        })
    }
}

impl SessionApi for HttpSessionApi {
    fn create_session(&self, kind: &str) -> Result<SessionId> {
        let url = self.url("sessions")?;
        let request = self.http.post(url.clone()).json(&CreateSession { kind });
        let body = self.send("POST", &url, request)?;
        Ok(Self::parse::<SessionCreated>(&url, &body)?.id)
    }

    fn session_state(&self, session: &SessionId) -> Result<SessionState> {
        let url = self.url(&format!("sessions/{session}"))?;
        let body = self.send("GET", &url, self.http.get(url.clone()))?;
        Ok(Self::parse::<SessionInfo>(&url, &body)?.state)
    }

    fn submit_statement(&self, session: &SessionId, code: &str) -> Result<StatementId> {
        let url = self.url(&format!("sessions/{session}/statements"))?;
        let request = self.http.post(url.clone()).json(&SubmitStatement { code });
        let body = self.send("POST", &url, request)?;
        Ok(Self::parse::<StatementCreated>(&url, &body)?.id)
    }

    fn statement(&self, session: &SessionId, statement: &StatementId) -> Result<StatementReport> {
        let url = self.url(&format!("sessions/{session}/statements/{statement}"))?;
        let body = self.send("GET", &url, self.http.get(url.clone()))?;
        let info: StatementInfo = Self::parse(&url, &body)?;
        Ok(StatementReport {
            state: info.state,
            output: info.output,
            body,
        })
    }

    fn delete_session(&self, session: &SessionId) -> Result<()> {
        let url = self.url(&format!("sessions/{session}"))?;
        self.send("DELETE", &url, self.http.delete(url.clone()))?;
        Ok(())
    }
}

fn sensitive(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| LivyError::Configuration("credential contains invalid header characters".to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Parse the gateway URL so that relative joins stay beneath it.
pub(crate) fn base_url(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(LivyError::Configuration("Livy URL is not set".to_string()));
    }
    if url.ends_with('/') {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse(&format!("{url}/"))?)
    }
}
