//! XNAT REST client.
//!
//! Looks up scan types and submits assessment documents for the sessions
//! named in a results table.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{StatusCode, Url};
use tracing::{debug, info};

use qap_model::ScanKey;

use crate::error::{Result, XnatError};
use crate::repository::{AssessmentTarget, DocumentSink, ScanTypeResolver};
use crate::scans::{parse_scan_listing, select_scan_type};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Basic-auth credentials for the repository.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl FromStr for Credentials {
    type Err = XnatError;

    /// Parses `user:password`. The password may itself contain `:`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((user, password)) if !user.is_empty() => Ok(Self::new(user, password)),
            _ => Err(XnatError::InvalidCredentials),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Client for one XNAT host.
pub struct XnatClient {
    client: Client,
    base: Url,
    credentials: Credentials,
}

impl XnatClient {
    /// Create a client for `host` (e.g. `https://xnat.example.org`).
    pub fn new(host: &str, credentials: Credentials) -> Result<Self> {
        let base = parse_host(host)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `<host>/data/projects/<p>/subjects/<s>/experiments/<e>/scans?format=json`
    pub fn scans_url(&self, project: &str, key: &ScanKey) -> Result<Url> {
        let mut url = self.session_url(project, key, &["scans"])?;
        url.set_query(Some("format=json"));
        Ok(url)
    }

    /// `<host>/data/projects/<p>/subjects/<s>/experiments/<e>/assessors/<label>`
    pub fn assessor_url(&self, target: &AssessmentTarget) -> Result<Url> {
        self.session_url(
            &target.project,
            &target.key,
            &["assessors", target.label.as_str()],
        )
    }

    fn session_url(&self, project: &str, key: &ScanKey, tail: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| invalid_host(self.base.as_str(), "URL cannot be a base"))?
            .pop_if_empty()
            .extend([
                "data",
                "projects",
                project,
                "subjects",
                key.subject.as_str(),
                "experiments",
                key.session.as_str(),
            ])
            .extend(tail);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .header(
                USER_AGENT,
                concat!("qap-ingest/", env!("CARGO_PKG_VERSION")),
            )
    }

    /// Returns whether an assessment is already stored at `url`.
    fn assessment_exists(&self, url: &Url) -> Result<bool> {
        let response = self.authorized(self.client.get(url.clone())).send()?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "checked assessment");
        Ok(status == StatusCode::OK)
    }
}

impl ScanTypeResolver for XnatClient {
    fn scan_type(&self, project: &str, key: &ScanKey) -> Result<String> {
        let url = self.scans_url(project, key)?;
        debug!(url = %url, "fetching scan listing");

        let response = self.authorized(self.client.get(url.clone())).send()?;
        let body = success_body(response, &url, &[StatusCode::OK])?;
        let entries = parse_scan_listing(&body)?;
        select_scan_type(&entries, &key.session, &key.scan_id)
    }
}

impl DocumentSink for XnatClient {
    fn submit(&self, target: &AssessmentTarget, xml: &str) -> Result<String> {
        let url = self.assessor_url(target)?;
        if self.assessment_exists(&url)? {
            return Err(XnatError::AlreadyExists {
                label: target.label.clone(),
            });
        }

        let mut put_url = url;
        put_url.set_query(Some("inbody=true"));
        let response = self
            .authorized(self.client.put(put_url.clone()))
            .header(CONTENT_TYPE, "text/xml")
            .body(xml.to_owned())
            .send()?;
        let body = success_body(response, &put_url, &[StatusCode::OK, StatusCode::CREATED])?;
        let uid = body.trim().to_string();

        info!(
            label = %target.label,
            uid = %uid,
            schema = %target.schema,
            "assessment created"
        );
        Ok(uid)
    }
}

fn success_body(response: Response, url: &Url, accepted: &[StatusCode]) -> Result<String> {
    let status = response.status();
    let body = response.text()?;
    if accepted.contains(&status) {
        Ok(body)
    } else {
        Err(XnatError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message: body.trim().chars().take(200).collect(),
        })
    }
}

fn parse_host(host: &str) -> Result<Url> {
    let url = Url::parse(host).map_err(|err| invalid_host(host, &err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid_host(host, "scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid_host(host, "URL cannot be a base"));
    }
    Ok(url)
}

fn invalid_host(host: &str, message: &str) -> XnatError {
    XnatError::InvalidHost {
        host: host.to_string(),
        message: message.to_string(),
    }
}
