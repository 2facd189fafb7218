//! GitHub REST implementation of [`IssueTracker`].

use crate::error::TrackerError;
use crate::models::{IssueState, RepositoryInfo, TrackedIssue, TrackerConfig};
use crate::tracker::IssueTracker;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const PER_PAGE: usize = 100;

/// Blocking GitHub client bound to one repository
#[derive(Debug)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    owner: String,
    repo: String,
    label_color: String,
    label_description: String,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: IssueState,
    #[serde(default)]
    html_url: String,
    /// Present when the "issue" is actually a pull request
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

impl From<IssuePayload> for TrackedIssue {
    fn from(payload: IssuePayload) -> Self {
        TrackedIssue {
            number: payload.number,
            title: payload.title,
            body: payload.body.unwrap_or_default(),
            state: payload.state,
            html_url: payload.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    html_url: String,
    default_branch: String,
}

impl From<RepositoryPayload> for RepositoryInfo {
    fn from(payload: RepositoryPayload) -> Self {
        RepositoryInfo {
            name: payload.name,
            full_name: payload.full_name,
            description: payload.description.unwrap_or_default(),
            url: payload.html_url,
            default_branch: payload.default_branch,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// Split `owner/repo` into its two parts
pub fn parse_repo_name(repo_name: &str) -> Result<(String, String), TrackerError> {
    match repo_name.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(TrackerError::InvalidRepository(repo_name.to_string())),
    }
}

impl GitHubClient {
    pub fn new(
        token: &str,
        repo_name: &str,
        config: &TrackerConfig,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let (owner, repo) = parse_repo_name(repo_name)?;

        let api_url = Url::parse(&config.api_url)
            .map_err(|e| TrackerError::Url(format!("{}: {}", config.api_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("todo-tracker/", env!("CARGO_PKG_VERSION"))),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| TrackerError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_url,
            owner,
            repo,
            label_color: config.label_color.clone(),
            label_description: config.label_description.clone(),
        })
    }

    /// `{api}/repos/{owner}/{repo}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TrackerError> {
        let mut url = self.api_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| TrackerError::Url(format!("{} cannot be a base URL", self.api_url)))?;
            path.pop_if_empty()
                .push("repos")
                .push(&self.owner)
                .push(&self.repo)
                .extend(segments);
        }
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, TrackerError> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorPayload>(&text)
            .map(|e| e.message)
            .unwrap_or(text);
        Err(TrackerError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn create_label(&self, label: &str) -> Result<(), TrackerError> {
        let url = self.endpoint(&["labels"])?;
        self.send(self.http.post(url).json(&json!({
            "name": label,
            "color": self.label_color,
            "description": self.label_description,
        })))?;
        info!("Created label '{}'", label);
        Ok(())
    }
}

impl IssueTracker for GitHubClient {
    fn repository_info(&self) -> Result<RepositoryInfo, TrackerError> {
        let url = self.endpoint(&[])?;
        let payload: RepositoryPayload = self.send(self.http.get(url))?.json()?;
        Ok(payload.into())
    }

    fn list_tracked_issues(&self, label: &str) -> Result<Vec<TrackedIssue>, TrackerError> {
        let mut issues = Vec::new();
        let mut page = 1;

        loop {
            let url = self.endpoint(&["issues"])?;
            let per_page = PER_PAGE.to_string();
            let page_str = page.to_string();
            let request = self.http.get(url).query(&[
                ("labels", label),
                ("state", "all"),
                ("per_page", per_page.as_str()),
                ("page", page_str.as_str()),
            ]);
            let batch: Vec<IssuePayload> = self.send(request)?.json()?;
            let count = batch.len();

            issues.extend(
                batch
                    .into_iter()
                    .filter(|issue| issue.pull_request.is_none())
                    .map(TrackedIssue::from),
            );

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} issues labelled '{}'", issues.len(), label);
        Ok(issues)
    }

    fn create_issue(
        &self,
        title: &str,
        body: &str,
        label: &str,
    ) -> Result<TrackedIssue, TrackerError> {
        let url = self.endpoint(&["issues"])?;
        let payload: IssuePayload = self
            .send(self.http.post(url).json(&json!({
                "title": title,
                "body": body,
                "labels": [label],
            })))?
            .json()?;
        Ok(payload.into())
    }

    fn edit_issue_state(&self, number: u64, state: IssueState) -> Result<(), TrackerError> {
        let number = number.to_string();
        let url = self.endpoint(&["issues", number.as_str()])?;
        self.send(self.http.patch(url).json(&json!({ "state": state.as_str() })))?;
        Ok(())
    }

    fn add_comment(&self, number: u64, text: &str) -> Result<(), TrackerError> {
        let number = number.to_string();
        let url = self.endpoint(&["issues", number.as_str(), "comments"])?;
        self.send(self.http.post(url).json(&json!({ "body": text })))?;
        Ok(())
    }

    fn ensure_label_exists(&self, label: &str) -> Result<(), TrackerError> {
        let url = self.endpoint(&["labels", label])?;
        match self.send(self.http.get(url)) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => self.create_label(label),
            Err(e) => Err(e),
        }
    }
}
