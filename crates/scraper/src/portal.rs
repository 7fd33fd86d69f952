// ABOUTME: Blocking HTTP client for the election portal's probe, listing and candidate table endpoints.
// ABOUTME: Decodes the district/constituency JSON bodies and returns candidate tables as raw HTML.

use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::options::ScrapeOptions;

pub const DISTRICTS_PATH: &str = "/election-settings/get-election-zilla";
pub const CONSTITUENCIES_PATH: &str = "/election/get-setting-constituency";
pub const CANDIDATES_PATH: &str = "/get/candidate/data";

/// District entry as listed by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DistrictRecord {
    #[serde(rename = "zillaID", deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "zilla_name", default)]
    pub name: String,
}

/// Constituency entry as listed by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConstituencyRecord {
    #[serde(rename = "constituencyID", deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "constituency_name", default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct DistrictsBody {
    #[serde(default)]
    zillas: Option<Vec<DistrictRecord>>,
}

#[derive(Debug, Deserialize)]
struct ConstituenciesBody {
    #[serde(default)]
    constituencies: Option<Vec<ConstituencyRecord>>,
}

/// The portal is inconsistent about quoting ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

/// Parameters of one candidate table request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery<'a> {
    pub election_id: u32,
    pub district_id: &'a str,
    pub constituency_id: &'a str,
    pub candidate_type: u32,
    /// Omitted from the request entirely when `None`.
    pub status_id: Option<u32>,
}

impl CandidateQuery<'_> {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("election_id", self.election_id.to_string()),
            ("zilla_id", self.district_id.to_string()),
            ("constituency_id", self.constituency_id.to_string()),
            ("candidate_type", self.candidate_type.to_string()),
        ];
        if let Some(status) = self.status_id {
            params.push(("status_id", status.to_string()));
        }
        params
    }
}

/// Thin wrapper around a blocking reqwest client bound to one portal.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: HttpClient,
    base_url: Url,
    probe_timeout: Duration,
}

impl PortalClient {
    /// Builds a client for `opts.base_url` with the configured timeouts and User-Agent.
    pub fn new(opts: &ScrapeOptions) -> Result<Self> {
        let base_url = Url::parse(&opts.base_url).map_err(|e| {
            ScrapeError::invalid_url(&opts.base_url, "NewPortalClient", Some(e.into()))
        })?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(ScrapeError::invalid_url(
                &opts.base_url,
                "NewPortalClient",
                Some(anyhow::anyhow!("scheme must be http or https")),
            ));
        }

        let http = HttpClient::builder()
            .user_agent(opts.user_agent.clone())
            .timeout(opts.request_timeout)
            .build()
            .map_err(|e| ScrapeError::fetch(&opts.base_url, "NewPortalClient", Some(e.into())))?;

        Ok(Self {
            http,
            base_url,
            probe_timeout: opts.probe_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `path` appended to the base URL's own path, so `http://host/ec` stays under `/ec`.
    fn endpoint(&self, path: &str) -> String {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, path));
        url.to_string()
    }

    /// Requires the base URL to answer 200; anything else is a Connectivity error.
    pub fn probe(&self) -> Result<()> {
        let url = self.base_url.to_string();
        tracing::debug!(%url, "probing portal");
        let resp = self
            .http
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .map_err(|e| ScrapeError::connectivity(&url, "ProbeConnectivity", Some(e.into())))?;
        if resp.status() != reqwest::StatusCode::OK {
            return Err(ScrapeError::connectivity(
                &url,
                "ProbeConnectivity",
                Some(anyhow::anyhow!("unexpected status {}", resp.status())),
            ));
        }
        Ok(())
    }

    /// Boolean form of [`PortalClient::probe`].
    pub fn probe_connectivity(&self) -> bool {
        self.probe().is_ok()
    }

    /// Lists districts for an election. A body without `zillas` is an empty list.
    pub fn list_districts(&self, election_id: u32) -> Result<Vec<DistrictRecord>> {
        let request = self
            .http
            .get(self.endpoint(DISTRICTS_PATH))
            .query(&[("electionID", election_id.to_string())]);
        let body: DistrictsBody = self.get_json(request, "ListDistricts")?;
        Ok(body.zillas.unwrap_or_default())
    }

    /// Lists constituencies of one district. A body without `constituencies` is an empty list.
    pub fn list_constituencies(
        &self,
        district_id: &str,
        election_id: u32,
    ) -> Result<Vec<ConstituencyRecord>> {
        let request = self.http.get(self.endpoint(CONSTITUENCIES_PATH)).query(&[
            ("zillaID", district_id.to_string()),
            ("electionID", election_id.to_string()),
        ]);
        let body: ConstituenciesBody = self.get_json(request, "ListConstituencies")?;
        Ok(body.constituencies.unwrap_or_default())
    }

    /// Fetches the candidate table fragment for one constituency.
    pub fn fetch_candidate_html(&self, query: &CandidateQuery<'_>) -> Result<String> {
        let request = self
            .http
            .get(self.endpoint(CANDIDATES_PATH))
            .query(&query.params());
        let (url, resp) = self.send(request, "FetchCandidateHtml")?;
        resp.text()
            .map_err(|e| ScrapeError::fetch(&url, "FetchCandidateHtml", Some(e.into())))
    }

    fn send(&self, request: RequestBuilder, op: &str) -> Result<(String, Response)> {
        let request = request
            .build()
            .map_err(|e| ScrapeError::invalid_url(self.base_url.as_str(), op, Some(e.into())))?;
        let url = request.url().to_string();
        tracing::debug!(%url, op, "portal request");

        let resp = self
            .http
            .execute(request)
            .map_err(|e| ScrapeError::fetch(&url, op, Some(e.into())))?;
        if !resp.status().is_success() {
            return Err(ScrapeError::fetch(
                &url,
                op,
                Some(anyhow::anyhow!("unexpected status {}", resp.status())),
            ));
        }
        Ok((url, resp))
    }

    fn get_json<T>(&self, request: RequestBuilder, op: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let (url, resp) = self.send(request, op)?;
        let text = resp
            .text()
            .map_err(|e| ScrapeError::fetch(&url, op, Some(e.into())))?;
        serde_json::from_str(&text).map_err(|e| ScrapeError::decode(&url, op, Some(e.into())))
    }
}
