//! Client for the campus classroom-analytics API.
//!
//! One shared `reqwest` client with connect/request timeouts; every endpoint
//! returns typed domain data or an [`UpstreamError`] carrying enough context
//! (URL, status, serde path) to diagnose a bad deployment from the logs.

pub mod errors;
pub mod json;
pub mod types;

pub use errors::UpstreamError;
pub use types::{ClassroomWeek, RoomsInUse, UploadKind, UploadOutcome, WeekOccupancy};

use crate::data::Weekday;
use crate::heatmap::clock::BlockTime;
use anyhow::Context;
use indexmap::IndexMap;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Typed client for the analytics API.
pub struct AnalyticsApi {
    http: reqwest::Client,
    base: Url,
}

impl AnalyticsApi {
    pub fn new(base: Url) -> anyhow::Result<Self> {
        if base.cannot_be_a_base() {
            anyhow::bail!("upstream base URL {base} cannot carry a path");
        }
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("atrium/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base })
    }

    /// Week-wide time blocks and per-block classroom counts, restricted to
    /// `buildings` (empty slice = campus-wide).
    pub async fn number_classes(
        &self,
        buildings: &[String],
    ) -> Result<WeekOccupancy, UpstreamError> {
        let query: Vec<(&str, String)> = buildings
            .iter()
            .map(|code| ("buildings[]", code.clone()))
            .collect();
        self.get_json("get_number_classes", &query).await
    }

    /// Building code to display name directory (includes the select-all
    /// sentinel row upstream emits).
    pub async fn building_names(&self) -> Result<IndexMap<String, String>, UpstreamError> {
        self.get_json("get_building_names", &[]).await
    }

    /// One classroom's weekly schedule with per-block course records.
    pub async fn classroom_data(&self, classroom: &str) -> Result<ClassroomWeek, UpstreamError> {
        self.get_json("get_classroom_data", &[("classroom", classroom.to_owned())])
            .await
    }

    /// Rooms in use during one block, with the courses held in each.
    pub async fn used_classrooms(
        &self,
        day: Weekday,
        start: BlockTime,
        end: BlockTime,
        buildings: &[String],
    ) -> Result<RoomsInUse, UpstreamError> {
        let url = self.endpoint("get_used_classrooms");
        let query = [
            ("day", day.code().to_owned()),
            ("startTime", start.to_string()),
            ("endTime", end.to_string()),
            ("buildings", buildings.join(", ")),
        ];
        let (status, body) = self.fetch(url.clone(), &query).await?;
        let raw = decode(&body, status, &url)?;
        types::rooms_from_wire(raw).map_err(|source| UpstreamError::ParseFailed {
            status,
            url: url.to_string(),
            source,
        })
    }

    /// Start of the block preceding `current_start`, for drill-down paging.
    pub async fn past_time(
        &self,
        day: Weekday,
        current_start: BlockTime,
        buildings: &[String],
    ) -> Result<BlockTime, UpstreamError> {
        self.boundary_time(
            "get_past_time",
            day,
            ("currentStartTime", current_start),
            buildings,
        )
        .await
    }

    /// End of the block following `current_end`, for drill-down paging.
    pub async fn next_time(
        &self,
        day: Weekday,
        current_end: BlockTime,
        buildings: &[String],
    ) -> Result<BlockTime, UpstreamError> {
        self.boundary_time(
            "get_next_time",
            day,
            ("currentEndTime", current_end),
            buildings,
        )
        .await
    }

    /// Forward a spreadsheet to the upstream ingestion endpoint.
    ///
    /// The upstream parses and validates; we only relay the outcome,
    /// including any missing-column report.
    pub async fn upload(
        &self,
        kind: UploadKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, UpstreamError> {
        let url = self.endpoint("upload_file");
        let form = Form::new()
            .text("dataType", kind.as_str())
            .text("fileName", file_name.to_owned())
            .part("file", Part::bytes(bytes).file_name(file_name.to_owned()));

        let response = self.http.post(url.clone()).multipart(form).send().await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(UpstreamError::BadStatus {
                status,
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        decode(&body, status, &url)
    }

    async fn boundary_time(
        &self,
        endpoint: &str,
        day: Weekday,
        (param, time): (&str, BlockTime),
        buildings: &[String],
    ) -> Result<BlockTime, UpstreamError> {
        let url = self.endpoint(endpoint);
        let query = [
            ("day", day.code().to_owned()),
            (param, time.to_string()),
            ("buildings", buildings.join(", ")),
        ];
        let (status, body) = self.fetch(url.clone(), &query).await?;
        let raw: String = decode(&body, status, &url)?;
        raw.parse().map_err(|e| UpstreamError::ParseFailed {
            status,
            url: url.to_string(),
            source: anyhow::Error::new(e),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = self.endpoint(endpoint);
        let (status, body) = self.fetch(url.clone(), query).await?;
        decode(&body, status, &url)
    }

    async fn fetch(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<(u16, String), UpstreamError> {
        let response = self.http.get(url.clone()).query(query).send().await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(UpstreamError::BadStatus {
                status,
                url: url.to_string(),
            });
        }
        Ok((status, response.text().await?))
    }

    fn endpoint(&self, name: &str) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base validated in new()")
            .pop_if_empty()
            .extend(["api", name]);
        url
    }
}

fn decode<T: DeserializeOwned>(body: &str, status: u16, url: &Url) -> Result<T, UpstreamError> {
    json::decode_with_context(body).map_err(|source| UpstreamError::ParseFailed {
        status,
        url: url.to_string(),
        source,
    })
}
