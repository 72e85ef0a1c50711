//! HTTP client for the receptor desired-LRP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::SchedulerConfig;
use crate::domain::{DesiredLrp, DesiredLrpCreateRequest, DesiredLrpUpdateRequest};
use crate::error::{ConfigError, RemoteError, Result};
use crate::port::SchedulerClient;

/// Error body returned by the receptor on non-success responses.
#[derive(Debug, Deserialize)]
struct ReceptorErrorBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
}

pub struct ReceptorClient {
    client: Client,
    base_url: Url,
    credentials: Option<(String, Option<String>)>,
}

impl ReceptorClient {
    pub fn new(config: &SchedulerConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url).map_err(|e| ConfigError::InvalidValue {
            field: "scheduler.url",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.url",
                reason: "not a base URL".to_string(),
            }
            .into());
        }

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url,
            credentials: config
                .credentials()
                .map(|(user, password)| (user.to_string(), password.map(str::to_string))),
        })
    }

    /// `{base}/v1/{segments...}`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Infallible: `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v1").extend(segments);
        }
        url
    }

    fn desired_lrp_url(&self, process_guid: &str) -> Url {
        self.url(&["desired_lrps", process_guid])
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_ref()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(rejection(response).await.into())
        }
    }
}

/// Turn a non-success response into [`RemoteError::Rejected`].
async fn rejection(response: Response) -> RemoteError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ReceptorErrorBody>(&body) {
        Ok(error) if !error.name.is_empty() || !error.message.is_empty() => RemoteError::Rejected {
            status: status.as_u16(),
            kind: (!error.name.is_empty()).then_some(error.name),
            message: if error.message.is_empty() {
                status.to_string()
            } else {
                error.message
            },
        },
        _ => RemoteError::Rejected {
            status: status.as_u16(),
            kind: None,
            message: if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            },
        },
    }
}

#[async_trait]
impl SchedulerClient for ReceptorClient {
    async fn desired_lrps(&self) -> Result<Vec<DesiredLrp>> {
        let response = self.send(self.client.get(self.url(&["desired_lrps"]))).await?;
        let lrps: Vec<DesiredLrp> = response.json().await?;

        debug!(count = lrps.len(), "Fetched desired LRPs");
        Ok(lrps)
    }

    async fn desired_lrp(&self, process_guid: &str) -> Result<Option<DesiredLrp>> {
        let request = self.client.get(self.desired_lrp_url(process_guid));
        let response = self.authorized(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(process_guid, "Desired LRP not found");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(rejection(response).await.into());
        }

        let lrp: DesiredLrp = response.json().await?;
        debug!(process_guid, instances = lrp.instances, "Fetched desired LRP");
        Ok(Some(lrp))
    }

    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<()> {
        let mut request = self.client.put(self.url(&["domains", domain]));
        if !ttl.is_zero() {
            request = request.header(CACHE_CONTROL, format!("max-age={}", ttl.as_secs()));
        }

        self.send(request).await?;
        debug!(domain, ttl_secs = ttl.as_secs(), "Upserted domain");
        Ok(())
    }

    async fn create_desired_lrp(&self, request: &DesiredLrpCreateRequest) -> Result<()> {
        self.send(self.client.post(self.url(&["desired_lrps"])).json(request))
            .await?;
        Ok(())
    }

    async fn update_desired_lrp(
        &self,
        process_guid: &str,
        update: &DesiredLrpUpdateRequest,
    ) -> Result<()> {
        self.send(self.client.put(self.desired_lrp_url(process_guid)).json(update))
            .await?;
        Ok(())
    }

    async fn delete_desired_lrp(&self, process_guid: &str) -> Result<()> {
        self.send(self.client.delete(self.desired_lrp_url(process_guid)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> ReceptorClient {
        ReceptorClient::new(&SchedulerConfig::new(url)).unwrap()
    }

    #[test]
    fn path_segments_are_encoded() {
        let client = client("http://receptor.example.com");

        assert_eq!(
            client.desired_lrp_url("my-app_1.0").as_str(),
            "http://receptor.example.com/v1/desired_lrps/my-app_1.0"
        );
        assert_eq!(
            client.desired_lrp_url("a/b c").as_str(),
            "http://receptor.example.com/v1/desired_lrps/a%2Fb%20c"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        assert_eq!(
            client("http://receptor.example.com/").desired_lrp_url("web").as_str(),
            "http://receptor.example.com/v1/desired_lrps/web"
        );
        assert_eq!(
            client("http://example.com/receptor/").url(&["domains", "lattice"]).as_str(),
            "http://example.com/receptor/v1/domains/lattice"
        );
    }

    #[test]
    fn credentials_come_from_config() {
        let mut config = SchedulerConfig::new("http://receptor.example.com");
        assert!(ReceptorClient::new(&config).unwrap().credentials.is_none());

        config.username = "admin".into();
        config.password = Some("secret".into());
        assert_eq!(
            ReceptorClient::new(&config).unwrap().credentials,
            Some(("admin".to_string(), Some("secret".to_string())))
        );
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(ReceptorClient::new(&SchedulerConfig::new("not a url")).is_err());
    }
}
