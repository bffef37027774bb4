use crate::configs::GeoConfiguration;
use crate::metadata::LocationInfo;
use std::net::IpAddr;

/// Failure of a geolocation lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The configured endpoint is not a valid URL.
    #[error("invalid geolocation endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        /// The rejected endpoint.
        endpoint: String,
        /// Why it was rejected.
        source: url::ParseError,
    },
    /// Transport failure, including timeouts.
    #[error("geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("geolocation service returned HTTP {0}")]
    Status(u16),
    /// The body is not the expected JSON.
    #[error("geolocation response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// The service reported an error in the body.
    #[error("geolocation service error: {0}")]
    Service(String),
}

/// The subset of the geolocation response we read.
#[derive(Debug, serde::Deserialize)]
struct GeoResponse {
    country_name: Option<String>,
    city: Option<String>,
    country_code: Option<String>,
    #[serde(default)]
    error: Option<bool>,
    #[serde(default)]
    reason: Option<String>,
}

/// Parse a geolocation JSON body.
pub fn parse_location(body: &str) -> Result<LocationInfo, GeoError> {
    let response: GeoResponse = serde_json::from_str(body)?;

    if response.error.unwrap_or_default() {
        return Err(GeoError::Service(
            response.reason.unwrap_or_else(|| "unknown error".into()),
        ));
    }

    Ok(LocationInfo {
        country: response.country_name,
        city: response.city,
        country_code: response.country_code,
    })
}

/// Client for the IP geolocation service.
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: reqwest::Client,
    config: GeoConfiguration,
    endpoint: url::Url,
}

impl GeoClient {
    /// Build a client from a configuration.
    pub fn new(config: GeoConfiguration) -> Result<Self, GeoError> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Build a client from the default configuration.
    pub fn from_env() -> Result<Self, GeoError> {
        Self::new(GeoConfiguration::default())
    }

    /// The configuration in use.
    pub fn config(&self) -> &GeoConfiguration {
        &self.config
    }

    /// Look up the location of the requesting address.
    pub async fn lookup(&self) -> Result<LocationInfo, GeoError> {
        self.fetch(self.endpoint.clone()).await
    }

    /// Look up the location of an explicit address.
    pub async fn lookup_ip(&self, ip: IpAddr) -> Result<LocationInfo, GeoError> {
        let endpoint = parse_endpoint(&self.config.ip_endpoint.replace("{ip}", &ip.to_string()))?;
        self.fetch(endpoint).await
    }

    /// Best-effort lookup of the requesting address. Failures are logged and yield an empty location.
    pub async fn enrich(&self) -> LocationInfo {
        masked(self.endpoint.as_str(), self.lookup().await)
    }

    /// Best-effort lookup of an explicit address.
    pub async fn enrich_ip(&self, ip: IpAddr) -> LocationInfo {
        masked(&self.config.ip_endpoint, self.lookup_ip(ip).await)
    }

    async fn fetch(&self, endpoint: url::Url) -> Result<LocationInfo, GeoError> {
        let response = self.client.get(endpoint).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_location(&body)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<url::Url, GeoError> {
    url::Url::parse(endpoint).map_err(|source| GeoError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn masked(endpoint: &str, result: Result<LocationInfo, GeoError>) -> LocationInfo {
    match result {
        Ok(location) => {
            tracing::debug!(endpoint, country = ?location.country_code, "geolocation lookup complete");
            location
        }
        Err(error) => {
            tracing::warn!(endpoint, %error, "geolocation lookup failed");
            LocationInfo::default()
        }
    }
}
