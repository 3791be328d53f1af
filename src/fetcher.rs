use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

const WTTR_BASE_URL: &str = "https://wttr.in";

/// One-line wttr.in report: location, condition, temperature, wind,
/// humidity, precipitation.
const REPORT_FORMAT: &str = "%l: %C %t %w %h %p";

/// Shown when the service answers with anything other than 200.
pub const FETCH_FAILED: &str = "Error: Unable to fetch weather data.";

/// Temperature scale sent to wttr.in via the `u` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Celsius, Unit::Fahrenheit];

    pub fn code(self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Celsius => "Celsius (C)",
            Unit::Fahrenheit => "Fahrenheit (F)",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything that can turn a location and unit into displayable report text.
///
/// Implementations never fail: a fetch always resolves to text, whether it is
/// the report body or a human-readable description of what went wrong.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, location: &str, unit: Unit) -> String;
}

/// Fetches plain-text weather reports from wttr.in.
#[derive(Debug, Clone)]
pub struct WttrFetcher {
    client: Client,
    base_url: String,
}

impl WttrFetcher {
    pub fn new() -> Self {
        Self::with_base_url(WTTR_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Builds the request URL with the location as an escaped path segment.
    fn report_url(&self, location: &str, unit: Unit) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!("{}/{}", self.base_url, location),
            [("format", REPORT_FORMAT), ("u", unit.code())],
        )
    }
}

impl Default for WttrFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for WttrFetcher {
    async fn fetch(&self, location: &str, unit: Unit) -> String {
        let url = match self.report_url(location, unit) {
            Ok(url) => url,
            Err(err) => return format!("An error occurred: {err}"),
        };

        log::debug!("GET {url}");

        match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => match response.text().await {
                Ok(body) => body,
                Err(err) => format!("An error occurred: {err}"),
            },
            Ok(_) => FETCH_FAILED.to_string(),
            Err(err) => format!("An error occurred: {err}"),
        }
    }
}
