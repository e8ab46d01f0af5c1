use url::Url;

const RESOURCES_PATH: &str = "B25/v1/resources";
const AVAILABILITY_PATH: &str = "B25/v1/availability";
const SERVICE_AVAILABILITY_PATH: &str = "B25/v1/serviceAvailability";
const PRICE_CALCULATION_PATH: &str = "B25/v1/priceCalculation";
const RESERVATIONS_PATH: &str = "B25LP/v1/reservations";

/// URL construction for every backend call, relative to one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn resources(&self, fields: &[String]) -> Result<Url, url::ParseError> {
        Url::parse_with_params(&self.join(RESOURCES_PATH), [("fields", fields.join(","))])
    }

    /// All descendants of `parent_id`, not just direct children.
    pub fn child_resources(&self, parent_id: &str, fields: &[String]) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.join(RESOURCES_PATH))?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(parent_id).push("children");
        }
        url.query_pairs_mut()
            .append_pair("fields", &fields.join(","))
            .append_pair("recursive", "true");
        Ok(url)
    }

    pub fn availability(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.join(AVAILABILITY_PATH))
    }

    pub fn service_availability(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.join(SERVICE_AVAILABILITY_PATH))
    }

    pub fn price_calculation(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.join(PRICE_CALCULATION_PATH))
    }

    pub fn reservations(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.join(RESERVATIONS_PATH))
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }
}
