//! Asynchronous client for the unofficial Pegasus fare API.
//!
//! Two backends are involved: the `apint` API serves country/port listings
//! and the fare calendar, the `pegasus` web API serves everything else.
//! Neither requires authentication, but both reject requests without
//! browser-looking headers.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use time::Date;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::domain::{
    find_by_code, BestDeal, BestDealsCity, Country, Currency, FaresMonth, Language, Port,
    PortMatrixRow,
};
use crate::error::{PegasusError, Result};
use crate::infra::cache::{get_or_refresh, CacheEntry, CacheTtls, CachingMode};
use crate::util::format_date;

// www.flypgs.com API
const BASE_API_URL: &str = "https://www.flypgs.com/apint/";
const DEPARTURE_PORTS_ENDPOINT: &str = "pm/dep";
const ARRIVAL_PORTS_ENDPOINT: &str = "pm/arr";
const FARES_ENDPOINT: &str = "cheapfare/flight-calender-prices";

// web.flypgs.com API
const BASE_WEB_API_URL: &str = "https://web.flypgs.com/pegasus/";
const STATUS_ENDPOINT: &str = "cheapest-fare/status";
const LANGUAGES_ENDPOINT: &str = "common/languages";
const CURRENCIES_ENDPOINT: &str = "common/currencies";
const PORT_MATRIX_ENDPOINT: &str = "port-matrix";
const BEST_DEALS_CITIES_ENDPOINT: &str = "best-deals/cities";
const BEST_DEALS_ENDPOINT: &str = "best-deals";

// Response list nodes
const LANGUAGES_NODE: &str = "languageList";
const CURRENCIES_NODE: &str = "currencyList";
const CHEAP_FARE_CURRENCIES_NODE: &str = "cheapFareCurrencyList";
const COUNTRIES_NODE: &str = "list";
const FARES_MONTHS_NODE: &str = "cheapFareFlightCalenderModelList"; // Yes, there is a typo in the API
const PORT_MATRIX_ROWS_NODE: &str = "destinationList";
const BEST_DEALS_CITIES_NODE: &str = "cityList";
const BEST_DEALS_NODE: &str = "bestDealList";

const DEFAULT_LANGUAGE_CODE: &str = "en";
/// Best deals are flagged domestic when the response language is the
/// airline's home market.
const DOMESTIC_MARKET_CODE: &str = "tr";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FaresQuery<'a> {
    dep_port: &'a str,
    arr_port: &'a str,
    flight_date: String,
    currency: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BestDealsQuery<'a> {
    dep_port: &'a str,
    currency: &'a str,
    domestic: bool,
    page: u32,
}

/// Builder for [`PegasusClient`]. Base URLs, TTLs and the availability
/// probe are overridable, mainly for tests against a mock server.
#[derive(Clone, Debug)]
pub struct PegasusClientBuilder {
    api_base: String,
    web_base: String,
    caching_mode: CachingMode,
    ttls: CacheTtls,
    check_status: bool,
}

impl Default for PegasusClientBuilder {
    fn default() -> Self {
        Self {
            api_base: BASE_API_URL.to_owned(),
            web_base: BASE_WEB_API_URL.to_owned(),
            caching_mode: CachingMode::default(),
            ttls: CacheTtls::default(),
            check_status: true,
        }
    }
}

impl PegasusClientBuilder {
    pub fn api_base_url(mut self, url: &str) -> Self {
        self.api_base = url.to_owned();
        self
    }

    pub fn web_api_base_url(mut self, url: &str) -> Self {
        self.web_base = url.to_owned();
        self
    }

    pub fn caching_mode(mut self, mode: CachingMode) -> Self {
        self.caching_mode = mode;
        self
    }

    pub fn ttls(mut self, ttls: CacheTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Skips the availability probe during [`PegasusClientBuilder::connect`].
    pub fn skip_status_check(mut self) -> Self {
        self.check_status = false;
        self
    }

    /// Builds the client and runs the initialization protocol: an optional
    /// availability probe, then warming the language and currency caches
    /// and selecting English as the response language.
    pub async fn connect(self) -> Result<PegasusClient> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Platform", HeaderValue::from_static("web"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let mut client = PegasusClient {
            http,
            api_base: Url::parse(&ensure_trailing_slash(&self.api_base))?,
            web_base: Url::parse(&ensure_trailing_slash(&self.web_base))?,
            caching_mode: self.caching_mode,
            ttls: self.ttls,
            languages: Vec::new(),
            language: None,
            languages_cache: Mutex::new(CacheEntry::default()),
            currencies_cache: Mutex::new(CacheEntry::default()),
            port_matrix_cache: Mutex::new(CacheEntry::default()),
            departure_countries_cache: Mutex::new(CacheEntry::default()),
            best_deals_cities_cache: Mutex::new(CacheEntry::default()),
        };

        if self.check_status && !client.get_status().await? {
            return Err(PegasusError::ServiceUnavailable);
        }

        client.languages = client.get_languages().await?;
        client.get_currencies().await?;
        client.change_language(DEFAULT_LANGUAGE_CODE);
        debug!(languages = client.languages.len(), "pegasus client initialized");

        Ok(client)
    }
}

/// Client for the Pegasus fare API.
///
/// Owns the active response language and an in-memory read-through cache
/// for the five listing resources (languages, currencies, port matrix,
/// departure countries, best-deals cities). Create it with
/// [`PegasusClient::connect`] or through [`PegasusClient::builder`].
#[derive(Debug)]
pub struct PegasusClient {
    http: reqwest::Client,
    api_base: Url,
    web_base: Url,
    caching_mode: CachingMode,
    ttls: CacheTtls,
    /// Snapshot of the language listing taken at initialization; lookups
    /// for [`PegasusClient::change_language`] run against it.
    languages: Vec<Language>,
    language: Option<Language>,
    languages_cache: Mutex<CacheEntry<Language>>,
    currencies_cache: Mutex<CacheEntry<Currency>>,
    port_matrix_cache: Mutex<CacheEntry<PortMatrixRow>>,
    departure_countries_cache: Mutex<CacheEntry<Country>>,
    best_deals_cities_cache: Mutex<CacheEntry<BestDealsCity>>,
}

impl PegasusClient {
    /// Connects to the production API with default settings.
    pub async fn connect() -> Result<Self> {
        Self::builder().connect().await
    }

    pub fn builder() -> PegasusClientBuilder {
        PegasusClientBuilder::default()
    }

    /// The language listing fetched at initialization.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// The active response language. Absent after a
    /// [`PegasusClient::change_language`] call with an unknown code.
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// Changes the API response language by code. An unknown code silently
    /// selects no language, mirroring the remote website's behavior.
    pub fn change_language(&mut self, code: &str) {
        self.language = find_by_code(&self.languages, code).cloned();
    }

    pub fn caching_mode(&self) -> CachingMode {
        self.caching_mode
    }

    /// Takes effect on the next fetch of each resource kind.
    pub fn set_caching_mode(&mut self, mode: CachingMode) {
        self.caching_mode = mode;
    }

    /// Probes service availability.
    pub async fn get_status(&self) -> Result<bool> {
        let root = self.fetch_json(self.web_get(STATUS_ENDPOINT)?).await?;
        root.get("status")
            .and_then(Value::as_bool)
            .ok_or_else(|| PegasusError::InvalidData("status response is missing the 'status' node".to_owned()))
    }

    /// Fetches the available API response languages.
    pub async fn get_languages(&self) -> Result<Vec<Language>> {
        get_or_refresh(
            &self.languages_cache,
            "languages",
            self.caching_mode,
            self.ttls.languages,
            || self.fetch_languages(),
        )
        .await
    }

    /// Fetches the currencies the API can quote fares in.
    pub async fn get_currencies(&self) -> Result<Vec<Currency>> {
        get_or_refresh(
            &self.currencies_cache,
            "currencies",
            self.caching_mode,
            self.ttls.currencies,
            || self.fetch_currencies(),
        )
        .await
    }

    /// Fetches the port matrix, i.e. every departure port with the arrival
    /// ports it can reach.
    ///
    /// The response can weigh a few megabytes; `last_updated_timestamp`
    /// (0 = everything) is passed through to the API, although the remote
    /// side is known to return the full matrix regardless. The cached
    /// listing is keyed per resource, not per timestamp: within the TTL a
    /// call with a different timestamp returns the stored matrix.
    pub async fn get_port_matrix(&self, last_updated_timestamp: i64) -> Result<Vec<PortMatrixRow>> {
        get_or_refresh(
            &self.port_matrix_cache,
            "port matrix",
            self.caching_mode,
            self.ttls.port_matrix,
            || self.fetch_port_matrix(last_updated_timestamp),
        )
        .await
    }

    /// Fetches the countries flights can depart from, localized to the
    /// active response language.
    pub async fn get_departure_countries(&self) -> Result<Vec<Country>> {
        get_or_refresh(
            &self.departure_countries_cache,
            "departure countries",
            self.caching_mode,
            self.ttls.departure_countries,
            || self.fetch_departure_countries(),
        )
        .await
    }

    /// Fetches the countries reachable from the given departure port.
    /// Never cached — the listing depends on the departure port.
    pub async fn get_arrival_countries(&self, departure_port: &Port) -> Result<Vec<Country>> {
        let lang = self.require_language()?.code.to_lowercase();
        let url = self.api_url(&format!(
            "{ARRIVAL_PORTS_ENDPOINT}/{lang}/{}",
            departure_port.code
        ))?;

        let root = self.fetch_json(self.http.get(url)).await?;
        root_array(&root, COUNTRIES_NODE)?
            .iter()
            .map(Country::parse)
            .collect()
    }

    /// Fetches monthly fare calendars for a route, starting at
    /// `flight_date`, quoted in `currency`.
    ///
    /// Fails with an invalid-argument error before any network call when
    /// the currency does not support cheapest-fare requests.
    pub async fn get_fares_months(
        &self,
        departure_port: &Port,
        arrival_port: &Port,
        flight_date: Date,
        currency: &Currency,
    ) -> Result<Vec<FaresMonth>> {
        if !currency.supports_cheapest_fare {
            return Err(PegasusError::InvalidArgument(format!(
                "currency {} does not support cheapest-fare requests",
                currency.code
            )));
        }

        let payload = FaresQuery {
            dep_port: &departure_port.code,
            arr_port: &arrival_port.code,
            flight_date: format_date(flight_date),
            currency: &currency.code,
        };

        let url = self.api_url(FARES_ENDPOINT)?;
        let root = self.fetch_json(self.http.post(url).json(&payload)).await?;
        root_array(&root, FARES_MONTHS_NODE)?
            .iter()
            .map(|node| FaresMonth::parse(node, currency))
            .collect()
    }

    /// Fetches the cities best deals can depart from.
    pub async fn get_cities_for_best_deals(&self) -> Result<Vec<BestDealsCity>> {
        get_or_refresh(
            &self.best_deals_cities_cache,
            "best-deals cities",
            self.caching_mode,
            self.ttls.best_deals_cities,
            || self.fetch_best_deals_cities(),
        )
        .await
    }

    /// Fetches one page of best deals for a departure city. Pages are
    /// zero-based and capped at ten deals by the remote side; callers drive
    /// the pagination themselves.
    pub async fn get_best_deals(
        &self,
        departure_city: &BestDealsCity,
        currency: &Currency,
        page: u32,
    ) -> Result<Vec<BestDeal>> {
        let domestic = self
            .require_language()?
            .code
            .eq_ignore_ascii_case(DOMESTIC_MARKET_CODE);

        let payload = BestDealsQuery {
            dep_port: &departure_city.code,
            currency: &currency.code,
            domestic,
            page,
        };

        let url = self.web_base.join(BEST_DEALS_ENDPOINT)?;
        let root = self.fetch_json(self.http.post(url).json(&payload)).await?;
        root_array(&root, BEST_DEALS_NODE)?
            .iter()
            .map(|node| BestDeal::parse(node, departure_city, currency))
            .collect()
    }

    async fn fetch_languages(&self) -> Result<Vec<Language>> {
        let root = self.fetch_json(self.web_get(LANGUAGES_ENDPOINT)?).await?;
        root_array(&root, LANGUAGES_NODE)?
            .iter()
            .map(Language::parse)
            .collect()
    }

    async fn fetch_currencies(&self) -> Result<Vec<Currency>> {
        let root = self.fetch_json(self.web_get(CURRENCIES_ENDPOINT)?).await?;

        let capable: Vec<String> = root
            .get(CHEAP_FARE_CURRENCIES_NODE)
            .and_then(Value::as_array)
            .and_then(|nodes| {
                nodes
                    .iter()
                    .map(|node| node.as_str().map(str::to_owned))
                    .collect()
            })
            .ok_or_else(|| {
                PegasusError::InvalidData(format!(
                    "response is missing the '{CHEAP_FARE_CURRENCIES_NODE}' node"
                ))
            })?;

        root_array(&root, CURRENCIES_NODE)?
            .iter()
            .map(|node| Currency::parse(node, &capable))
            .collect()
    }

    async fn fetch_port_matrix(&self, last_updated_timestamp: i64) -> Result<Vec<PortMatrixRow>> {
        let mut url = self.web_base.join(PORT_MATRIX_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("lastUpdatedTimestamp", &last_updated_timestamp.to_string());

        let root = self.fetch_json(self.web_request(url)).await?;
        root_array(&root, PORT_MATRIX_ROWS_NODE)?
            .iter()
            .map(PortMatrixRow::parse)
            .collect()
    }

    async fn fetch_departure_countries(&self) -> Result<Vec<Country>> {
        let lang = self.require_language()?.code.to_lowercase();
        let url = self.api_url(&format!("{DEPARTURE_PORTS_ENDPOINT}/{lang}"))?;

        let root = self.fetch_json(self.http.get(url)).await?;
        root_array(&root, COUNTRIES_NODE)?
            .iter()
            .map(Country::parse)
            .collect()
    }

    async fn fetch_best_deals_cities(&self) -> Result<Vec<BestDealsCity>> {
        let root = self.fetch_json(self.web_get(BEST_DEALS_CITIES_ENDPOINT)?).await?;
        root_array(&root, BEST_DEALS_CITIES_NODE)?
            .iter()
            .map(BestDealsCity::parse)
            .collect()
    }

    fn require_language(&self) -> Result<&Language> {
        self.language
            .as_ref()
            .ok_or_else(|| PegasusError::InvalidArgument("no response language is selected".to_owned()))
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self.api_base.join(path)?)
    }

    fn web_get(&self, path: &str) -> Result<reqwest::RequestBuilder> {
        Ok(self.web_request(self.web_base.join(path)?))
    }

    /// The web API requires `Content-Type: application/json` even on GET
    /// requests; an empty body keeps reqwest from dropping the header.
    fn web_request(&self, url: Url) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .body("")
    }

    async fn fetch_json(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

fn root_array<'a>(root: &'a Value, key: &str) -> Result<&'a Vec<Value>> {
    root.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| PegasusError::InvalidData(format!("response is missing the '{key}' node")))
}

fn ensure_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_owned()
    } else {
        format!("{base}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_urls_are_normalized_with_a_trailing_slash() {
        assert_eq!(ensure_trailing_slash("http://x/api"), "http://x/api/");
        assert_eq!(ensure_trailing_slash("http://x/api/"), "http://x/api/");
    }

    #[test]
    fn root_array_rejects_missing_or_non_array_nodes() {
        let root = json!({ "languageList": { "code": "en" } });
        assert!(root_array(&root, "languageList").is_err());
        assert!(root_array(&root, "list").is_err());

        let root = json!({ "list": [] });
        assert!(root_array(&root, "list").unwrap().is_empty());
    }

    #[test]
    fn fares_query_serializes_with_api_field_names() {
        let payload = FaresQuery {
            dep_port: "SAW",
            arr_port: "ESB",
            flight_date: "2024-07-15".to_owned(),
            currency: "TRY",
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "depPort": "SAW",
                "arrPort": "ESB",
                "flightDate": "2024-07-15",
                "currency": "TRY",
            })
        );
    }
}
