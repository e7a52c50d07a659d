//! Location providers: BigDataCloud and Nominatim reverse geocoding,
//! three IP geolocation services.
//!
//! Each provider is split into an HTTP call and a pure interpretation of
//! the JSON body so the interpretation can be tested offline.

use super::chain::Provider;
use super::types::{Coordinates, LocationError, Place, PlaceDefaults};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const BIGDATACLOUD_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const IPAPI_CO_URL: &str = "https://ipapi.co/json/";
pub const IP_API_COM_URL: &str = "https://ip-api.com/json/?fields=lat,lon,status";
pub const IPWHO_IS_URL: &str = "https://ipwho.is/";

fn get_json<T: DeserializeOwned>(agent: &ureq::Agent, url: &str) -> Result<T, LocationError> {
    agent
        .get(url)
        .call()?
        .into_json()
        .map_err(|e| LocationError::InvalidResponse(e.to_string()))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn region_label(parent: Option<String>, country: String) -> String {
    match parent {
        Some(p) => format!("{}, {}", p, country),
        None => country,
    }
}

// ─── BigDataCloud (provider A) ──────────────────────────────────

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BigDataCloudResponse {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub principal_subdivision: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

/// Interpret a BigDataCloud body. Usable only with a locality or city.
pub fn place_from_bigdatacloud(
    r: BigDataCloudResponse,
    defaults: &PlaceDefaults,
) -> Result<Place, LocationError> {
    let city_field = non_empty(r.city);
    let city = non_empty(r.locality)
        .or_else(|| city_field.clone())
        .ok_or_else(|| LocationError::Unsuccessful("no locality or city".into()))?;

    let parent = match city_field {
        Some(c) if c != city => Some(c),
        _ => non_empty(r.principal_subdivision),
    };
    let country = non_empty(r.country_name).unwrap_or_else(|| defaults.country.clone());

    Ok(Place {
        city,
        region: region_label(parent, country),
    })
}

pub struct BigDataCloud {
    agent: ureq::Agent,
    base_url: String,
    defaults: PlaceDefaults,
}

impl BigDataCloud {
    pub fn new(agent: ureq::Agent, base_url: impl Into<String>, defaults: PlaceDefaults) -> Self {
        Self { agent, base_url: base_url.into(), defaults }
    }
}

impl Provider<Coordinates, Place> for BigDataCloud {
    fn name(&self) -> &'static str {
        "bigdatacloud"
    }

    fn attempt(&self, c: &Coordinates) -> Result<Place, LocationError> {
        let url = format!(
            "{}?latitude={}&longitude={}&localityLanguage={}",
            self.base_url, c.latitude, c.longitude, self.defaults.language,
        );
        let body: BigDataCloudResponse = get_json(&self.agent, &url)?;
        place_from_bigdatacloud(body, &self.defaults)
    }
}

// ─── Nominatim (provider B) ─────────────────────────────────────

#[derive(Deserialize, Debug, Default)]
pub struct NominatimReverse {
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct NominatimAddress {
    pub quarter: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub village: Option<String>,
    pub town: Option<String>,
    pub city_district: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state_district: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

fn first_of(candidates: Vec<Option<String>>) -> Option<String> {
    candidates.into_iter().find_map(non_empty)
}

/// Interpret a Nominatim reverse body: most specific area as the city,
/// a broader area as the parent.
pub fn place_from_nominatim(
    r: NominatimReverse,
    defaults: &PlaceDefaults,
) -> Result<Place, LocationError> {
    let a = r
        .address
        .ok_or_else(|| LocationError::Unsuccessful("no address object".into()))?;

    let city = first_of(vec![
        a.quarter,
        a.neighbourhood,
        a.suburb,
        a.village,
        a.town.clone(),
        a.city_district,
        a.district,
        a.city.clone(),
        a.county.clone(),
    ])
    .unwrap_or_else(|| defaults.city.clone());

    let parent = first_of(vec![a.city, a.town, a.county, a.state_district, a.state]);
    let country = non_empty(a.country).unwrap_or_else(|| defaults.country.clone());

    Ok(Place {
        city,
        region: region_label(parent, country),
    })
}

pub struct Nominatim {
    agent: ureq::Agent,
    base_url: String,
    defaults: PlaceDefaults,
}

impl Nominatim {
    pub fn new(agent: ureq::Agent, base_url: impl Into<String>, defaults: PlaceDefaults) -> Self {
        Self { agent, base_url: base_url.into(), defaults }
    }
}

impl Provider<Coordinates, Place> for Nominatim {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn attempt(&self, c: &Coordinates) -> Result<Place, LocationError> {
        let url = format!(
            "{}?lat={}&lon={}&format=json&zoom=16&addressdetails=1&accept-language={}",
            self.base_url, c.latitude, c.longitude, self.defaults.language,
        );
        let body: NominatimReverse = get_json(&self.agent, &url)?;
        place_from_nominatim(body, &self.defaults)
    }
}

// ─── IP geolocation ─────────────────────────────────────────────

/// Coordinates only count when both are present and non-zero.
fn usable(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinates> {
    match (lat, lon) {
        (Some(la), Some(lo)) if la != 0.0 && lo != 0.0 => Some(Coordinates::new(la, lo)),
        _ => None,
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct IpApiCoResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct IpApiComResponse {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct IpWhoIsResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub success: Option<bool>,
}

pub fn coords_from_ipapi_co(r: IpApiCoResponse) -> Result<Coordinates, LocationError> {
    usable(r.latitude, r.longitude)
        .ok_or_else(|| LocationError::Unsuccessful("ipapi.co: missing coordinates".into()))
}

pub fn coords_from_ip_api_com(r: IpApiComResponse) -> Result<Coordinates, LocationError> {
    if r.status.as_deref() != Some("success") {
        return Err(LocationError::Unsuccessful(format!(
            "ip-api.com: status {}",
            r.status.as_deref().unwrap_or("missing")
        )));
    }
    usable(r.lat, r.lon)
        .ok_or_else(|| LocationError::Unsuccessful("ip-api.com: missing coordinates".into()))
}

pub fn coords_from_ipwho_is(r: IpWhoIsResponse) -> Result<Coordinates, LocationError> {
    if r.success != Some(true) {
        return Err(LocationError::Unsuccessful("ipwho.is: success=false".into()));
    }
    usable(r.latitude, r.longitude)
        .ok_or_else(|| LocationError::Unsuccessful("ipwho.is: missing coordinates".into()))
}

/// Which IP service a provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpService {
    IpApiCo,
    IpApiCom,
    IpWhoIs,
}

pub struct IpLocator {
    agent: ureq::Agent,
    url: String,
    service: IpService,
}

impl IpLocator {
    pub fn new(agent: ureq::Agent, service: IpService, url: impl Into<String>) -> Self {
        Self { agent, url: url.into(), service }
    }
}

impl Provider<(), Coordinates> for IpLocator {
    fn name(&self) -> &'static str {
        match self.service {
            IpService::IpApiCo => "ipapi.co",
            IpService::IpApiCom => "ip-api.com",
            IpService::IpWhoIs => "ipwho.is",
        }
    }

    fn attempt(&self, _: &()) -> Result<Coordinates, LocationError> {
        match self.service {
            IpService::IpApiCo => coords_from_ipapi_co(get_json(&self.agent, &self.url)?),
            IpService::IpApiCom => coords_from_ip_api_com(get_json(&self.agent, &self.url)?),
            IpService::IpWhoIs => coords_from_ipwho_is(get_json(&self.agent, &self.url)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PlaceDefaults {
        PlaceDefaults::default()
    }

    fn bdc(json: &str) -> Result<Place, LocationError> {
        place_from_bigdatacloud(serde_json::from_str(json).unwrap(), &defaults())
    }

    fn nom(json: &str) -> Result<Place, LocationError> {
        place_from_nominatim(serde_json::from_str(json).unwrap(), &defaults())
    }

    #[test]
    fn test_bdc_locality_with_distinct_city() {
        let p = bdc(r#"{"locality":"Gondokusuman","city":"Yogyakarta",
                       "principalSubdivision":"DI Yogyakarta","countryName":"Indonesia"}"#).unwrap();
        assert_eq!(p.city, "Gondokusuman");
        assert_eq!(p.region, "Yogyakarta, Indonesia");
    }

    #[test]
    fn test_bdc_city_only_uses_subdivision() {
        let p = bdc(r#"{"city":"Bandung","principalSubdivision":"West Java","countryName":"Indonesia"}"#).unwrap();
        assert_eq!(p.city, "Bandung");
        assert_eq!(p.region, "West Java, Indonesia");
    }

    #[test]
    fn test_bdc_same_locality_and_city() {
        let p = bdc(r#"{"locality":"Oslo","city":"Oslo","countryName":"Norway"}"#).unwrap();
        assert_eq!(p.city, "Oslo");
        assert_eq!(p.region, "Norway");
    }

    #[test]
    fn test_bdc_default_country() {
        let p = bdc(r#"{"locality":"Somewhere"}"#).unwrap();
        assert_eq!(p.region, "Indonesia");
    }

    #[test]
    fn test_bdc_without_locality_is_unusable() {
        assert!(bdc(r#"{"principalSubdivision":"West Java","countryName":"Indonesia"}"#).is_err());
        assert!(bdc(r#"{"locality":"  ","city":""}"#).is_err());
    }

    #[test]
    fn test_nominatim_prefers_most_specific() {
        let p = nom(r#"{"address":{"suburb":"Kotabaru","village":"X","city":"Yogyakarta",
                        "state":"Special Region of Yogyakarta","country":"Indonesia"}}"#).unwrap();
        assert_eq!(p.city, "Kotabaru");
        assert_eq!(p.region, "Yogyakarta, Indonesia");
    }

    #[test]
    fn test_nominatim_quarter_beats_neighbourhood() {
        let p = nom(r#"{"address":{"neighbourhood":"N","quarter":"Q","county":"Sleman"}}"#).unwrap();
        assert_eq!(p.city, "Q");
        assert_eq!(p.region, "Sleman, Indonesia");
    }

    #[test]
    fn test_nominatim_parent_may_repeat_city() {
        let p = nom(r#"{"address":{"city":"Surabaya","state":"East Java","country":"Indonesia"}}"#)
            .unwrap();
        assert_eq!(p.city, "Surabaya");
        assert_eq!(p.region, "Surabaya, Indonesia");
    }

    #[test]
    fn test_nominatim_empty_address_uses_defaults() {
        let p = nom(r#"{"address":{}}"#).unwrap();
        assert_eq!(p.city, "Your location");
        assert_eq!(p.region, "Indonesia");
    }

    #[test]
    fn test_nominatim_without_address_is_unusable() {
        assert!(nom(r#"{"error":"Unable to geocode"}"#).is_err());
    }

    #[test]
    fn test_ipapi_co() {
        let ok = coords_from_ipapi_co(serde_json::from_str(r#"{"latitude":-6.2,"longitude":106.8}"#).unwrap());
        assert_eq!(ok.unwrap(), Coordinates::new(-6.2, 106.8));
        let missing = coords_from_ipapi_co(serde_json::from_str(r#"{"error":true,"reason":"RateLimited"}"#).unwrap());
        assert!(missing.is_err());
        let zero = coords_from_ipapi_co(serde_json::from_str(r#"{"latitude":0,"longitude":106.8}"#).unwrap());
        assert!(zero.is_err());
    }

    #[test]
    fn test_ip_api_com_requires_success_status() {
        let ok = coords_from_ip_api_com(serde_json::from_str(r#"{"status":"success","lat":1.5,"lon":2.5}"#).unwrap());
        assert_eq!(ok.unwrap(), Coordinates::new(1.5, 2.5));
        let fail = coords_from_ip_api_com(serde_json::from_str(r#"{"status":"fail","lat":1.5,"lon":2.5}"#).unwrap());
        assert!(fail.is_err());
    }

    #[test]
    fn test_ipwho_is_requires_success_flag() {
        let ok = coords_from_ipwho_is(serde_json::from_str(r#"{"success":true,"latitude":3.0,"longitude":4.0}"#).unwrap());
        assert_eq!(ok.unwrap(), Coordinates::new(3.0, 4.0));
        let fail = coords_from_ipwho_is(serde_json::from_str(r#"{"success":false,"latitude":3.0,"longitude":4.0}"#).unwrap());
        assert!(fail.is_err());
        let null = coords_from_ipwho_is(serde_json::from_str(r#"{"success":true,"latitude":null,"longitude":4.0}"#).unwrap());
        assert!(null.is_err());
    }
}
