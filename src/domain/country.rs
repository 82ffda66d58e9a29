use serde_json::Value;

use crate::domain::{invalid, node_array, node_bool, node_str, node_str_array, Coded};
use crate::error::Result;

/// A country and the ports it contains, as listed by the `pm/dep` and
/// `pm/arr` endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Country {
    pub name: String,
    pub code: String,
    pub ports: Vec<Port>,
}

impl Country {
    /// Decodes a country together with all of its ports. A missing or
    /// non-array `portMatrixPorts` node fails the decode; an empty one is a
    /// valid country with no ports.
    pub fn parse(node: &Value) -> Result<Self> {
        let name = node_str(node, "countryName");
        let code = node_str(node, "countryCode");

        let (name, code) = match (name, code) {
            (Some(name), Some(code)) => (name, code),
            _ => return Err(invalid("country")),
        };

        let ports_node = node_array(node, "portMatrixPorts").ok_or_else(|| invalid("country"))?;
        let ports = ports_node
            .iter()
            .map(|port_node| Port::parse(port_node, &name, &code))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name, code, ports })
    }

    /// Finds one of this country's ports by code, case-insensitively.
    pub fn port_by_code(&self, code: &str) -> Option<&Port> {
        crate::domain::find_by_code(&self.ports, code)
    }
}

impl Coded for Country {
    fn code(&self) -> &str {
        &self.code
    }
}

/// An airport (or city grouping of airports) identified by a 3-letter IATA
/// code. The owning country is referenced by plain name/code handles.
#[derive(Clone, Debug, PartialEq)]
pub struct Port {
    pub country_name: String,
    pub country_code: String,
    pub name: String,
    pub code: String,
    /// Absent for some ports whose name already is the city name.
    pub city_name: Option<String>,
    /// Only Turkish ports are domestic.
    pub domestic: bool,
    /// Meaningful only on arrival-side results; departure listings omit it.
    pub is_direct_flight: bool,
    /// Free-text search keywords (the API calls them `filter`).
    pub keywords: Vec<String>,
}

impl Port {
    /// Decodes a port belonging to the given country.
    pub fn parse(node: &Value, country_name: &str, country_code: &str) -> Result<Self> {
        let name = node_str(node, "portName");
        let code = node_str(node, "portCode");
        let domestic = node_bool(node, "domestic");
        let keywords = node_str_array(node, "filter");

        match (name, code, domestic, keywords) {
            (Some(name), Some(code), Some(domestic), Some(keywords)) => Ok(Self {
                country_name: country_name.to_owned(),
                country_code: country_code.to_owned(),
                name,
                code,
                city_name: node_str(node, "cityName"),
                domestic,
                is_direct_flight: node_bool(node, "isDirectFlight").unwrap_or(false),
                keywords,
            }),
            _ => Err(invalid("port")),
        }
    }
}

impl Coded for Port {
    fn code(&self) -> &str {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn country_node(ports: Value) -> Value {
        json!({
            "countryName": "Türkiye",
            "countryCode": "TR",
            "portMatrixPorts": ports,
        })
    }

    fn port_node() -> Value {
        json!({
            "portName": "Sabiha Gökçen",
            "portCode": "SAW",
            "cityName": "İstanbul",
            "domestic": true,
            "filter": ["istanbul", "saw", "sabiha"],
        })
    }

    #[test]
    fn parse_country_with_ports() {
        let country = Country::parse(&country_node(json!([port_node()]))).unwrap();
        assert_eq!(country.code, "TR");
        assert_eq!(country.ports.len(), 1);

        let port = &country.ports[0];
        assert_eq!(port.code, "SAW");
        assert_eq!(port.country_code, "TR");
        assert_eq!(port.city_name.as_deref(), Some("İstanbul"));
        assert!(port.domestic);
        assert!(!port.is_direct_flight);
        assert_eq!(port.keywords, vec!["istanbul", "saw", "sabiha"]);
    }

    #[test]
    fn parse_country_with_empty_ports_is_valid() {
        let country = Country::parse(&country_node(json!([]))).unwrap();
        assert!(country.ports.is_empty());
    }

    #[test]
    fn parse_country_without_ports_array_fails() {
        let node = json!({ "countryName": "Türkiye", "countryCode": "TR" });
        assert!(Country::parse(&node).is_err());

        assert!(Country::parse(&country_node(json!("none"))).is_err());
    }

    #[test]
    fn parse_port_without_city_name() {
        let mut node = port_node();
        node.as_object_mut().unwrap().remove("cityName");
        let port = Port::parse(&node, "Türkiye", "TR").unwrap();
        assert_eq!(port.city_name, None);
    }

    #[test]
    fn parse_port_reads_direct_flight_flag() {
        let mut node = port_node();
        node["isDirectFlight"] = json!(true);
        let port = Port::parse(&node, "Türkiye", "TR").unwrap();
        assert!(port.is_direct_flight);
    }

    #[test]
    fn parse_port_requires_domestic_and_keywords() {
        let mut node = port_node();
        node.as_object_mut().unwrap().remove("domestic");
        assert!(Port::parse(&node, "Türkiye", "TR").is_err());

        let mut node = port_node();
        node.as_object_mut().unwrap().remove("filter");
        assert!(Port::parse(&node, "Türkiye", "TR").is_err());
    }

    #[test]
    fn bad_port_fails_whole_country() {
        let country = Country::parse(&country_node(json!([{ "portCode": "SAW" }])));
        assert!(country.is_err());
    }

    #[test]
    fn port_lookup_by_code() {
        let country = Country::parse(&country_node(json!([port_node()]))).unwrap();
        assert!(country.port_by_code("saw").is_some());
        assert!(country.port_by_code("IST").is_none());
    }
}
