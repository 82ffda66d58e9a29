//! Domain entities of the Pegasus fare API and their JSON decoders.
//!
//! Decoders navigate loosely-typed `serde_json::Value` trees: every field is
//! extracted leniently into an `Option` first, and the required set is
//! validated as one conjunction before an entity is built. No partially
//! valid entity can exist.

pub mod best_deals;
pub mod country;
pub mod currency;
pub mod fares;
pub mod language;
pub mod port_matrix;

pub use best_deals::{BestDeal, BestDealsCity};
pub use country::{Country, Port};
pub use currency::Currency;
pub use fares::{FaresMonth, Flight, FlightDay};
pub use language::Language;
pub use port_matrix::{PortMatrixItem, PortMatrixRow};

use serde_json::Value;

use crate::error::PegasusError;

/// An entity addressable by a short code (IATA port code, ISO-ish language
/// or currency code).
pub trait Coded {
    fn code(&self) -> &str;
}

/// Finds an entity by code, case-insensitively.
///
/// Codes are unique within one listing; more than one match means corrupt
/// upstream data.
pub fn find_by_code<'a, T: Coded>(items: &'a [T], code: &str) -> Option<&'a T> {
    let mut matches = items.iter().filter(|item| item.code().eq_ignore_ascii_case(code));
    let first = matches.next();
    debug_assert!(matches.next().is_none(), "duplicate code {code:?}");
    first
}

/// Finds a port by its country's code and its own code.
pub fn find_port_by_country_and_port_code<'a>(
    countries: &'a [Country],
    country_code: &str,
    port_code: &str,
) -> Option<&'a Port> {
    find_by_code(countries, country_code).and_then(|country| country.port_by_code(port_code))
}

pub(crate) fn invalid(entity: &str) -> PegasusError {
    PegasusError::InvalidData(format!("JSON node does not provide proper {entity} data"))
}

pub(crate) fn node_str(node: &Value, key: &str) -> Option<String> {
    node.get(key)?.as_str().map(str::to_owned)
}

pub(crate) fn node_bool(node: &Value, key: &str) -> Option<bool> {
    node.get(key)?.as_bool()
}

pub(crate) fn node_f64(node: &Value, key: &str) -> Option<f64> {
    node.get(key)?.as_f64()
}

pub(crate) fn node_array<'a>(node: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    node.get(key)?.as_array()
}

/// Collects an array of JSON strings; any non-string element fails the lot.
pub(crate) fn node_str_array(node: &Value, key: &str) -> Option<Vec<String>> {
    node_array(node, key)?
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_code_is_case_insensitive() {
        let languages = vec![
            Language::new("en", "English"),
            Language::new("tr", "Türkçe"),
        ];
        assert_eq!(find_by_code(&languages, "TR").map(Coded::code), Some("tr"));
        assert_eq!(find_by_code(&languages, "de"), None);
    }

    #[test]
    fn node_str_array_rejects_mixed_elements() {
        let node = serde_json::json!({ "filter": ["a", 1] });
        assert_eq!(node_str_array(&node, "filter"), None);
    }

    #[test]
    fn node_accessors_treat_wrong_kinds_as_absent() {
        let node = serde_json::json!({ "name": 42, "flag": "yes" });
        assert_eq!(node_str(&node, "name"), None);
        assert_eq!(node_bool(&node, "flag"), None);
        assert_eq!(node_f64(&node, "missing"), None);
    }
}
