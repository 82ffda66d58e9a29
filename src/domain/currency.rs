use serde_json::Value;

use crate::domain::{invalid, Coded};
use crate::error::Result;

/// A currency accepted by the Pegasus API.
///
/// `supports_cheapest_fare` marks whether the fare-calendar endpoint accepts
/// the currency; the client checks it before issuing a fares request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub supports_cheapest_fare: bool,
}

impl Currency {
    /// Turkish lira, the airline's home currency. Always fare-capable; the
    /// API sometimes spells it with the legacy `TL` alias.
    pub fn lira() -> Self {
        Self {
            code: "TRY".to_owned(),
            supports_cheapest_fare: true,
        }
    }

    /// Decodes a currency from a bare JSON string node.
    ///
    /// The legacy alias `"TL"` (any case) decodes to the canonical lira
    /// value. Any other code computes fare support by case-sensitive
    /// membership in `cheapest_fare_codes`.
    pub fn parse(node: &Value, cheapest_fare_codes: &[String]) -> Result<Self> {
        let code = node.as_str().filter(|code| !code.is_empty());

        match code {
            Some(code) if code.eq_ignore_ascii_case("TL") => Ok(Self::lira()),
            Some(code) => Ok(Self {
                code: code.to_owned(),
                supports_cheapest_fare: cheapest_fare_codes.iter().any(|c| c == code),
            }),
            None => Err(invalid("currency")),
        }
    }
}

impl Coded for Currency {
    fn code(&self) -> &str {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn capable(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn parse_computes_fare_support_from_membership() {
        let currency = Currency::parse(&json!("TRY"), &capable(&["TRY"])).unwrap();
        assert_eq!(currency.code, "TRY");
        assert!(currency.supports_cheapest_fare);

        let currency = Currency::parse(&json!("AZN"), &capable(&["TRY", "USD"])).unwrap();
        assert!(!currency.supports_cheapest_fare);
    }

    #[test]
    fn membership_test_is_case_sensitive() {
        let currency = Currency::parse(&json!("TRY"), &capable(&["try"])).unwrap();
        assert!(!currency.supports_cheapest_fare);
    }

    #[test]
    fn tl_alias_decodes_to_canonical_lira() {
        for alias in ["TL", "tl", "Tl"] {
            let currency = Currency::parse(&json!(alias), &capable(&[])).unwrap();
            assert_eq!(currency, Currency::lira());
        }
    }

    #[test]
    fn parse_fails_on_non_string_nodes() {
        for node in [json!(true), json!(123), json!(null), json!("")] {
            assert!(Currency::parse(&node, &capable(&[])).is_err());
        }
    }
}
