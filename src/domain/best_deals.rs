use serde_json::Value;

use crate::domain::{invalid, node_array, node_bool, node_f64, node_str, Coded, Currency};
use crate::error::Result;
use crate::util::{parse_date_only, YearMonth};

/// A city the best-deals endpoint can depart from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestDealsCity {
    pub code: String,
    pub title: String,
}

impl BestDealsCity {
    pub fn parse(node: &Value) -> Result<Self> {
        let title = node_str(node, "title");
        let code = node_str(node, "code");

        match (title, code) {
            (Some(title), Some(code)) => Ok(Self { code, title }),
            _ => Err(invalid("best-deals city")),
        }
    }
}

impl Coded for BestDealsCity {
    fn code(&self) -> &str {
        &self.code
    }
}

/// A promotional fare bundle from a departure city to an arrival city,
/// possibly spanning several candidate dates.
#[derive(Clone, Debug, PartialEq)]
pub struct BestDeal {
    pub departure_city: BestDealsCity,
    pub arrival_city_name: String,
    pub arrival_port_code: String,
    pub amount: f64,
    pub currency: Currency,
    /// Candidate dates, in API order. May be empty.
    pub dates: Vec<time::Date>,
    pub image_url: String,
    pub promotion: bool,
}

impl BestDeal {
    pub fn parse(node: &Value, departure_city: &BestDealsCity, currency: &Currency) -> Result<Self> {
        let arrival_city_name = node_str(node, "arrCityName");
        let arrival_port_code = node_str(node, "arrPort");
        let image_url = node_str(node, "imagePath");
        let promotion = node_bool(node, "promotion");
        let amount = node.get("bestDeal").and_then(|deal| node_f64(deal, "amount"));
        let dates_node = node_array(node, "bestDealsDays");

        let (arrival_city_name, arrival_port_code, image_url, promotion, amount, dates_node) =
            match (arrival_city_name, arrival_port_code, image_url, promotion, amount, dates_node) {
                (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) => (a, b, c, d, e, f),
                _ => return Err(invalid("best deal")),
            };

        let dates = dates_node
            .iter()
            .map(|day| {
                day.as_str()
                    .and_then(parse_date_only)
                    .ok_or_else(|| invalid("best deal"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            departure_city: departure_city.clone(),
            arrival_city_name,
            arrival_port_code,
            amount,
            currency: currency.clone(),
            dates,
            image_url,
            promotion,
        })
    }

    /// The deal's flight date: the first candidate date, absent when the
    /// API listed none.
    pub fn date(&self) -> Option<time::Date> {
        self.dates.first().copied()
    }

    /// The calendar period of [`BestDeal::date`]; absent together with it.
    pub fn year_month(&self) -> Option<YearMonth> {
        self.date().map(YearMonth::from_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn city() -> BestDealsCity {
        BestDealsCity {
            code: "IST".to_owned(),
            title: "İstanbul".to_owned(),
        }
    }

    fn deal_node(days: Value) -> Value {
        json!({
            "arrCityName": "Amsterdam",
            "arrPort": "AMS",
            "imagePath": "https://cdn.flypgs.com/ams.jpg",
            "promotion": true,
            "bestDeal": { "amount": 79.99 },
            "bestDealsDays": days,
        })
    }

    #[test]
    fn parse_city_requires_title_and_code() {
        let node = json!({ "code": "BDC", "title": "Best Deals City" });
        let parsed = BestDealsCity::parse(&node).unwrap();
        assert_eq!(parsed.code, "BDC");
        assert_eq!(parsed.title, "Best Deals City");

        assert!(BestDealsCity::parse(&json!({ "code": "BDC" })).is_err());
    }

    #[test]
    fn parse_deal_with_dates() {
        let node = deal_node(json!(["2024-09-10T00:00:00", "2024-09-12"]));
        let deal = BestDeal::parse(&node, &city(), &Currency::lira()).unwrap();

        assert_eq!(deal.departure_city, city());
        assert_eq!(deal.arrival_port_code, "AMS");
        assert_eq!(deal.amount, 79.99);
        assert!(deal.promotion);
        assert_eq!(deal.dates, vec![date!(2024 - 09 - 10), date!(2024 - 09 - 12)]);
        assert_eq!(deal.date(), Some(date!(2024 - 09 - 10)));
        assert_eq!(deal.year_month(), Some(YearMonth::from_date(date!(2024 - 09 - 10))));
    }

    #[test]
    fn empty_dates_leave_derived_values_absent() {
        let node = deal_node(json!([]));
        let deal = BestDeal::parse(&node, &city(), &Currency::lira()).unwrap();

        assert!(deal.dates.is_empty());
        assert_eq!(deal.date(), None);
        assert_eq!(deal.year_month(), None);
    }

    #[test]
    fn parse_deal_requires_image_and_amount() {
        let mut node = deal_node(json!([]));
        node.as_object_mut().unwrap().remove("imagePath");
        assert!(BestDeal::parse(&node, &city(), &Currency::lira()).is_err());

        let mut node = deal_node(json!([]));
        node.as_object_mut().unwrap().remove("bestDeal");
        assert!(BestDeal::parse(&node, &city(), &Currency::lira()).is_err());
    }

    #[test]
    fn parse_deal_rejects_unparseable_dates() {
        let node = deal_node(json!(["tomorrow"]));
        assert!(BestDeal::parse(&node, &city(), &Currency::lira()).is_err());
    }
}
