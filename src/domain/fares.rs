use serde_json::Value;

use crate::domain::{invalid, node_array, node_bool, node_f64, node_str, Currency};
use crate::error::Result;
use crate::util::{parse_date_only, YearMonth};

/// One daily fare quote.
#[derive(Clone, Debug, PartialEq)]
pub struct Flight {
    /// Date only, no time-of-day.
    pub date: time::Date,
    /// Marks campaign pricing. Mostly false; an example has not been seen.
    pub campaign_fare: bool,
    pub amount: f64,
    pub currency: Currency,
}

/// One calendar day of the fare calendar: either a scheduled flight with a
/// quote or the explicit "no fare" marker the API emits for empty days.
#[derive(Clone, Debug, PartialEq)]
pub enum FlightDay {
    NoFlight,
    Scheduled(Flight),
}

impl FlightDay {
    /// Decodes a flight-day node. The `NO_FARE` marker is checked before
    /// anything else — such days carry no date or amount at all.
    pub fn parse(node: &Value, currency: &Currency) -> Result<Self> {
        if node_str(node, "availFlightMessage").as_deref() == Some("NO_FARE") {
            return Ok(Self::NoFlight);
        }

        let date = node_str(node, "flightDate").and_then(|text| parse_date_only(&text));
        let campaign_fare = node_bool(node, "campaignFare");
        let amount = node.get("cheapFare").and_then(|fare| node_f64(fare, "amount"));

        match (date, campaign_fare, amount) {
            (Some(date), Some(campaign_fare), Some(amount)) => Ok(Self::Scheduled(Flight {
                date,
                campaign_fare,
                amount,
                currency: currency.clone(),
            })),
            _ => Err(invalid("flight")),
        }
    }
}

/// The daily fare quotes of one departure/arrival pair over one calendar
/// month. Days marked "no fare" are dropped during assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct FaresMonth {
    pub departure_port_code: String,
    pub arrival_port_code: String,
    pub year_month: YearMonth,
    pub flights: Vec<Flight>,
}

impl FaresMonth {
    pub fn parse(node: &Value, currency: &Currency) -> Result<Self> {
        let departure_port_code = node_str(node, "depPort").ok_or_else(|| invalid("fares month"))?;
        let arrival_port_code = node_str(node, "arrPort").ok_or_else(|| invalid("fares month"))?;
        let year_month =
            YearMonth::parse(&node_str(node, "month").ok_or_else(|| invalid("fares month"))?)?;

        let days = node_array(node, "days").ok_or_else(|| invalid("fares month"))?;
        let flights = days
            .iter()
            .map(|day| FlightDay::parse(day, currency))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter_map(|day| match day {
                FlightDay::Scheduled(flight) => Some(flight),
                FlightDay::NoFlight => None,
            })
            .collect();

        Ok(Self {
            departure_port_code,
            arrival_port_code,
            year_month,
            flights,
        })
    }
}
