use serde_json::Value;

use crate::domain::{invalid, node_array, node_bool, node_str};
use crate::error::Result;

/// One destination entry of the port matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortMatrixItem {
    pub name: String,
    pub code: String,
    pub country_name: String,
    pub country_code: String,
    pub city_name: String,
    pub city_code: String,
    pub eligible_soldier_student: bool,
    /// Set when the code groups several airports (e.g. IST_SAW).
    pub multiple_port: bool,
}

impl PortMatrixItem {
    pub fn parse(node: &Value) -> Result<Self> {
        let name = node_str(node, "portName");
        let code = node_str(node, "portCode");
        let country_name = node_str(node, "countryName");
        let country_code = node_str(node, "countryCode");
        let city_name = node_str(node, "cityName");
        let city_code = node_str(node, "cityCode");
        let eligible_soldier_student = node_bool(node, "eligibleSoldierStudent");
        let multiple_port = node_bool(node, "multiplePort");

        match (
            name,
            code,
            country_name,
            country_code,
            city_name,
            city_code,
            eligible_soldier_student,
            multiple_port,
        ) {
            (
                Some(name),
                Some(code),
                Some(country_name),
                Some(country_code),
                Some(city_name),
                Some(city_code),
                Some(eligible_soldier_student),
                Some(multiple_port),
            ) => Ok(Self {
                name,
                code,
                country_name,
                country_code,
                city_name,
                city_code,
                eligible_soldier_student,
                multiple_port,
            }),
            _ => Err(invalid("port matrix item")),
        }
    }
}

/// One departure port and every arrival it can reach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortMatrixRow {
    pub departure: PortMatrixItem,
    pub arrivals: Vec<PortMatrixItem>,
}

impl PortMatrixRow {
    pub fn parse(node: &Value) -> Result<Self> {
        let departure_node = node.get("departure").ok_or_else(|| invalid("port matrix row"))?;
        let arrivals_node = node_array(node, "arrivalList").ok_or_else(|| invalid("port matrix row"))?;

        let departure = PortMatrixItem::parse(departure_node)?;
        let arrivals = arrivals_node
            .iter()
            .map(PortMatrixItem::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { departure, arrivals })
    }
}
