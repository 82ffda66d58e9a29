//! Unofficial asynchronous client for the Pegasus Airlines fare web API.
//!
//! The API is undocumented and requires no authentication. This crate
//! decodes its loosely-typed JSON payloads into validated domain values and
//! keeps the listing resources (languages, currencies, port matrix,
//! departure countries, best-deals cities) in a per-resource TTL cache.
//!
//! ```no_run
//! use pegasustan::{PegasusClient, domain::find_port_by_country_and_port_code};
//! use time::macros::date;
//!
//! # async fn run() -> pegasustan::Result<()> {
//! let client = PegasusClient::connect().await?;
//!
//! let currencies = client.get_currencies().await?;
//! let countries = client.get_departure_countries().await?;
//! let saw = find_port_by_country_and_port_code(&countries, "TR", "SAW")
//!     .expect("Sabiha Gökçen is always listed");
//! let arrivals = client.get_arrival_countries(saw).await?;
//! let esb = arrivals[0].ports.first().expect("at least one arrival port");
//!
//! let months = client
//!     .get_fares_months(saw, esb, date!(2024 - 07 - 01), &currencies[0])
//!     .await?;
//! for month in months {
//!     for flight in &month.flights {
//!         println!("{}: {} {}", flight.date, flight.amount, flight.currency.code);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod error;
pub mod infra;
pub mod util;

pub use error::{PegasusError, Result};
pub use infra::{CacheTtls, CachingMode, PegasusClient, PegasusClientBuilder};
pub use util::YearMonth;
