//! OpenMapIt: turn selected or typed text into map coordinates.
//!
//! Text is first checked for an explicit coordinate pair ([`coords`]). Only
//! when none is found is it sent through the geocoding provider chain
//! ([`geocode`]). [`lookup::locate`] runs both steps.

pub mod config;
pub mod coords;
pub mod geocode;
pub mod lookup;
pub mod server;

pub use config::Config;
pub use coords::{parse_coordinates, Coordinate};
pub use geocode::{GeocodeResult, GeocodingResolver, Resolution};
pub use lookup::{locate, LocateError, Location, LocationKind};
