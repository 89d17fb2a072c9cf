//! Coordinate model and the local, network-free coordinate parser.

pub mod parser;
pub mod types;

pub use parser::{parse_coordinates, parse_coordinates_with_format, CoordinateFormat};
pub use types::{format_coords, is_valid_coordinate, Coordinate};
