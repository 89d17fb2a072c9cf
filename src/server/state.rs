use crate::geocode::GeocodingResolver;

pub struct AppState {
    pub resolver: GeocodingResolver,
}
