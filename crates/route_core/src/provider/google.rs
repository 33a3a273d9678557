use std::time::Duration;

use reqwest::{blocking::Client, Url};

use super::PayloadFetcher;
use crate::coordinate::Coordinate;
use crate::error::FetchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com";

/// Blocking fetcher for Google-compatible Directions / Distance Matrix APIs.
///
/// Requests ask for `departure_time=now` so responses carry
/// `duration_in_traffic`.
#[derive(Debug, Clone)]
pub struct GoogleMapsFetcher {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleMapsFetcher {
    /// Create a fetcher for `endpoint` (e.g. [`DEFAULT_ENDPOINT`]).
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}{}", self.endpoint, path))
            .map_err(|err| FetchError::Url(err.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query
                .append_pair("departure_time", "now")
                .append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    fn get(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.bytes().map_err(transport)?;
        Ok(body.to_vec())
    }
}

impl PayloadFetcher for GoogleMapsFetcher {
    fn fetch_directions(&self, from: Coordinate, to: Coordinate) -> Result<Vec<u8>, FetchError> {
        let url = self.url(
            DIRECTIONS_PATH,
            &[
                ("origin", format_coordinate(from)),
                ("destination", format_coordinate(to)),
            ],
        )?;
        self.get(url)
    }

    fn fetch_distance_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<u8>, FetchError> {
        let url = self.url(
            DISTANCE_MATRIX_PATH,
            &[
                ("origins", join_coordinates(origins)),
                ("destinations", join_coordinates(destinations)),
            ],
        )?;
        self.get(url)
    }
}

fn transport(err: reqwest::Error) -> FetchError {
    FetchError::Transport(Box::new(err))
}

fn format_coordinate(coordinate: Coordinate) -> String {
    format!("{:.6},{:.6}", coordinate.lat, coordinate.lng)
}

fn join_coordinates(coordinates: &[Coordinate]) -> String {
    coordinates
        .iter()
        .map(|c| format_coordinate(*c))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_url_carries_endpoints_and_key() {
        let fetcher = GoogleMapsFetcher::new("http://localhost:8080/", "secret").expect("client");
        let url = fetcher
            .url(
                DIRECTIONS_PATH,
                &[("origin", format_coordinate(Coordinate::new(52.5, 13.4)))],
            )
            .expect("url");

        assert_eq!(url.path(), "/maps/api/directions/json");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("origin".to_string(), "52.500000,13.400000".to_string())));
        assert!(query.contains(&("key".to_string(), "secret".to_string())));
    }

    #[test]
    fn matrix_points_are_pipe_separated() {
        let joined = join_coordinates(&[Coordinate::new(1.0, 2.0), Coordinate::new(-3.5, 4.25)]);
        assert_eq!(joined, "1.000000,2.000000|-3.500000,4.250000");
    }
}
