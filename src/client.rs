use std::future::Future;
use std::io::Read;

use axum::body::Body;
use flate2::read::GzDecoder;
use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, CONTENT_ENCODING};
use hyper::{body, Client, Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use thiserror::Error;

use crate::covid::{self, CountryRecord};

/// Everything that can go wrong while fetching the country list.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid countries url: {0}")]
    InvalidUri(#[from] hyper::http::uri::InvalidUri),
    #[error("Request failed: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("Transport error: {0}")]
    Transport(#[from] hyper::Error),
    #[error("Upstream responded with {0}")]
    Status(StatusCode),
    #[error("Unable to decompress body: {0}")]
    Gzip(#[from] std::io::Error),
    #[error("Unable to decode body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub(crate) trait CountrySource {
    fn fetch_countries(&self) -> impl Future<Output = Result<Vec<CountryRecord>, FetchError>> + Send;
}

#[derive(Clone)]
pub(crate) struct CountriesClient {
    url: String,
    client: Client<HttpsConnector<HttpConnector>, Body>
}

impl CountriesClient {
    pub(crate) fn new(url: impl Into<String>) -> CountriesClient {
        CountriesClient {
            url: url.into(),
            client: Client::builder().build::<HttpsConnector<HttpConnector>, Body>(HttpsConnector::new())
        }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }
}

impl CountrySource for CountriesClient {
    async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let uri: Uri = self.url.parse()?;

        tracing::debug!("URI: {}", uri);

        let request = Request::builder()
            .uri(uri)
            .method(Method::GET)
            .header(ACCEPT, "application/json")
            .body(Body::empty())?;

        let resp = self.client.request(request).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let gzipped = resp
            .headers()
            .get(CONTENT_ENCODING)
            .map_or(false, |encoding| encoding.as_bytes().eq_ignore_ascii_case(b"gzip"));

        let encoded_bytes = body::to_bytes(resp.into_body()).await?;

        let decoded_bytes = if gzipped {
            let mut gz = GzDecoder::new(&*encoded_bytes);
            let mut decoded_bytes: Vec<u8> = vec!();
            gz.read_to_end(&mut decoded_bytes)?;
            decoded_bytes
        } else {
            encoded_bytes.to_vec()
        };

        Ok(covid::parse_countries(&decoded_bytes)?)
    }
}
