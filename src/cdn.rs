// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::sync::Arc;

use tracing::info;

use crate::config::manifest::Manifest;
use crate::library::Library;

/// The default CDN endpoint for the sound library.
pub const DEFAULT_ENDPOINT: &str = "https://cdn.trynoice.com";

/// The manifest path relative to the CDN endpoint.
const MANIFEST_PATH: &str = "library/library-manifest.json";

/// A client for the sound library CDN.
pub struct Client {
    /// The CDN endpoint.
    endpoint: String,
    /// The underlying HTTP client.
    http: reqwest::Client,
}

impl Client {
    /// Creates a new CDN client for the given endpoint.
    pub fn new(endpoint: &str) -> Client {
        Client {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Gets the URL of the library manifest on this CDN.
    pub fn manifest_url(&self) -> String {
        format!("{}/{}", self.endpoint, MANIFEST_PATH)
    }

    /// Fetches and parses the library manifest.
    pub async fn fetch_manifest(&self) -> Result<Manifest, Box<dyn Error>> {
        let url = self.manifest_url();
        info!(url = url, "Fetching library manifest.");

        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<Manifest>().await?)
    }

    /// Fetches the library manifest and resolves it into a library.
    pub async fn fetch_library(&self) -> Result<Arc<Library>, Box<dyn Error>> {
        Ok(Arc::new(self.fetch_manifest().await?.to_library()?))
    }
}

#[cfg(test)]
mod test {
    use super::Client;

    #[test]
    fn test_manifest_url() {
        assert_eq!(
            "https://cdn.example.test/library/library-manifest.json",
            Client::new("https://cdn.example.test").manifest_url()
        );

        // Trailing slashes on the endpoint don't double up.
        assert_eq!(
            "https://cdn.example.test/library/library-manifest.json",
            Client::new("https://cdn.example.test/").manifest_url()
        );
    }
}
