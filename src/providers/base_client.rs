use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

/// Thin wrapper around `reqwest::Client` holding the base URL and the query
/// parameters every request carries.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    query_params: Vec<(String, String)>,
}

impl HttpClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            query_params: Vec::new(),
        }
    }

    /// Sets a query parameter, replacing any previous value for `key`.
    pub fn set_query_param(&mut self, key: &str, value: String) {
        match self.query_params.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.query_params.push((key.to_string(), value)),
        }
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%url, "POST");

        self.client.post(url).query(&self.query_params)
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, reqwest::Error> {
        self.request(path).json(payload).send().await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: Form,
        headers: &[(&str, String)],
    ) -> Result<Response, reqwest::Error> {
        let mut request = self.request(path);
        for (key, value) in headers {
            request = request.header(*key, value);
        }
        request.multipart(form).send().await
    }
}
