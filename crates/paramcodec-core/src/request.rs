//! Request abstractions consumed by parameter processors.
//!
//! [`ServerRequest`] is the read side used while decoding an inbound call and
//! [`ClientRequest`] the write side used while encoding an outbound one. The
//! in-memory implementations [`HttpServerRequest`] and [`RestClientRequest`]
//! cover the wire conventions of every built-in location.
//!
//! # Examples
//!
//! ```
//! use paramcodec_core::descriptor::ParamLocation;
//! use paramcodec_core::request::{HttpServerRequest, ServerRequest};
//!
//! let request = HttpServerRequest::new()
//!     .with_query("ids=1&ids=2&q=rust+lang")
//!     .with_cookie_header("session=abc; theme=dark");
//!
//! assert_eq!(request.value(ParamLocation::Query, "q").as_deref(), Some("rust lang"));
//! assert_eq!(
//!     request.values(ParamLocation::Query, "ids"),
//!     Some(vec!["1".to_string(), "2".to_string()])
//! );
//! assert_eq!(request.value(ParamLocation::Cookie, "theme").as_deref(), Some("dark"));
//! ```

// Internal imports (std, crate)
use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptor::ParamLocation;
use crate::Error;

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use url::{form_urlencoded, Url};

static PATH_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}/]+)\}").expect("placeholder pattern is valid"));

/// One uploaded multipart file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name
    pub name: String,
    /// Original file name sent by the client
    pub file_name: Option<String>,
    /// Declared media type of the part
    pub content_type: Option<String>,
    /// File contents
    pub data: Vec<u8>,
}

impl FilePart {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Read access to an inbound request
pub trait ServerRequest {
    /// All raw values bound to `name` at `location`, in wire order
    fn values(&self, location: ParamLocation, name: &str) -> Option<Vec<String>>;

    /// The first raw value bound to `name` at `location`
    fn value(&self, location: ParamLocation, name: &str) -> Option<String> {
        self.values(location, name)
            .and_then(|values| values.into_iter().next())
    }

    /// Values already materialized for a location by an earlier stage
    fn preparsed(&self, location: ParamLocation) -> Option<&HashMap<String, JsonValue>>;

    /// Multipart file bound to `name`
    fn part(&self, name: &str) -> Option<Arc<FilePart>>;

    /// Raw request body
    fn body(&self) -> Option<&[u8]>;
}

/// Write access to an outbound request
pub trait ClientRequest {
    /// Add a scalar field at `location`
    fn add_field(&mut self, location: ParamLocation, name: &str, value: String);

    /// Attach a multipart file
    fn attach(&mut self, name: &str, part: Arc<FilePart>);

    /// Replace the request body
    fn set_body(&mut self, content_type: &str, body: Vec<u8>);
}

/// In-memory inbound request assembled from raw HTTP pieces
#[derive(Debug, Clone, Default)]
pub struct HttpServerRequest {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    path_params: HashMap<String, String>,
    parts: HashMap<String, Arc<FilePart>>,
    body: Option<Vec<u8>>,
    preparsed: HashMap<ParamLocation, HashMap<String, JsonValue>>,
}

impl HttpServerRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append pairs from an urlencoded query string (without the leading `?`)
    pub fn with_query(mut self, query: &str) -> Self {
        self.query
            .extend(form_urlencoded::parse(query.as_bytes()).into_owned());
        self
    }

    /// Append pairs from an `application/x-www-form-urlencoded` body
    pub fn with_form(mut self, body: &str) -> Self {
        self.form
            .extend(form_urlencoded::parse(body.as_bytes()).into_owned());
        self
    }

    pub fn with_form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Add a header; `Cookie` headers also populate the cookie jar
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if name.eq_ignore_ascii_case("cookie") {
            self.cookies.extend(parse_cookie_header(value));
        }
        self.headers
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn with_cookie_header(self, value: &str) -> Self {
        self.with_header("cookie", value)
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Bind path parameters by matching `path` against a `{name}` template
    pub fn with_path_template(mut self, template: &str, path: &str) -> crate::Result<Self> {
        let mut pattern = String::from("^");
        let mut names = Vec::new();
        let mut last = 0;
        for caps in PATH_PLACEHOLDER.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            pattern.push_str(&regex::escape(&template[last..whole.start()]));
            pattern.push_str("([^/]+)");
            names.push(name.as_str().to_string());
            last = whole.end();
        }
        pattern.push_str(&regex::escape(&template[last..]));
        pattern.push('$');

        let re = Regex::new(&pattern)
            .map_err(|e| Error::config(format!("Invalid path template '{}': {}", template, e)))?;
        let caps = re.captures(path).ok_or_else(|| {
            Error::bad_request(format!(
                "path '{}' does not match template '{}'",
                path, template
            ))
        })?;
        for (idx, name) in names.into_iter().enumerate() {
            if let Some(segment) = caps.get(idx + 1) {
                let decoded = urlencoding::decode(segment.as_str()).map_err(|e| {
                    Error::bad_request(format!("path parameter '{}' is not valid UTF-8: {}", name, e))
                })?;
                self.path_params.insert(name, decoded.into_owned());
            }
        }
        Ok(self)
    }

    pub fn with_part(mut self, part: FilePart) -> Self {
        self.parts.insert(part.name.clone(), Arc::new(part));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Install values materialized by an earlier stage, e.g. a multipart parser
    pub fn with_preparsed(
        mut self,
        location: ParamLocation,
        values: HashMap<String, JsonValue>,
    ) -> Self {
        self.preparsed.insert(location, values);
        self
    }
}

fn collect_values(pairs: &[(String, String)], name: &str) -> Option<Vec<String>> {
    let values: Vec<String> = pairs
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Split a `Cookie` header into name/value pairs
fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            // values are percent-encoded on the way out; keep raw text that is not
            let value = urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string());
            Some((name.to_string(), value))
        })
        .collect()
}

impl ServerRequest for HttpServerRequest {
    fn values(&self, location: ParamLocation, name: &str) -> Option<Vec<String>> {
        match location {
            ParamLocation::Query => collect_values(&self.query, name),
            ParamLocation::Form => collect_values(&self.form, name),
            ParamLocation::Cookie => collect_values(&self.cookies, name),
            ParamLocation::Header => {
                let values: Vec<String> = self
                    .headers
                    .iter()
                    .filter(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v.clone())
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some(values)
                }
            }
            ParamLocation::Path => self.path_params.get(name).map(|v| vec![v.clone()]),
            ParamLocation::Body => None,
        }
    }

    fn preparsed(&self, location: ParamLocation) -> Option<&HashMap<String, JsonValue>> {
        self.preparsed.get(&location)
    }

    fn part(&self, name: &str) -> Option<Arc<FilePart>> {
        self.parts.get(name).cloned()
    }

    fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Outbound request fields collected by parameter processors
#[derive(Debug, Clone, Default)]
pub struct RestClientRequest {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    path_params: HashMap<String, String>,
    parts: Vec<(String, Arc<FilePart>)>,
    body: Option<(String, Vec<u8>)>,
}

impl ClientRequest for RestClientRequest {
    fn add_field(&mut self, location: ParamLocation, name: &str, value: String) {
        let name = name.to_string();
        match location {
            ParamLocation::Query => self.query.push((name, value)),
            ParamLocation::Form => self.form.push((name, value)),
            ParamLocation::Header => self.headers.push((name, value)),
            ParamLocation::Cookie => self.cookies.push((name, value)),
            ParamLocation::Path => {
                self.path_params.insert(name, value);
            }
            ParamLocation::Body => {
                log::warn!("ignoring body field '{}': bodies are set whole", name);
            }
        }
    }

    fn attach(&mut self, name: &str, part: Arc<FilePart>) {
        self.parts.push((name.to_string(), part));
    }

    fn set_body(&mut self, content_type: &str, body: Vec<u8>) {
        self.body = Some((content_type.to_string(), body));
    }
}

impl RestClientRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn form_fields(&self) -> &[(String, String)] {
        &self.form
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    pub fn parts(&self) -> &[(String, Arc<FilePart>)] {
        &self.parts
    }

    /// Content type and bytes of the body, if one was set
    pub fn body(&self) -> Option<(&str, &[u8])> {
        self.body
            .as_ref()
            .map(|(ct, bytes)| (ct.as_str(), bytes.as_slice()))
    }

    pub fn query_string(&self) -> String {
        encode_pairs(&self.query)
    }

    pub fn form_body(&self) -> String {
        encode_pairs(&self.form)
    }

    /// `Cookie` header value; cookie values are percent-encoded
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Expand a `{name}` path template with the collected path parameters
    pub fn path(&self, template: &str) -> crate::Result<String> {
        let mut missing = None;
        let path = PATH_PLACEHOLDER.replace_all(template, |caps: &regex::Captures| {
            match self.path_params.get(&caps[1]) {
                Some(value) => urlencoding::encode(value).into_owned(),
                None => {
                    missing.get_or_insert_with(|| caps[1].to_string());
                    String::new()
                }
            }
        });
        match missing {
            Some(name) => Err(Error::config(format!(
                "No value for path parameter '{}' in '{}'",
                name, template
            ))),
            None => Ok(path.into_owned()),
        }
    }

    /// Build a `reqwest` request carrying every collected field
    pub fn into_reqwest(
        &self,
        client: &reqwest::Client,
        method: reqwest::Method,
        base_url: &Url,
        path_template: &str,
    ) -> crate::Result<reqwest::RequestBuilder> {
        let path = self.path(path_template)?;
        let url = format!("{}{}", base_url.as_str().trim_end_matches('/'), path);
        let url = Url::parse(&url)
            .map_err(|e| Error::config(format!("Invalid request URL '{}': {}", url, e)))?;

        let mut builder = client.request(method, url);
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = self.cookie_header() {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }

        if self.body.is_some() && !(self.parts.is_empty() && self.form.is_empty()) {
            return Err(Error::config(format!(
                "request for '{}' carries both form data and a body",
                path_template
            )));
        }

        if !self.parts.is_empty() {
            let mut form = reqwest::multipart::Form::new();
            for (name, value) in &self.form {
                form = form.text(name.clone(), value.clone());
            }
            for (name, file) in &self.parts {
                let mut part = reqwest::multipart::Part::bytes(file.data.clone());
                if let Some(file_name) = &file.file_name {
                    part = part.file_name(file_name.clone());
                }
                if let Some(content_type) = &file.content_type {
                    part = part.mime_str(content_type)?;
                }
                form = form.part(name.clone(), part);
            }
            builder = builder.multipart(form);
        } else if !self.form.is_empty() {
            builder = builder.form(&self.form);
        } else if let Some((content_type, body)) = &self.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, content_type.as_str())
                .body(body.clone());
        }
        Ok(builder)
    }
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_parsing() {
        let request = HttpServerRequest::new().with_header("Cookie", "a=1; b=\"two\"; =skip; c");
        assert_eq!(request.value(ParamLocation::Cookie, "a").as_deref(), Some("1"));
        assert_eq!(request.value(ParamLocation::Cookie, "b").as_deref(), Some("two"));
        assert_eq!(request.value(ParamLocation::Cookie, "c"), None);
    }

    #[test]
    fn test_cookie_values_survive_the_wire() {
        let values = ["a;b", "\"q\"", " pad ", "50%", "x=y, z"];
        let mut client = RestClientRequest::new();
        for (idx, value) in values.iter().enumerate() {
            client.add_field(ParamLocation::Cookie, &format!("c{}", idx), value.to_string());
        }
        let header = client.cookie_header().unwrap();
        assert!(!header.contains("a;b"));

        let server = HttpServerRequest::new().with_cookie_header(&header);
        for (idx, value) in values.iter().enumerate() {
            assert_eq!(
                server.value(ParamLocation::Cookie, &format!("c{}", idx)).as_deref(),
                Some(*value)
            );
        }
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let request = HttpServerRequest::new()
            .with_header("X-Trace", "one")
            .with_header("x-trace", "two");
        assert_eq!(
            request.values(ParamLocation::Header, "x-TRACE"),
            Some(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_path_template_matching() -> crate::Result<()> {
        let request = HttpServerRequest::new()
            .with_path_template("/pets/{petId}/photos/{name}", "/pets/42/photos/a%20b")?;
        assert_eq!(request.value(ParamLocation::Path, "petId").as_deref(), Some("42"));
        assert_eq!(request.value(ParamLocation::Path, "name").as_deref(), Some("a b"));

        let err = HttpServerRequest::new()
            .with_path_template("/pets/{petId}", "/users/1")
            .unwrap_err();
        assert!(err.is_client_fault());
        Ok(())
    }

    #[test]
    fn test_client_rendering() -> crate::Result<()> {
        let mut request = RestClientRequest::new();
        request.add_field(ParamLocation::Query, "q", "a b".into());
        request.add_field(ParamLocation::Form, "ids", "1".into());
        request.add_field(ParamLocation::Form, "ids", "2".into());
        request.add_field(ParamLocation::Cookie, "session", "abc".into());
        request.add_field(ParamLocation::Cookie, "theme", "dark".into());
        request.add_field(ParamLocation::Path, "petId", "4 2".into());

        assert_eq!(request.query_string(), "q=a+b");
        assert_eq!(request.form_body(), "ids=1&ids=2");
        assert_eq!(request.cookie_header().as_deref(), Some("session=abc; theme=dark"));
        assert_eq!(request.path("/pets/{petId}")?, "/pets/4%202");
        assert!(request.path("/pets/{other}").is_err());
        Ok(())
    }

    #[test]
    fn test_into_reqwest_builds_request() -> crate::Result<()> {
        let mut request = RestClientRequest::new();
        request.add_field(ParamLocation::Query, "q", "rust".into());
        request.add_field(ParamLocation::Header, "x-trace", "t1".into());
        request.add_field(ParamLocation::Path, "id", "7".into());

        let base = Url::parse("http://localhost:8080/api/").unwrap();
        let built = request
            .into_reqwest(&reqwest::Client::new(), reqwest::Method::GET, &base, "/items/{id}")?
            .build()?;
        assert_eq!(built.url().as_str(), "http://localhost:8080/api/items/7?q=rust");
        assert_eq!(built.headers().get("x-trace").unwrap(), "t1");
        Ok(())
    }

    #[test]
    fn test_into_reqwest_rejects_form_with_body() {
        let mut request = RestClientRequest::new();
        request.add_field(ParamLocation::Form, "name", "rex".into());
        request.set_body("application/json", b"{}".to_vec());

        let base = Url::parse("http://localhost:8080/").unwrap();
        let err = request
            .into_reqwest(&reqwest::Client::new(), reqwest::Method::POST, &base, "/pets")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
