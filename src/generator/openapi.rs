//! Built-in HAR to OpenAPI 3.0 engine

use super::json_schema::{self, Schema};
use super::{GeneratedSpec, GeneratorConfig, SpecGenerator};
use crate::error::Har2OapiError;
use crate::har::{Entry, Har, Header};
use anyhow::{Context as _, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use tracing::{debug, warn};
use url::Url;

const OPENAPI_VERSION: &str = "3.0.3";

const FALLBACK_TITLE: &str = "Captured API";

const STANDARD_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Request headers set by user agents and proxies rather than by API clients
const STANDARD_HEADERS: &[&str] = &[
    "accept",
    "accept-charset",
    "accept-encoding",
    "accept-language",
    "access-control-request-headers",
    "access-control-request-method",
    "cache-control",
    "connection",
    "content-length",
    "content-type",
    "cookie",
    "dnt",
    "host",
    "if-modified-since",
    "if-none-match",
    "keep-alive",
    "origin",
    "pragma",
    "priority",
    "referer",
    "te",
    "upgrade-insecure-requests",
    "user-agent",
    "via",
    "x-forwarded-for",
    "x-requested-with",
];

/// Header names that carry an API key or token
const KEY_HEADER_MARKERS: &[&str] = &["api-key", "apikey", "auth-token", "access-token"];

/// Numeric ids, UUIDs and long hex digests
const ID_SEGMENT_PATTERN: &str = r"^(?:\d+|[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}|[0-9a-fA-F]{16,})$";

/// Generates an OpenAPI 3.0.3 document from captured traffic
#[derive(Debug, Clone)]
pub struct HarToOpenApi {
    id_segment: Regex,
}

impl HarToOpenApi {
    /// Create the engine
    ///
    /// # Errors
    ///
    /// Returns an error if the path segment pattern fails to compile
    #[inline]
    pub fn new() -> Result<Self> {
        let id_segment = Regex::new(ID_SEGMENT_PATTERN)
            .with_context(|| format!("Invalid path segment pattern: {ID_SEGMENT_PATTERN}"))?;
        Ok(Self { id_segment })
    }

    /// Path template for a URL path, with id-like segments as parameters
    fn template_path(&self, path: &str, parameterize: bool) -> (String, Vec<PathParam>) {
        if path.is_empty() || path == "/" {
            return ("/".to_owned(), Vec::new());
        }
        if !parameterize {
            return (path.to_owned(), Vec::new());
        }

        let mut params = Vec::new();
        let segments: Vec<String> = path
            .split('/')
            .map(|segment| {
                if segment.is_empty() || !self.id_segment.is_match(segment) {
                    return segment.to_owned();
                }
                let name = format!("param{}", params.len() + 1);
                let template = format!("{{{name}}}");
                params.push(PathParam {
                    name,
                    schema: segment_schema(segment),
                });
                template
            })
            .collect();

        (segments.join("/"), params)
    }

    fn collect_entry(
        &self,
        collected: &mut Collected,
        index: usize,
        entry: &Entry,
        config: &GeneratorConfig,
    ) {
        let request = &entry.request;

        let Ok(url) = Url::parse(&request.url) else {
            report(
                config,
                format_args!("Skipping entry {index}: cannot parse url '{}'", request.url),
            );
            return;
        };
        let Some(host) = url.host_str() else {
            report(
                config,
                format_args!("Skipping entry {index}: url '{url}' has no host"),
            );
            return;
        };

        let method = request.method.to_ascii_lowercase();
        let standard = STANDARD_METHODS.contains(&method.as_str());
        if method.is_empty() || (!standard && !config.relaxed_methods) {
            debug!("Skipping entry {index}: non-standard method '{}'", request.method);
            return;
        }

        if config.drop_paths_without_successful_response
            && !entry.response.as_ref().is_some_and(|response| response.is_success())
        {
            debug!("Skipping entry {index}: no successful response for {url}");
            return;
        }

        let domain = collected.domain.get_or_insert_with(|| host.to_owned());
        if !config.force_all_requests_in_same_spec && domain.as_str() != host {
            debug!("Skipping entry {index}: host {host} differs from {domain}");
            return;
        }

        let (path, path_params) =
            self.template_path(url.path(), config.attempt_to_parameterize_url);
        let path_data = collected.paths.entry(path).or_default();

        if let Some(origin) = server_from_url(&url) {
            collected.servers.insert(origin.clone());
            path_data.servers.insert(origin);
        }

        let operation = path_data.operations.entry(method).or_default();
        if operation.path_params.is_empty() {
            operation.path_params = path_params;
        }

        operation.query_params.extend(
            url.query_pairs()
                .map(|(name, _)| name.into_owned())
                .chain(request.query_string.iter().map(|param| param.name.clone()))
                .filter(|name| !name.is_empty()),
        );

        for header in &request.headers {
            let name = header.name.to_ascii_lowercase();
            if name.is_empty() || name.starts_with(':') {
                continue;
            }

            if config.guess_authentication_headers
                && let Some((scheme_name, scheme)) = auth_scheme(header)
            {
                collected.security_schemes.insert(scheme_name.clone(), scheme);
                operation.security.insert(scheme_name);
                continue;
            }

            if config.filter_standard_headers && is_standard_header(&name) {
                continue;
            }

            operation.header_params.insert(name);
        }

        if let Some(post_data) = &request.post_data {
            let mime = post_data
                .mime_type
                .as_deref()
                .or_else(|| header_value(&request.headers, "content-type"))
                .and_then(normalize_mime);

            if let Some(mime) = mime {
                if is_json_mime(&mime)
                    && let Some(schema) = post_data.text.as_deref().and_then(sample_schema)
                {
                    operation.request_schema =
                        Some(json_schema::merge_into(operation.request_schema.take(), schema));
                }
                operation.request_content_types.insert(mime);
            }
        }

        let Some(response) = &entry.response else {
            operation.responses.entry("default".to_owned()).or_default();
            return;
        };

        let status = if response.status > 0 {
            response.status.to_string()
        } else {
            "default".to_owned()
        };
        let response_data = operation.responses.entry(status).or_default();

        let content = response.content.as_ref();
        let mime = content
            .and_then(|content| content.mime_type.as_deref())
            .or_else(|| header_value(&response.headers, "content-type"))
            .and_then(normalize_mime);
        let body = content
            .filter(|content| content.encoding.as_deref() != Some("base64"))
            .and_then(|content| content.text.as_deref());

        let json_like = mime.as_deref().is_some_and(is_json_mime);
        let schema = if json_like || config.relaxed_content_type_json_parse {
            body.and_then(sample_schema)
        } else {
            None
        };

        if let Some(schema) = schema {
            response_data.schema = Some(json_schema::merge_into(response_data.schema.take(), schema));
            let mime = match mime {
                Some(mime) if json_like => mime,
                _ => "application/json".to_owned(),
            };
            response_data.content_types.insert(mime);
        } else if let Some(mime) = mime {
            response_data.content_types.insert(mime);
        }
    }
}

impl SpecGenerator for HarToOpenApi {
    #[inline]
    fn generate(&self, har: &Har, config: &GeneratorConfig) -> Result<GeneratedSpec> {
        let mut collected = Collected::default();
        for (index, entry) in har.log.entries.iter().enumerate() {
            self.collect_entry(&mut collected, index, entry, config);
        }

        debug!(
            "Collected {} paths from {} entries",
            collected.paths.len(),
            har.log.entries.len()
        );

        let domain = collected.domain.clone();
        let document = collected.into_document(config.add_servers_to_paths);
        let spec = serde_json::to_value(&document).map_err(|e| {
            Har2OapiError::generation(format!("Failed to build OpenAPI document: {e}"))
        })?;

        Ok(GeneratedSpec { spec, domain })
    }
}

/// Generation problems are warnings only when the user asked for them
fn report(config: &GeneratorConfig, message: impl Display) {
    if config.log_errors {
        warn!("{message}");
    } else {
        debug!("{message}");
    }
}

fn segment_schema(segment: &str) -> Schema {
    if segment.bytes().all(|byte| byte.is_ascii_digit()) {
        Schema::typed("integer")
    } else if segment.len() == 36 && segment.contains('-') {
        Schema::formatted("string", "uuid")
    } else {
        Schema::typed("string")
    }
}

fn server_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

fn header_value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str())
}

fn is_standard_header(name: &str) -> bool {
    name.starts_with("sec-") || STANDARD_HEADERS.contains(&name)
}

/// Security scheme implied by a header, keyed by scheme name
fn auth_scheme(header: &Header) -> Option<(String, SecurityScheme)> {
    let name = header.name.to_ascii_lowercase();

    if name == "authorization" {
        let kind = header
            .value
            .split_whitespace()
            .next()
            .map(str::to_ascii_lowercase);
        return Some(match kind.as_deref() {
            Some("bearer") => ("bearerAuth".to_owned(), SecurityScheme::http("bearer")),
            Some("basic") => ("basicAuth".to_owned(), SecurityScheme::http("basic")),
            _ => ("authorization".to_owned(), SecurityScheme::api_key(&header.name)),
        });
    }

    KEY_HEADER_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
        .then(|| (name.clone(), SecurityScheme::api_key(&header.name)))
}

fn normalize_mime(value: &str) -> Option<String> {
    let essence = value.split(';').next()?.trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}

fn is_json_mime(mime: &str) -> bool {
    mime.contains("json")
}

fn sample_schema(text: &str) -> Option<Schema> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed)
        .ok()
        .map(|value| json_schema::infer(&value))
}

#[derive(Debug, Default)]
struct Collected {
    domain: Option<String>,
    servers: BTreeSet<String>,
    paths: BTreeMap<String, PathData>,
    security_schemes: BTreeMap<String, SecurityScheme>,
}

#[derive(Debug, Default)]
struct PathData {
    servers: BTreeSet<String>,
    operations: BTreeMap<String, OperationData>,
}

#[derive(Debug, Default)]
struct OperationData {
    path_params: Vec<PathParam>,
    query_params: BTreeSet<String>,
    header_params: BTreeSet<String>,
    security: BTreeSet<String>,
    request_content_types: BTreeSet<String>,
    request_schema: Option<Schema>,
    responses: BTreeMap<String, ResponseData>,
}

#[derive(Debug, Default)]
struct ResponseData {
    content_types: BTreeSet<String>,
    schema: Option<Schema>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PathParam {
    name: String,
    schema: Schema,
}

impl Collected {
    fn into_document(self, servers_per_path: bool) -> OpenApiDocument {
        let to_servers = |origins: BTreeSet<String>| -> Vec<Server> {
            origins.into_iter().map(|url| Server { url }).collect()
        };

        let paths = self
            .paths
            .into_iter()
            .map(|(path, data)| {
                let item = PathItem {
                    servers: if servers_per_path {
                        to_servers(data.servers)
                    } else {
                        Vec::new()
                    },
                    operations: data
                        .operations
                        .into_iter()
                        .map(|(method, operation)| (method, operation.into_operation()))
                        .collect(),
                };
                (path, item)
            })
            .collect();

        OpenApiDocument {
            openapi: OPENAPI_VERSION,
            info: Info {
                title: self.domain.unwrap_or_else(|| FALLBACK_TITLE.to_owned()),
                version: "1.0.0",
            },
            servers: to_servers(self.servers),
            paths,
            components: (!self.security_schemes.is_empty()).then_some(Components {
                security_schemes: self.security_schemes,
            }),
        }
    }
}

impl OperationData {
    fn into_operation(self) -> Operation {
        let path = self.path_params.into_iter().map(|param| Parameter {
            name: param.name,
            location: "path",
            required: true,
            schema: param.schema,
        });
        let query = self.query_params.into_iter().map(|name| Parameter {
            name,
            location: "query",
            required: false,
            schema: Schema::typed("string"),
        });
        let header = self.header_params.into_iter().map(|name| Parameter {
            name,
            location: "header",
            required: false,
            schema: Schema::typed("string"),
        });

        let request_schema = self.request_schema;
        let request_body = (!self.request_content_types.is_empty()).then(|| RequestBody {
            content: self
                .request_content_types
                .into_iter()
                .map(|mime| {
                    let schema = is_json_mime(&mime).then(|| request_schema.clone()).flatten();
                    (mime, MediaType { schema })
                })
                .collect(),
        });

        let responses = self
            .responses
            .into_iter()
            .map(|(status, data)| {
                let description = if status == "default" {
                    "Default response".to_owned()
                } else {
                    format!("Status {status}")
                };
                let content = (!data.content_types.is_empty()).then(|| {
                    data.content_types
                        .into_iter()
                        .map(|mime| (mime, MediaType { schema: data.schema.clone() }))
                        .collect()
                });
                (status, Response { description, content })
            })
            .collect();

        Operation {
            parameters: path.chain(query).chain(header).collect(),
            request_body,
            responses,
            security: self
                .security
                .into_iter()
                .map(|scheme| BTreeMap::from([(scheme, Vec::new())]))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenApiDocument {
    openapi: &'static str,
    info: Info,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    servers: Vec<Server>,
    paths: BTreeMap<String, PathItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Components>,
}

#[derive(Debug, Serialize)]
struct Info {
    title: String,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct Server {
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Components {
    security_schemes: BTreeMap<String, SecurityScheme>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SecurityScheme {
    #[serde(rename = "type")]
    scheme_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheme: Option<&'static str>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    location: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl SecurityScheme {
    const fn http(scheme: &'static str) -> Self {
        Self {
            scheme_type: "http",
            scheme: Some(scheme),
            location: None,
            name: None,
        }
    }

    fn api_key(header: &str) -> Self {
        Self {
            scheme_type: "apiKey",
            scheme: None,
            location: Some("header"),
            name: Some(header.to_owned()),
        }
    }
}

#[derive(Debug, Serialize)]
struct PathItem {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    servers: Vec<Server>,
    #[serde(flatten)]
    operations: BTreeMap<String, Operation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_body: Option<RequestBody>,
    responses: BTreeMap<String, Response>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    security: Vec<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Serialize)]
struct Parameter {
    name: String,
    #[serde(rename = "in")]
    location: &'static str,
    required: bool,
    schema: Schema,
}

#[derive(Debug, Serialize)]
struct RequestBody {
    content: BTreeMap<String, MediaType>,
}

#[derive(Debug, Serialize)]
struct Response {
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<BTreeMap<String, MediaType>>,
}

#[derive(Debug, Serialize)]
struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<Schema>,
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "These are unit tests")]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn entry(method: &str, url: &str, status: i64) -> Value {
        json!({
            "request": { "method": method, "url": url, "headers": [] },
            "response": { "status": status, "headers": [] }
        })
    }

    fn har(entries: Vec<Value>) -> Har {
        serde_json::from_value(json!({ "log": { "entries": entries } })).unwrap()
    }

    fn generate(entries: Vec<Value>, config: GeneratorConfig) -> GeneratedSpec {
        HarToOpenApi::new()
            .unwrap()
            .generate(&har(entries), &config)
            .unwrap()
    }

    fn defaults() -> GeneratorConfig {
        GeneratorConfig::from(&crate::config::RunParams::default())
    }

    #[test]
    fn empty_har_yields_skeleton_document() {
        let generated = generate(Vec::new(), defaults());

        assert_eq!(generated.domain, None);
        assert_eq!(generated.spec["openapi"], "3.0.3");
        assert_eq!(generated.spec["info"]["title"], FALLBACK_TITLE);
        assert_eq!(generated.spec["paths"], json!({}));
    }

    #[test]
    fn title_and_servers_come_from_the_first_host() {
        let generated = generate(
            vec![
                entry("GET", "https://api.example.com/users", 200),
                entry("GET", "http://localhost:8080/health", 200),
            ],
            defaults(),
        );

        assert_eq!(generated.domain.as_deref(), Some("api.example.com"));
        assert_eq!(generated.spec["info"]["title"], "api.example.com");
        assert_eq!(
            generated.spec["servers"],
            json!([{ "url": "https://api.example.com" }])
        );
        assert!(generated.spec["paths"].get("/health").is_none());
    }

    #[test]
    fn forcing_same_spec_keeps_every_host() {
        let config = GeneratorConfig {
            force_all_requests_in_same_spec: true,
            ..defaults()
        };
        let generated = generate(
            vec![
                entry("GET", "https://api.example.com/users", 200),
                entry("GET", "http://localhost:8080/health", 200),
            ],
            config,
        );

        let paths = generated.spec["paths"].as_object().unwrap();
        assert!(paths.contains_key("/users"));
        assert!(paths.contains_key("/health"));
        assert_eq!(generated.spec["servers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn server_origin_keeps_explicit_ports_only() {
        let with_port = Url::parse("http://localhost:8080/health").unwrap();
        assert_eq!(
            server_from_url(&with_port).as_deref(),
            Some("http://localhost:8080")
        );

        let default_port = Url::parse("https://api.example.com:443/users").unwrap();
        assert_eq!(
            server_from_url(&default_port).as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn non_standard_methods_need_relaxing() {
        let entries = vec![entry("PROPFIND", "https://dav.example.com/files", 207)];

        let strict = generate(entries.clone(), defaults());
        assert_eq!(strict.spec["paths"], json!({}));

        let relaxed = generate(
            entries,
            GeneratorConfig {
                relaxed_methods: true,
                ..defaults()
            },
        );
        assert!(relaxed.spec["paths"]["/files"].get("propfind").is_some());
    }

    #[test]
    fn unsuccessful_responses_are_dropped_on_request() {
        let entries = vec![
            entry("GET", "https://api.example.com/missing", 404),
            entry("GET", "https://api.example.com/ok", 204),
        ];

        let dropped = generate(entries.clone(), defaults());
        assert!(dropped.spec["paths"].get("/missing").is_none());
        assert!(dropped.spec["paths"].get("/ok").is_some());

        let kept = generate(
            entries,
            GeneratorConfig {
                drop_paths_without_successful_response: false,
                ..defaults()
            },
        );
        assert!(kept.spec["paths"]["/missing"]["get"]["responses"].get("404").is_some());
    }

    #[test]
    fn id_segments_become_path_parameters() {
        let generated = generate(
            vec![entry(
                "GET",
                "https://api.example.com/users/42/orders/3f2b1c9e-8d7a-4b6c-9e5f-0a1b2c3d4e5f",
                200,
            )],
            defaults(),
        );

        let operation = &generated.spec["paths"]["/users/{param1}/orders/{param2}"]["get"];
        assert_eq!(operation["parameters"][0]["name"], "param1");
        assert_eq!(operation["parameters"][0]["in"], "path");
        assert_eq!(operation["parameters"][0]["schema"]["type"], "integer");
        assert_eq!(operation["parameters"][1]["schema"]["format"], "uuid");
    }

    #[test]
    fn literal_paths_without_parameterizing() {
        let generated = generate(
            vec![entry("GET", "https://api.example.com/users/42", 200)],
            GeneratorConfig {
                attempt_to_parameterize_url: false,
                ..defaults()
            },
        );
        assert!(generated.spec["paths"].get("/users/42").is_some());
    }

    #[test]
    fn query_and_header_parameters() {
        let mut sample = entry("GET", "https://api.example.com/search?q=rust&page=2", 200);
        sample["request"]["headers"] = json!([
            { "name": "User-Agent", "value": "curl/8.0" },
            { "name": "X-Tenant", "value": "acme" },
            { "name": ":authority", "value": "api.example.com" }
        ]);

        let filtered = generate(vec![sample.clone()], defaults());
        let names: Vec<&str> = filtered.spec["paths"]["/search"]["get"]["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|param| param["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["page", "q", "x-tenant"]);

        let unfiltered = generate(
            vec![sample],
            GeneratorConfig {
                filter_standard_headers: false,
                ..defaults()
            },
        );
        let count = unfiltered.spec["paths"]["/search"]["get"]["parameters"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(count, 4);
    }

    #[test]
    fn auth_headers_become_security_schemes() {
        let mut sample = entry("GET", "https://api.example.com/me", 200);
        sample["request"]["headers"] = json!([
            { "name": "Authorization", "value": "Bearer abc.def" },
            { "name": "X-API-Key", "value": "secret" }
        ]);

        let generated = generate(vec![sample.clone()], defaults());
        let schemes = &generated.spec["components"]["securitySchemes"];
        assert_eq!(schemes["bearerAuth"], json!({ "type": "http", "scheme": "bearer" }));
        assert_eq!(
            schemes["x-api-key"],
            json!({ "type": "apiKey", "in": "header", "name": "X-API-Key" })
        );
        assert_eq!(
            generated.spec["paths"]["/me"]["get"]["security"],
            json!([{ "bearerAuth": [] }, { "x-api-key": [] }])
        );

        let plain = generate(
            vec![sample],
            GeneratorConfig {
                guess_authentication_headers: false,
                ..defaults()
            },
        );
        assert!(plain.spec.get("components").is_none());
        assert_eq!(
            plain.spec["paths"]["/me"]["get"]["parameters"][0]["name"],
            "authorization"
        );
    }

    #[test]
    fn json_bodies_merge_into_one_schema() {
        let mut first = entry("POST", "https://api.example.com/items", 201);
        first["request"]["postData"] =
            json!({ "mimeType": "application/json", "text": "{\"name\":\"a\"}" });
        first["response"]["content"] =
            json!({ "mimeType": "application/json; charset=utf-8", "text": "{\"id\":1}" });
        let mut second = first.clone();
        second["response"]["content"]["text"] = json!("{\"id\":2,\"tags\":[]}");

        let generated = generate(vec![first, second], defaults());
        let operation = &generated.spec["paths"]["/items"]["post"];

        assert_eq!(
            operation["requestBody"]["content"]["application/json"]["schema"]["properties"]["name"]["type"],
            "string"
        );
        let response_schema = &operation["responses"]["201"]["content"]["application/json"]["schema"];
        assert_eq!(response_schema["properties"]["id"]["type"], "integer");
        assert_eq!(response_schema["properties"]["tags"]["type"], "array");
    }

    #[test]
    fn relaxed_parse_reads_mislabelled_json() {
        let mut sample = entry("GET", "https://api.example.com/legacy", 200);
        sample["response"]["content"] = json!({ "mimeType": "text/plain", "text": "{\"ok\":true}" });

        let relaxed = generate(vec![sample.clone()], defaults());
        let content = &relaxed.spec["paths"]["/legacy"]["get"]["responses"]["200"]["content"];
        assert_eq!(
            content["application/json"]["schema"]["properties"]["ok"]["type"],
            "boolean"
        );

        let strict = generate(
            vec![sample],
            GeneratorConfig {
                relaxed_content_type_json_parse: false,
                ..defaults()
            },
        );
        let content = &strict.spec["paths"]["/legacy"]["get"]["responses"]["200"]["content"];
        assert_eq!(content, &json!({ "text/plain": {} }));
    }

    #[test]
    fn servers_on_paths_when_requested() {
        let generated = generate(
            vec![entry("GET", "https://api.example.com:8443/v1/ping", 200)],
            GeneratorConfig {
                add_servers_to_paths: true,
                ..defaults()
            },
        );

        assert_eq!(
            generated.spec["paths"]["/v1/ping"]["servers"],
            json!([{ "url": "https://api.example.com:8443" }])
        );
    }

    #[test]
    fn unparsable_urls_are_skipped() {
        let generated = generate(
            vec![
                entry("GET", "not a url", 200),
                entry("GET", "https://api.example.com/ok", 200),
            ],
            defaults(),
        );

        assert_eq!(generated.domain.as_deref(), Some("api.example.com"));
        assert_eq!(generated.spec["paths"].as_object().unwrap().len(), 1);
    }
}
