//! The search tool definition and its parameter validation
//!
//! One [`ToolDefinition`] is built at startup and shared (behind an `Arc`)
//! by every adapter: MCP discovery and `GET /v1/tools` render it, and every
//! call goes through [`ToolDefinition::validate`].

use rmcp::model::Tool;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::GatewayError;
use crate::types::SearchQuery;

/// Raw tool arguments as they arrive from any transport
pub type JsonObject = serde_json::Map<String, Value>;

/// Name under which the search capability is registered
pub const TOOL_NAME: &str = "search_searxng";

/// Upper bound for `number_results`
pub const MAX_RESULTS: usize = 100;

/// Upper bound, in seconds, for a per-call `timeout`
pub const MAX_TIMEOUT_SECS: f64 = 300.0;

/// At most this many engine filters per call
pub const MAX_FILTERS: usize = 16;
pub const MAX_FILTER_KEY_LEN: usize = 64;
pub const MAX_FILTER_VALUE_LEN: usize = 512;

const TERM: &str = "term";
const NUMBER_RESULTS: &str = "number_results";
const TIMEOUT: &str = "timeout";

/// JSON type of a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
}

/// One declared parameter of the tool
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: &'static str,
}

/// Declarative description of the search capability
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
}

impl ToolDefinition {
    /// The SearXNG search tool; `default_results` is the declared default
    /// for `number_results`.
    pub fn searxng(default_results: usize) -> Self {
        Self {
            name: TOOL_NAME.to_string(),
            description: "Search SearXNG for a query. Returns an ordered list of results, \
                          each with 'title', 'url' and 'snippet'. Extra string, number or \
                          boolean arguments (e.g. 'language', 'categories', 'time_range', \
                          'engines') are passed to SearXNG unchanged."
                .to_string(),
            parameters: vec![
                ParameterSpec {
                    name: TERM,
                    kind: ParamType::String,
                    required: true,
                    default: None,
                    description: "The search query.",
                },
                ParameterSpec {
                    name: NUMBER_RESULTS,
                    kind: ParamType::Integer,
                    required: false,
                    default: Some(Value::from(default_results)),
                    description: "The maximum number of results to return (1-100).",
                },
                ParameterSpec {
                    name: TIMEOUT,
                    kind: ParamType::Number,
                    required: false,
                    default: None,
                    description: "Optional timeout override in seconds (at most 300).",
                },
            ],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    fn is_declared(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Validate raw arguments into a [`SearchQuery`].
    ///
    /// Pure: the same input always yields the same query or the same error.
    pub fn validate(&self, raw: &JsonObject) -> Result<SearchQuery, GatewayError> {
        let mut resolved: BTreeMap<&str, Value> = BTreeMap::new();

        for param in &self.parameters {
            // null counts as "not supplied"
            let supplied = raw.get(param.name).filter(|v| !v.is_null());
            match (supplied, &param.default) {
                (Some(value), _) => {
                    resolved.insert(param.name, coerce(param, value)?);
                }
                (None, Some(default)) => {
                    resolved.insert(param.name, default.clone());
                }
                (None, None) if param.required => {
                    return Err(GatewayError::invalid(format!(
                        "missing required parameter `{}`",
                        param.name
                    )));
                }
                (None, None) => {}
            }
        }

        let term = resolved
            .get(TERM)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if term.is_empty() {
            return Err(GatewayError::invalid("`term` must not be empty"));
        }

        let number_results = resolved
            .get(NUMBER_RESULTS)
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(0);
        if !(1..=MAX_RESULTS).contains(&number_results) {
            return Err(GatewayError::invalid(format!(
                "`number_results` must be between 1 and {}",
                MAX_RESULTS
            )));
        }

        let timeout = match resolved.get(TIMEOUT).and_then(Value::as_f64) {
            Some(secs) if secs > 0.0 && secs <= MAX_TIMEOUT_SECS => {
                Some(Duration::from_secs_f64(secs))
            }
            Some(_) => {
                return Err(GatewayError::invalid(format!(
                    "`timeout` must be a positive number of seconds, at most {}",
                    MAX_TIMEOUT_SECS
                )))
            }
            None => None,
        };

        let filters = self.collect_filters(raw)?;

        Ok(SearchQuery {
            term,
            number_results,
            timeout,
            filters,
        })
    }

    /// Undeclared arguments are engine filters; only size and type are checked.
    fn collect_filters(&self, raw: &JsonObject) -> Result<BTreeMap<String, String>, GatewayError> {
        let mut filters = BTreeMap::new();

        for (key, value) in raw.iter().filter(|(k, _)| !self.is_declared(k)) {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(GatewayError::invalid(format!(
                        "filter `{}` must be a string, number or boolean",
                        key
                    )))
                }
            };

            if key.len() > MAX_FILTER_KEY_LEN {
                return Err(GatewayError::invalid(format!(
                    "filter names are limited to {} bytes",
                    MAX_FILTER_KEY_LEN
                )));
            }
            if value.len() > MAX_FILTER_VALUE_LEN {
                return Err(GatewayError::invalid(format!(
                    "filter `{}` exceeds {} bytes",
                    key, MAX_FILTER_VALUE_LEN
                )));
            }

            filters.insert(key.clone(), value);
        }

        if filters.len() > MAX_FILTERS {
            return Err(GatewayError::invalid(format!(
                "at most {} filters are accepted",
                MAX_FILTERS
            )));
        }

        Ok(filters)
    }

    /// JSON Schema for the tool arguments
    pub fn input_schema(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut property = json!({
                "type": param.kind,
                "description": param.description,
            });
            if let Some(default) = &param.default {
                property["default"] = default.clone();
            }
            properties.insert(param.name.to_string(), property);

            if param.required {
                required.push(Value::from(param.name));
            }
        }

        let mut schema = JsonObject::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        schema.insert(
            "additionalProperties".into(),
            json!({ "type": ["string", "number", "boolean"] }),
        );
        schema
    }

    /// Render as an MCP tool entry for `tools/list`
    pub fn to_mcp_tool(&self) -> Tool {
        Tool::new(
            self.name.clone(),
            self.description.clone(),
            Arc::new(self.input_schema()),
        )
    }
}

/// Basic type coercion for a declared parameter
fn coerce(param: &ParameterSpec, value: &Value) -> Result<Value, GatewayError> {
    let type_error = || {
        GatewayError::invalid(format!(
            "`{}` must be of type {}",
            param.name,
            match param.kind {
                ParamType::String => "string",
                ParamType::Integer => "integer",
                ParamType::Number => "number",
            }
        ))
    };

    match param.kind {
        ParamType::String => match value {
            Value::String(s) => Ok(Value::from(s.trim())),
            _ => Err(type_error()),
        },
        ParamType::Integer => {
            let n = match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            // Negative values clamp to 0, which the range check rejects.
            n.map(|n| Value::from(n.max(0) as u64)).ok_or_else(type_error)
        }
        ParamType::Number => {
            let n = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            n.filter(|f| f.is_finite())
                .map(Value::from)
                .ok_or_else(type_error)
        }
    }
}
