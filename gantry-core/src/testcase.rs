//! Benchmark test cases
//!
//! The suite is a declarative table: each case carries its HTTP method, a
//! path template, a tagged payload strategy and the execution phase it
//! belongs to. Engines interpret the strategy uniformly instead of
//! branching on case names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// HTTP methods used by the benchmark suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Get the string representation of the HTTP method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether requests with this method mutate server-side state.
    ///
    /// The external load engine generates a request-templating script for
    /// exactly these methods.
    pub fn mutates_state(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(MethodError::InvalidMethod(s.to_string())),
        }
    }
}

/// Errors that can occur when parsing HTTP methods
#[derive(Error, Debug, Clone)]
pub enum MethodError {
    #[error("Invalid HTTP method: '{0}'. Supported methods are: GET, POST, PUT, DELETE")]
    InvalidMethod(String),
}

/// How the request body for a case is produced
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadStrategy {
    /// No request body
    None,
    /// A fixed JSON value sent unchanged on every request
    Static(serde_json::Value),
    /// One pseudo-random corpus record per request
    FromCorpus,
    /// A minimal randomized field value synthesized per request
    SyntheticMutation,
}

/// Where a case sits in the per-service execution order.
///
/// `Stateless` cases run before seeding, `Seeded` cases require a freshly
/// seeded store, and the `Destructive` case runs strictly last so the rows
/// it removes are never missed by the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    Stateless,
    Seeded,
    Destructive,
}

/// One cell of the benchmark matrix for a given service
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Display name, used as `test_type` in the results table
    pub name: &'static str,
    pub method: Method,
    /// Request path, optionally containing an `{id}` placeholder
    pub path_template: &'static str,
    pub payload: PayloadStrategy,
    pub phase: TestPhase,
}

impl TestCase {
    /// The full benchmark suite, in declaration order.
    pub fn suite() -> Vec<TestCase> {
        vec![
            TestCase {
                name: "PlainText",
                method: Method::Get,
                path_template: "/plain-text",
                payload: PayloadStrategy::None,
                phase: TestPhase::Stateless,
            },
            TestCase {
                name: "JSON Echo",
                method: Method::Get,
                path_template: "/json",
                payload: PayloadStrategy::None,
                phase: TestPhase::Stateless,
            },
            TestCase {
                name: "Create Product",
                method: Method::Post,
                path_template: "/products",
                payload: PayloadStrategy::FromCorpus,
                phase: TestPhase::Stateless,
            },
            TestCase {
                name: "Get Product",
                method: Method::Get,
                path_template: "/products/{id}",
                payload: PayloadStrategy::None,
                phase: TestPhase::Seeded,
            },
            TestCase {
                name: "List Products",
                method: Method::Get,
                path_template: "/products",
                payload: PayloadStrategy::None,
                phase: TestPhase::Seeded,
            },
            TestCase {
                name: "Update Product",
                method: Method::Put,
                path_template: "/products/{id}",
                payload: PayloadStrategy::SyntheticMutation,
                phase: TestPhase::Seeded,
            },
            TestCase {
                name: "Fortune 100",
                method: Method::Get,
                path_template: "/fortune",
                payload: PayloadStrategy::None,
                phase: TestPhase::Seeded,
            },
            TestCase {
                name: "Delete Product",
                method: Method::Delete,
                path_template: "/products/{id}",
                payload: PayloadStrategy::None,
                phase: TestPhase::Destructive,
            },
        ]
    }

    /// Whether the path template carries an `{id}` placeholder
    pub fn has_id_placeholder(&self) -> bool {
        self.path_template.contains("{id}")
    }
}
