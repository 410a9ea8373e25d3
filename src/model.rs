// Payload model - engine-owned data handed to the reporter with each event

use serde::{Deserialize, Serialize};

/// Collection descriptor for the run being executed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: Option<String>,
    pub id: Option<String>,
}

impl Collection {
    /// Create a named collection
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
        }
    }

    /// Identifying label: name, else id, else absent
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }
}

/// A single runnable item within the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outgoing request as rendered by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: String,
    /// Fully-rendered URL (variables already resolved)
    pub url: String,
}

/// Transfer size descriptor reported with a response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSize {
    pub header: Option<u64>,
    pub body: Option<u64>,
}

impl ResponseSize {
    /// Total transferred bytes, missing components count as zero
    pub fn total(&self) -> u64 {
        self.header.unwrap_or(0) + self.body.unwrap_or(0)
    }
}

/// Response received for a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub code: u16,
    pub reason: String,
    pub response_time_ms: u64,
    pub size: Option<ResponseSize>,
}

impl HttpResponse {
    /// Transferred size, zero when the size descriptor is absent
    pub fn transferred_size(&self) -> u64 {
        self.size.map(|s| s.total()).unwrap_or(0)
    }
}

/// Assertion outcome payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub description: String,
    pub skipped: bool,
}

impl Assertion {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            skipped: false,
        }
    }

    pub fn skipped(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            skipped: true,
        }
    }
}
