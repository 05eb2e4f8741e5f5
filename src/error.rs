use std::fmt;

/// Failures raised while turning wire JSON into a [`crate::model::Schema`].
///
/// Everything past ingestion is defensive rather than fallible: unknown
/// relationship targets are dropped, missing fields fall back to a midpoint
/// anchor, and so on. Ingestion is the one boundary that actually raises,
/// because a malformed or oversized payload is not something the layout
/// engine can silently route around.
#[derive(Debug)]
pub enum SchemaError {
    Malformed(serde_json::Error),
    Io(std::io::Error),
    TooManyApps(usize),
    TooManyModels { app: String, count: usize },
    TooManyFields { model: String, count: usize },
    TooManyRelationships { model: String, count: usize },
    IdentifierTooLong(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaError::Malformed(e) => write!(f, "malformed schema JSON: {}", e),
            SchemaError::Io(e) => write!(f, "could not read schema: {}", e),
            SchemaError::TooManyApps(n) => write!(f, "too many apps: {} (max {})", n, super::model::MAX_APPS),
            SchemaError::TooManyModels { app, count } => write!(
                f,
                "too many models in app '{}': {} (max {})",
                app, count, super::model::MAX_MODELS_PER_APP
            ),
            SchemaError::TooManyFields { model, count } => write!(
                f,
                "too many fields in model '{}': {} (max {})",
                model, count, super::model::MAX_FIELDS_PER_MODEL
            ),
            SchemaError::TooManyRelationships { model, count } => write!(
                f,
                "too many relationships in model '{}': {} (max {})",
                model, count, super::model::MAX_RELATIONSHIPS_PER_MODEL
            ),
            SchemaError::IdentifierTooLong(id) => {
                let cut = id.char_indices().nth(40).map(|(i, _)| i).unwrap_or(id.len());
                write!(f, "identifier too long: '{}...'", &id[..cut])
            }
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Malformed(e)
    }
}

impl From<std::io::Error> for SchemaError {
    fn from(e: std::io::Error) -> Self {
        SchemaError::Io(e)
    }
}

/// Raised only in the one genuinely degenerate case the router cannot route
/// around at all: being asked to lay out a graph with no nodes in it where a
/// route was nonetheless requested. Ordinary missing bounds, missing fields,
/// and cyclic graphs are all handled defensively and never reach this.
#[derive(Debug)]
pub enum LayoutError {
    EmptyGraph,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutError::EmptyGraph => write!(f, "cannot route edges over an empty graph"),
        }
    }
}

impl std::error::Error for LayoutError {}
