use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::SchemaError;

/// Size ceilings enforced during ingestion. A payload past any of these is
/// rejected before it ever reaches the graph builder.
pub const MAX_APPS: usize = 2000;
pub const MAX_MODELS_PER_APP: usize = 2000;
pub const MAX_FIELDS_PER_MODEL: usize = 2000;
pub const MAX_RELATIONSHIPS_PER_MODEL: usize = 2000;
pub const MAX_IDENTIFIER_LEN: usize = 500;

/// Insertion-ordered map, used everywhere the wire format's key order is
/// meaningful (app and model declaration order feed directly into column and
/// row tie-breaking downstream).
pub type OrderedMap<V> = IndexMap<String, V>;

#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    pub apps: OrderedMap<AppRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppRecord {
    #[serde(default)]
    pub verbose_name: String,
    pub models: OrderedMap<ModelRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelRecord {
    #[serde(default)]
    pub verbose_name: String,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub proxy: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub max_length: Option<i64>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub null: bool,
    #[serde(default)]
    pub db_index: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    ForeignKey,
    OneToOne,
    ManyToMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipDirection {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    pub direction: RelationshipDirection,
    pub target_app: String,
    pub target_model: String,
    #[serde(default)]
    pub on_delete: Option<String>,
}

/// Joins an app label and a model name into the node key used throughout the
/// graph and layout stages.
pub fn node_key(app: &str, model: &str) -> String {
    format!("{app}.{model}")
}

impl Schema {
    pub fn from_json(text: &str) -> Result<Schema, SchemaError> {
        let schema: Schema = serde_json::from_str(text)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Schema, SchemaError> {
        let text = fs::read_to_string(path)?;
        Schema::from_json(&text)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Schema, SchemaError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Schema::from_json(&text)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.apps.len() > MAX_APPS {
            return Err(SchemaError::TooManyApps(self.apps.len()));
        }
        for (app_label, app) in &self.apps {
            check_identifier(app_label)?;
            if app.models.len() > MAX_MODELS_PER_APP {
                return Err(SchemaError::TooManyModels {
                    app: app_label.clone(),
                    count: app.models.len(),
                });
            }
            for (model_name, model) in &app.models {
                check_identifier(model_name)?;
                let qualified = node_key(app_label, model_name);
                if model.fields.len() > MAX_FIELDS_PER_MODEL {
                    return Err(SchemaError::TooManyFields {
                        model: qualified.clone(),
                        count: model.fields.len(),
                    });
                }
                if model.relationships.len() > MAX_RELATIONSHIPS_PER_MODEL {
                    return Err(SchemaError::TooManyRelationships {
                        model: qualified,
                        count: model.relationships.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_identifier(id: &str) -> Result<(), SchemaError> {
    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(SchemaError::IdentifierTooLong(id.to_string()));
    }
    Ok(())
}
