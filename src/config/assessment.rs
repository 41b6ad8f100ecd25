//! Assessment questionnaire source

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::assessment::{CatalogError, QuestionCatalog};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentConfig {
    /// YAML question list replacing the built-in catalog
    pub catalog_path: Option<PathBuf>,
}

impl AssessmentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.catalog_path {
            Some(path) if !path.is_file() => {
                Err(ValidationError::CatalogNotFound(path.display().to_string()))
            }
            _ => Ok(()),
        }
    }

    /// The configured catalog, or the standard questionnaire.
    pub fn load_catalog(&self) -> Result<QuestionCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => QuestionCatalog::from_yaml_file(path),
            None => Ok(QuestionCatalog::standard()),
        }
    }
}
