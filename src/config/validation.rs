//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::{CommandDeclaration, Config, MiddlewareSpec};
use crate::handlers::core::middleware::{TEMPLATE_KEY, provider_id};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("middleware template {0:?} must carry a string \"Id\"")]
    MissingTemplateId(String),
    #[error("middleware template {0:?} must not contain a nested \"Template\"")]
    NestedTemplate(String),
    #[error("command {command:?} refers to unknown middleware template {template:?}")]
    UnknownTemplate { command: String, template: String },
    #[error("command {command:?} middleware entry {entry} has a non-string \"Template\"")]
    InvalidTemplateRef { command: String, entry: usize },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, template) in &config.middleware_templates {
        if provider_id(template).is_none() {
            errors.push(ValidationError::MissingTemplateId(name.clone()));
        }
        if template.contains_key(TEMPLATE_KEY) {
            errors.push(ValidationError::NestedTemplate(name.clone()));
        }
    }

    let builtins = [
        ("help", &config.commands.help),
        ("test1", &config.commands.test1),
        ("test2", &config.commands.test2),
    ];
    let declarations = builtins
        .into_iter()
        .filter_map(|(id, decl)| decl.as_ref().map(|d| (id, d)))
        .chain(config.info_commands.iter().map(|(id, d)| (id.as_str(), d)));

    for (id, decl) in declarations {
        if let Some(MiddlewareSpec::Inline(ref objects)) = decl.middleware {
            for (entry, object) in objects.iter().enumerate() {
                if object.get(TEMPLATE_KEY).is_some_and(|v| !v.is_string()) {
                    errors.push(ValidationError::InvalidTemplateRef {
                        command: id.to_string(),
                        entry,
                    });
                }
            }
        }
        for template in referenced_templates(decl) {
            if !config.middleware_templates.contains_key(template) {
                errors.push(ValidationError::UnknownTemplate {
                    command: id.to_string(),
                    template: template.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every template name a declaration mentions, shorthand or inline.
fn referenced_templates(decl: &CommandDeclaration) -> Vec<&str> {
    let names: Vec<&str> = match decl.middleware {
        None => Vec::new(),
        Some(MiddlewareSpec::Templates(ref names)) => vec![names.as_str()],
        Some(MiddlewareSpec::Inline(ref objects)) => objects
            .iter()
            .filter_map(|o| o.get(TEMPLATE_KEY).and_then(serde_json::Value::as_str))
            .collect(),
    };

    names
        .into_iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
