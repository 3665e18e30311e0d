//! Module manifest validation and normalization.
//!
//! The definition block is checked against a fixed JSON Schema; callbacks and
//! skills are checked structurally. Every violation is collected before
//! failing, and defaults are only applied once the manifest is known good.

use std::sync::LazyLock;

use jsonschema::error::ValidationErrorKind;
use serde_json::{Value, json};

use modhost_protocols::module::{
    DEFAULT_MENU_ICON, ModuleDefinition, ModuleManifest, NormalizedManifest,
};
use modhost_protocols::{Skill, ValidationError, Violation};

use crate::merge::deep_merge;

/// Module names become directory names in the shared namespaces.
const MODULE_NAME_PATTERN: &str = "^[A-Za-z0-9][A-Za-z0-9._-]*$";

static DEFINITION_VALIDATOR: LazyLock<Result<jsonschema::Validator, String>> =
    LazyLock::new(|| jsonschema::Validator::new(&definition_schema()).map_err(|e| e.to_string()));

fn definition_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": { "type": "string", "minLength": 1, "pattern": MODULE_NAME_PATTERN },
            "fullName": { "type": "string" },
            "plugins": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["entry"],
                    "properties": {
                        "entry": { "type": "string", "minLength": 1 },
                        "position": { "type": "string" }
                    }
                }
            },
            "noInterface": { "type": "boolean" },
            "moduleView": {
                "type": "object",
                "properties": {
                    "stretched": { "type": "boolean" }
                }
            },
            "menuIcon": { "type": "string" },
            "menuText": { "type": "string" },
            "homepage": { "type": "string" }
        }
    })
}

/// Manifest validator.
pub struct ManifestValidator;

impl ManifestValidator {
    /// Validate a raw manifest and return it normalized.
    ///
    /// `name` is only used to label the error; the registry key comes from the
    /// validated definition.
    pub fn validate(
        manifest: &ModuleManifest,
        name: &str,
    ) -> Result<NormalizedManifest, ValidationError> {
        let mut violations = Self::definition_violations(&manifest.definition, name)?;

        if manifest.on_server_started.is_none() {
            violations.push(Violation::new("/onServerStarted", "callback is required"));
        }
        if manifest.on_server_ready.is_none() {
            violations.push(Violation::new("/onServerReady", "callback is required"));
        }

        for (index, skill) in manifest.skills.iter().enumerate() {
            if skill.id.trim().is_empty() {
                violations.push(Violation::new(
                    format!("/skills/{index}/id"),
                    "must be a non-empty string",
                ));
            }
            if skill.name.trim().is_empty() {
                violations.push(Violation::new(
                    format!("/skills/{index}/name"),
                    "must be a non-empty string",
                ));
            }
            if skill.flow_generator.is_none() {
                violations.push(Violation::new(
                    format!("/skills/{index}/flowGenerator"),
                    "flow generator is required",
                ));
            }
        }

        let (Some(on_server_started), Some(on_server_ready), true) = (
            manifest.on_server_started.clone(),
            manifest.on_server_ready.clone(),
            violations.is_empty(),
        ) else {
            return Err(ValidationError::new(name, violations));
        };

        let definition = Self::normalize_definition(&manifest.definition, name)?;
        let skills = manifest
            .skills
            .iter()
            .filter_map(|skill| {
                let generator = skill.flow_generator.clone()?;
                Some(Skill::new(skill.id.clone(), skill.name.clone(), generator))
            })
            .collect();

        Ok(NormalizedManifest {
            definition,
            on_server_started,
            on_server_ready,
            on_tenant_mount: manifest.on_tenant_mount.clone(),
            on_tenant_unmount: manifest.on_tenant_unmount.clone(),
            skills,
        })
    }

    fn definition_violations(
        definition: &Value,
        name: &str,
    ) -> Result<Vec<Violation>, ValidationError> {
        let validator = DEFINITION_VALIDATOR.as_ref().map_err(|e| {
            ValidationError::new(
                name,
                vec![Violation::new("", format!("invalid manifest schema: {e}"))],
            )
        })?;

        let violations = validator
            .iter_errors(definition)
            .map(|error| {
                let path = match &error.kind {
                    ValidationErrorKind::Required { property } => format!(
                        "{}/{}",
                        error.instance_path,
                        property.as_str().unwrap_or_default()
                    ),
                    _ => error.instance_path.to_string(),
                };
                Violation::new(path, error.to_string())
            })
            .collect();
        Ok(violations)
    }

    /// Deep-merge the defaults under the supplied definition.
    fn normalize_definition(
        definition: &Value,
        name: &str,
    ) -> Result<ModuleDefinition, ValidationError> {
        let declared = definition
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(name);
        let defaults = json!({
            "fullName": declared,
            "plugins": [],
            "noInterface": false,
            "moduleView": { "stretched": false },
            "menuIcon": DEFAULT_MENU_ICON,
            "menuText": declared,
        });

        serde_json::from_value(deep_merge(defaults, definition.clone())).map_err(|e| {
            ValidationError::new(name, vec![Violation::new("", e.to_string())])
        })
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
