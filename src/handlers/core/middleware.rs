//! Command middleware: guards and observers around every execution.
//!
//! Middleware is declared in configuration and built by providers that
//! plugins register under an id. A declaration either names templates
//! (`"admin, cooldown"`) or lists inline objects that may pull templates in
//! through a `Template` field:
//!
//! ```toml
//! [commands.help]
//! middleware = [{ Template = "cooldown", Seconds = 5 }]
//! ```
//!
//! # Merging
//!
//! A template is merged underneath the inline object in two levels: missing
//! top-level keys are copied, and where both sides hold an object the
//! missing nested keys are copied too. Inline values always win.

use super::context::{CommandContext, CommandOutcome};
use crate::config::MiddlewareSpec;
use crate::error::MiddlewareError;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Key naming the provider inside a template.
pub const PROVIDER_KEY: &str = "Id";

/// Key pulling templates into an inline declaration.
pub const TEMPLATE_KEY: &str = "Template";

/// A middleware declaration body.
pub type Template = serde_json::Map<String, serde_json::Value>;

/// Result of a `before` guard. Either way the message is shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow(Option<String>),
    Deny(Option<String>),
}

impl Verdict {
    pub fn allow() -> Self {
        Self::Allow(None)
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self::Deny(Some(message.into()))
    }
}

/// Hooks around command execution. Every hook has a permissive default.
pub trait Middleware: Send + Sync {
    /// Whether the command may be listed to this caller (help, suggestions).
    fn can_suggest(&self, _ctx: &CommandContext<'_>) -> bool {
        true
    }

    /// Runs before argument binding; `Deny` stops the execution.
    fn before(&self, _ctx: &mut CommandContext<'_>) -> Verdict {
        Verdict::allow()
    }

    /// Runs after a successful invocation.
    fn after(&self, _ctx: &mut CommandContext<'_>, _outcome: CommandOutcome) {}
}

/// Builds middleware instances from merged templates.
pub trait MiddlewareProvider: Send + Sync {
    fn create(&self, template: &Template) -> Result<Arc<dyn Middleware>, MiddlewareError>;
}

impl<F> MiddlewareProvider for F
where
    F: Fn(&Template) -> Result<Arc<dyn Middleware>, MiddlewareError> + Send + Sync,
{
    fn create(&self, template: &Template) -> Result<Arc<dyn Middleware>, MiddlewareError> {
        self(template)
    }
}

/// Providers by id. Registration is last-write-wins.
#[derive(Default)]
pub struct MiddlewareRegistry {
    providers: HashMap<String, Arc<dyn MiddlewareProvider>>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, returning the one it replaced.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        provider: Arc<dyn MiddlewareProvider>,
    ) -> Option<Arc<dyn MiddlewareProvider>> {
        self.providers.insert(id.into(), provider)
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        self.providers.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn MiddlewareProvider>> {
        self.providers.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Build one instance from a fully merged template.
    pub fn instantiate(
        &self,
        origin: &str,
        template: &Template,
    ) -> Result<Arc<dyn Middleware>, MiddlewareError> {
        let id = provider_id(template).ok_or_else(|| MiddlewareError::MissingProviderId {
            origin: origin.to_string(),
        })?;
        let provider = self
            .get(id)
            .ok_or_else(|| MiddlewareError::UnknownProvider(id.to_string()))?;
        provider.create(template)
    }

    /// Resolve a declaration into instances, in declaration order.
    pub fn resolve(
        &self,
        spec: &MiddlewareSpec,
        templates: &BTreeMap<String, Template>,
    ) -> Result<Vec<Arc<dyn Middleware>>, MiddlewareError> {
        match spec {
            MiddlewareSpec::Templates(names) => split_names(names)
                .map(|name| {
                    let template = templates
                        .get(name)
                        .ok_or_else(|| MiddlewareError::UnknownTemplate(name.to_string()))?;
                    self.instantiate(&format!("template {:?}", name), template)
                })
                .collect(),
            MiddlewareSpec::Inline(objects) => objects
                .iter()
                .enumerate()
                .map(|(i, object)| {
                    let origin = format!("inline entry {}", i);
                    let merged = expand_inline(&origin, object, templates)?;
                    self.instantiate(&origin, &merged)
                })
                .collect(),
        }
    }
}

/// The provider id a template names, if it is a string.
pub fn provider_id(template: &Template) -> Option<&str> {
    template.get(PROVIDER_KEY).and_then(serde_json::Value::as_str)
}

/// Split a `"a, b"` list, dropping blanks.
fn split_names(names: &str) -> impl Iterator<Item = &str> {
    names.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Merge every template an inline object names underneath it.
///
/// The `Template` key is consumed; it must hold a `"a, b"` name list.
/// `origin` names the entry in errors.
pub fn expand_inline(
    origin: &str,
    object: &Template,
    templates: &BTreeMap<String, Template>,
) -> Result<Template, MiddlewareError> {
    let mut merged = object.clone();
    let names = match merged.remove(TEMPLATE_KEY) {
        None => return Ok(merged),
        Some(serde_json::Value::String(names)) => names,
        Some(_) => {
            return Err(MiddlewareError::InvalidTemplateRef {
                origin: origin.to_string(),
            })
        }
    };

    for name in split_names(&names) {
        let template = templates
            .get(name)
            .ok_or_else(|| MiddlewareError::UnknownTemplate(name.to_string()))?;
        merge_template(&mut merged, template);
    }
    Ok(merged)
}

/// Two-level merge of `template` underneath `target`.
pub fn merge_template(target: &mut Template, template: &Template) {
    for (key, value) in template {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), value.clone());
            }
            Some(serde_json::Value::Object(inner)) => {
                if let serde_json::Value::Object(source) = value {
                    for (k, v) in source {
                        if !inner.contains_key(k) {
                            inner.insert(k.clone(), v.clone());
                        }
                    }
                }
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    impl std::fmt::Debug for dyn Middleware {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("dyn Middleware")
        }
    }

    fn obj(value: serde_json::Value) -> Template {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    struct Tagged(String);

    impl Middleware for Tagged {
        fn before(&self, _ctx: &mut CommandContext<'_>) -> Verdict {
            Verdict::Allow(Some(self.0.clone()))
        }
    }

    fn registry() -> MiddlewareRegistry {
        let mut reg = MiddlewareRegistry::new();
        let provider = |t: &Template| -> Result<Arc<dyn Middleware>, MiddlewareError> {
            let tag = t.get("Tag").and_then(|v| v.as_str()).unwrap_or("none");
            Ok(Arc::new(Tagged(tag.to_string())))
        };
        reg.register("tagged", Arc::new(provider));
        reg
    }

    #[test]
    fn test_merge_inline_wins() {
        let mut target = obj(json!({"Id": "a", "Seconds": 5}));
        merge_template(&mut target, &obj(json!({"Id": "b", "Seconds": 10, "Scope": "user"})));
        assert_eq!(target["Id"], "a");
        assert_eq!(target["Seconds"], 5);
        assert_eq!(target["Scope"], "user");
    }

    #[test]
    fn test_merge_nested_one_level() {
        let mut target = obj(json!({"Limits": {"Chat": 1}}));
        merge_template(
            &mut target,
            &obj(json!({"Limits": {"Chat": 9, "Rcon": 2, "Deep": {"X": 1}}})),
        );
        assert_eq!(target["Limits"]["Chat"], 1);
        assert_eq!(target["Limits"]["Rcon"], 2);
        assert_eq!(target["Limits"]["Deep"]["X"], 1);
    }

    #[test]
    fn test_merge_scalar_not_replaced_by_object() {
        let mut target = obj(json!({"Limits": 3}));
        merge_template(&mut target, &obj(json!({"Limits": {"Chat": 1}})));
        assert_eq!(target["Limits"], 3);
    }

    #[test]
    fn test_expand_inline_consumes_template_key() {
        let mut templates = BTreeMap::new();
        templates.insert("base".to_string(), obj(json!({"Id": "tagged", "Tag": "base"})));
        templates.insert("extra".to_string(), obj(json!({"Tag": "extra", "More": true})));

        let object = obj(json!({"Template": "base, extra"}));
        let merged = expand_inline("inline entry 0", &object, &templates).unwrap();
        assert!(!merged.contains_key(TEMPLATE_KEY));
        assert_eq!(merged["Id"], "tagged");
        assert_eq!(merged["Tag"], "base");
        assert_eq!(merged["More"], true);
    }

    #[test]
    fn test_expand_inline_unknown_template() {
        let object = obj(json!({"Template": "nope"}));
        let err = expand_inline("inline entry 0", &object, &BTreeMap::new()).unwrap_err();
        assert_eq!(err, MiddlewareError::UnknownTemplate("nope".into()));
    }

    #[test]
    fn test_expand_inline_rejects_non_string_template() {
        let mut templates = BTreeMap::new();
        templates.insert("base".to_string(), obj(json!({"Id": "tagged"})));

        let object = obj(json!({"Template": ["base"], "Id": "tagged"}));
        let err = expand_inline("inline entry 2", &object, &templates).unwrap_err();
        assert_eq!(
            err,
            MiddlewareError::InvalidTemplateRef {
                origin: "inline entry 2".into()
            }
        );
    }

    #[test]
    fn test_resolve_shorthand() {
        let mut templates = BTreeMap::new();
        templates.insert("a".to_string(), obj(json!({"Id": "tagged", "Tag": "A"})));
        templates.insert("b".to_string(), obj(json!({"Id": "tagged", "Tag": "B"})));

        let built = registry()
            .resolve(&MiddlewareSpec::Templates(" a ,b".into()), &templates)
            .unwrap();
        assert_eq!(built.len(), 2);
    }

    #[test]
    fn test_resolve_shorthand_requires_id() {
        let mut templates = BTreeMap::new();
        templates.insert("noid".to_string(), obj(json!({"Tag": "A"})));

        let err = registry()
            .resolve(&MiddlewareSpec::Templates("noid".into()), &templates)
            .unwrap_err();
        assert!(matches!(err, MiddlewareError::MissingProviderId { .. }));
    }

    #[test]
    fn test_resolve_unknown_provider() {
        let err = registry()
            .resolve(
                &MiddlewareSpec::Inline(vec![obj(json!({"Id": "ghost"}))]),
                &BTreeMap::new(),
            )
            .unwrap_err();
        assert_eq!(err, MiddlewareError::UnknownProvider("ghost".into()));
    }

    #[test]
    fn test_provider_error_propagates() {
        let mut reg = MiddlewareRegistry::new();
        let failing = |_: &Template| -> Result<Arc<dyn Middleware>, MiddlewareError> {
            Err(MiddlewareError::provider("strict", "Seconds is required"))
        };
        reg.register("strict", Arc::new(failing));

        let err = reg
            .resolve(
                &MiddlewareSpec::Inline(vec![obj(json!({"Id": "strict"}))]),
                &BTreeMap::new(),
            )
            .unwrap_err();
        assert!(matches!(err, MiddlewareError::Provider { ref id, .. } if id == "strict"));
    }

    #[test]
    fn test_register_replaces() {
        let mut reg = registry();
        let replacement = |_: &Template| -> Result<Arc<dyn Middleware>, MiddlewareError> {
            Ok(Arc::new(Tagged("new".into())))
        };
        assert!(reg.register("tagged", Arc::new(replacement)).is_some());
        assert_eq!(reg.len(), 1);
        assert!(reg.unregister("tagged"));
        assert!(!reg.unregister("tagged"));
        assert!(reg.is_empty());
    }
}
