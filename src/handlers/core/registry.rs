//! Command registry and resolution.
//!
//! The `CommandRegistry` groups commands by plugin namespace, resolves
//! parsed input to candidates (exact alias matches first, near misses by
//! normalized edit distance otherwise) and keeps per-command usage counters.

use super::context::{CommandContext, Environment};
use super::middleware::Middleware;
use super::traits::{CommandDescriptor, Handler, Parameter, ParameterKind};
use crate::config::PluginAliases;
use crate::error::RegistrationError;
use chatcmd_syntax::{eq_ignore_case, fold_case, normalized_levenshtein, ParsedCommand};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Aliases farther than this from the query are not suggested.
pub const MAX_SIMILARITY_DISTANCE: f64 = 0.5;

/// A registered command.
pub struct Command {
    pub id: String,
    pub handler: Handler,
    pub parameters: Vec<Parameter>,
    /// Case-insensitively unique, in declaration order. Empty means the
    /// command is internal: never resolved, never suggested.
    pub aliases: Vec<String>,
    pub environments: Vec<Environment>,
    pub middleware: Vec<Arc<dyn Middleware>>,
    /// Usage counter for statistics.
    invocations: AtomicU64,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("aliases", &self.aliases)
            .field("environments", &self.environments)
            .field("parameters", &self.parameters.len())
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl TryFrom<CommandDescriptor> for Command {
    type Error = RegistrationError;

    fn try_from(descriptor: CommandDescriptor) -> Result<Self, Self::Error> {
        let CommandDescriptor {
            id,
            handler,
            parameters,
            aliases,
            environments,
            middleware,
        } = descriptor;

        if id.trim().is_empty() {
            return Err(RegistrationError::EmptyId);
        }
        if environments.is_empty() {
            return Err(RegistrationError::NoEnvironments(id));
        }

        let mut seen_optional = false;
        let mut names = HashSet::new();
        for p in &parameters {
            if !names.insert(fold_case(&p.name)) {
                return Err(RegistrationError::DuplicateParameter {
                    id,
                    parameter: p.name.clone(),
                });
            }
            match p.kind {
                ParameterKind::Required if seen_optional => {
                    return Err(RegistrationError::RequiredAfterOptional {
                        id,
                        parameter: p.name.clone(),
                    });
                }
                ParameterKind::Required => {}
                ParameterKind::Optional | ParameterKind::Default(_) => seen_optional = true,
            }
        }

        let mut unique = Vec::with_capacity(aliases.len());
        let mut folded = HashSet::new();
        for alias in aliases {
            let alias = alias.trim().to_string();
            if !alias.is_empty() && folded.insert(fold_case(&alias)) {
                unique.push(alias);
            }
        }

        let mut envs = Vec::with_capacity(environments.len());
        for env in environments {
            if !envs.contains(&env) {
                envs.push(env);
            }
        }

        Ok(Self {
            id,
            handler,
            parameters,
            aliases: unique,
            environments: envs,
            middleware,
            invocations: AtomicU64::new(0),
        })
    }
}

impl Command {
    pub fn supports(&self, environment: Environment) -> bool {
        self.environments.contains(&environment)
    }

    /// The alias shown in signatures.
    pub fn primary_alias(&self) -> Option<&str> {
        self.aliases.first().map(String::as_str)
    }

    /// Whether the command may be listed to the caller in `ctx`. A
    /// middleware that panics here hides the command.
    pub fn can_suggest(&self, ctx: &CommandContext<'_>) -> bool {
        !self.aliases.is_empty()
            && self.supports(ctx.environment)
            && self.middleware.iter().all(|mw| {
                panic::catch_unwind(AssertUnwindSafe(|| mw.can_suggest(ctx))).unwrap_or_else(|_| {
                    warn!(command = %self.id, "Middleware panicked while checking visibility");
                    false
                })
            })
    }

    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    pub(crate) fn record_invocation(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }
}

/// Identifies one registered command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandLookup {
    pub namespace: String,
    pub id: String,
}

impl CommandLookup {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CommandLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.id)
    }
}

/// Candidates for one parsed command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Commands with an alias equal to the typed name.
    pub exact: Vec<CommandLookup>,
    /// Near-miss aliases per namespace, closest first.
    pub similar: BTreeMap<String, Vec<String>>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.similar.is_empty()
    }
}

/// Outcome of scanning a single namespace.
enum NamespaceMatch {
    Exact(CommandLookup),
    Similar(Vec<String>),
}

/// Registry of commands, grouped by namespace.
///
/// Namespaces iterate in sorted order so resolution is deterministic.
/// Empty namespaces are removed.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    namespaces: BTreeMap<String, Vec<Arc<Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command, replacing any command with the same id in place.
    pub fn register(&mut self, namespace: &str, command: Command) -> Option<Arc<Command>> {
        let commands = self.namespaces.entry(namespace.to_string()).or_default();
        let command = Arc::new(command);
        match commands.iter_mut().find(|c| c.id == command.id) {
            Some(slot) => Some(std::mem::replace(slot, command)),
            None => {
                commands.push(command);
                None
            }
        }
    }

    pub fn unregister(&mut self, namespace: &str, id: &str) -> bool {
        let Some(commands) = self.namespaces.get_mut(namespace) else {
            return false;
        };
        let before = commands.len();
        commands.retain(|c| c.id != id);
        let removed = commands.len() != before;
        if commands.is_empty() {
            self.namespaces.remove(namespace);
        }
        removed
    }

    pub fn get(&self, lookup: &CommandLookup) -> Option<Arc<Command>> {
        self.namespaces
            .get(&lookup.namespace)?
            .iter()
            .find(|c| c.id == lookup.id)
            .cloned()
    }

    pub fn namespace(&self, namespace: &str) -> Option<&[Arc<Command>]> {
        self.namespaces.get(namespace).map(Vec::as_slice)
    }

    /// Clone every namespace's command list, so callers can release the lock.
    pub fn snapshot(&self) -> Vec<(String, Vec<Arc<Command>>)> {
        self.namespaces
            .iter()
            .map(|(ns, commands)| (ns.clone(), commands.clone()))
            .collect()
    }

    /// Total number of commands.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Usage counts of every command that ran at least once, busiest first.
    pub fn stats(&self) -> Vec<(CommandLookup, u64)> {
        let mut stats: Vec<_> = self
            .namespaces
            .iter()
            .flat_map(|(ns, commands)| {
                commands
                    .iter()
                    .map(move |c| (CommandLookup::new(ns.as_str(), c.id.as_str()), c.invocations()))
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }

    /// Find the namespace a qualifier refers to: a namespace name first, then
    /// a configured namespace alias. The namespace must own a command.
    pub fn find_namespace(&self, query: &str, aliases: &PluginAliases) -> Option<String> {
        if let Some(ns) = self.namespaces.keys().find(|ns| eq_ignore_case(ns, query)) {
            return Some(ns.clone());
        }

        aliases
            .iter()
            .filter(|(ns, _)| self.namespaces.contains_key(ns.as_str()))
            .find(|(_, list)| list.iter().any(|a| eq_ignore_case(a, query)))
            .map(|(ns, _)| ns.clone())
    }

    /// Resolve a parsed command to candidates. Never fails.
    ///
    /// A qualified query searches the named namespace first; an exact match
    /// there is returned alone. Otherwise its near misses are kept and the
    /// remaining namespaces are searched as for an unqualified query.
    pub fn resolve(
        &self,
        environment: Environment,
        parsed: &ParsedCommand,
        aliases: &PluginAliases,
    ) -> Resolution {
        let mut resolution = Resolution::default();
        let query = fold_case(&parsed.name);

        let preferred = parsed
            .namespace
            .as_deref()
            .and_then(|q| self.find_namespace(q, aliases));

        if let Some(ref ns) = preferred {
            match self.scan(ns, environment, &query) {
                Some(NamespaceMatch::Exact(lookup)) => {
                    resolution.exact.push(lookup);
                    return resolution;
                }
                Some(NamespaceMatch::Similar(near)) if !near.is_empty() => {
                    resolution.similar.insert(ns.clone(), near);
                }
                _ => {}
            }
        }

        for ns in self.namespaces.keys() {
            if preferred.as_ref() == Some(ns) {
                continue;
            }
            match self.scan(ns, environment, &query) {
                Some(NamespaceMatch::Exact(lookup)) => resolution.exact.push(lookup),
                Some(NamespaceMatch::Similar(near)) if !near.is_empty() => {
                    resolution.similar.insert(ns.clone(), near);
                }
                _ => {}
            }
        }

        resolution
    }

    /// Scan one namespace for `query` (already case-folded).
    fn scan(&self, namespace: &str, environment: Environment, query: &str) -> Option<NamespaceMatch> {
        let commands = self.namespaces.get(namespace)?;
        let mut near: Vec<(&str, f64)> = Vec::new();

        for command in commands.iter().filter(|c| c.supports(environment)) {
            for alias in &command.aliases {
                let folded = fold_case(alias);
                if folded == query {
                    return Some(NamespaceMatch::Exact(CommandLookup::new(
                        namespace,
                        command.id.as_str(),
                    )));
                }
                let distance = normalized_levenshtein(query, &folded);
                if distance <= MAX_SIMILARITY_DISTANCE {
                    near.push((alias.as_str(), distance));
                }
            }
        }

        near.sort_by(|a, b| a.1.total_cmp(&b.1));
        let mut seen = HashSet::new();
        let similar = near
            .into_iter()
            .filter(|(alias, _)| seen.insert(fold_case(alias)))
            .map(|(alias, _)| alias.to_string())
            .collect();

        Some(NamespaceMatch::Similar(similar))
    }
}

/// Warn about parameters whose type tag has no parser yet.
pub(crate) fn warn_unknown_tags(namespace: &str, command: &Command, known: impl Fn(&str) -> bool) {
    for p in command.parameters.iter().filter(|p| !known(&p.type_tag)) {
        warn!(
            namespace = %namespace,
            command = %command.id,
            parameter = %p.name,
            tag = %p.type_tag,
            "No type parser registered for parameter"
        );
    }
}
