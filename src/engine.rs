//! The command engine.
//!
//! An [`Engine`] owns the three registries (commands, type parsers,
//! middleware providers) and the active configuration, each behind its own
//! read-mostly lock. Command records are cloned out as `Arc<Command>` before
//! anything runs, so no lock is held while handlers or middleware execute;
//! a handler may read the registries or even register more commands.
//!
//! ```ignore
//! let engine = Arc::new(Engine::new(Config::load("config.toml")?));
//! engine.install_builtins()?;
//! if let Some(reply) = engine.dispatch(&caller, Environment::Chat, ".help") {
//!     send(reply.message);
//! }
//! ```

use crate::config::{CommandDeclaration, Config, MiddlewareSpec};
use crate::error::{MiddlewareError, RegistrationError};
use crate::handlers::builtin;
use crate::handlers::core::context::{Caller, Environment};
use crate::handlers::core::middleware::{Middleware, MiddlewareProvider, MiddlewareRegistry};
use crate::handlers::core::pipeline::{self, Execution};
use crate::handlers::core::registry::{
    Command, CommandLookup, CommandRegistry, Resolution, warn_unknown_tags,
};
use crate::handlers::core::traits::{CommandDescriptor, Handler, Parameter};
use crate::localization::{CORE_NAMESPACE, EnglishFallback, Localizer, keys, substitute};
use crate::parsers::{TypeParser, TypeParserRegistry};
use crate::telemetry::spans;
use chatcmd_syntax::{CommandSyntax, ParsedCommand};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of near-miss aliases shown per namespace.
const SUGGESTIONS_PER_NAMESPACE: usize = 3;

/// Command registry, resolver and execution front door.
pub struct Engine {
    config: RwLock<Arc<Config>>,
    syntax: RwLock<Arc<CommandSyntax>>,
    commands: RwLock<CommandRegistry>,
    parsers: RwLock<TypeParserRegistry>,
    providers: RwLock<MiddlewareRegistry>,
    localizer: Arc<dyn Localizer>,
}

impl Engine {
    /// Create an engine with the built-in type parsers and English texts.
    pub fn new(config: Config) -> Self {
        Self::with_localizer(config, Arc::new(EnglishFallback::default()))
    }

    /// Create an engine that renders text through `localizer`.
    pub fn with_localizer(config: Config, localizer: Arc<dyn Localizer>) -> Self {
        let syntax = config.syntax();
        Self {
            config: RwLock::new(Arc::new(config)),
            syntax: RwLock::new(Arc::new(syntax)),
            commands: RwLock::new(CommandRegistry::new()),
            parsers: RwLock::new(TypeParserRegistry::with_defaults()),
            providers: RwLock::new(MiddlewareRegistry::new()),
            localizer,
        }
    }

    // ------------------------------------------------------------------
    // Configuration & text
    // ------------------------------------------------------------------

    /// Snapshot of the active configuration.
    pub fn config(&self) -> Arc<Config> {
        self.config.read().clone()
    }

    /// Replace the active configuration.
    ///
    /// Already registered commands keep the middleware they were built with;
    /// prefixes, delimiters, namespace aliases and templates take effect for
    /// the next line.
    pub fn rehash(&self, config: Config) {
        let syntax = config.syntax();
        let mut current = self.config.write();
        *self.syntax.write() = Arc::new(syntax);
        *current = Arc::new(config);
        info!(
            prefixes = ?current.prefixes,
            delimiters = ?current.plugin_delimiters,
            templates = current.middleware_templates.len(),
            "Configuration reloaded"
        );
    }

    pub fn localizer(&self) -> &dyn Localizer {
        self.localizer.as_ref()
    }

    /// Look up one of the engine's own messages.
    pub fn localize(&self, user_id: u64, key: &str) -> String {
        self.localizer.get(user_id, CORE_NAMESPACE, key)
    }

    /// The prefix shown in signatures.
    pub fn primary_prefix(&self) -> String {
        self.syntax.read().primary_prefix().to_string()
    }

    /// The name shown to users for a namespace.
    pub fn friendly_namespace(&self, namespace: &str) -> String {
        self.config.read().friendly_namespace(namespace).to_string()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register or replace a command in `namespace`.
    pub fn register_command(
        &self,
        namespace: &str,
        descriptor: CommandDescriptor,
    ) -> Result<(), RegistrationError> {
        let command = Command::try_from(descriptor)?;
        {
            let parsers = self.parsers.read();
            warn_unknown_tags(namespace, &command, |tag| parsers.contains(tag));
        }

        let id = command.id.clone();
        let aliases = command.aliases.len();
        let replaced = self.commands.write().register(namespace, command).is_some();
        info!(
            namespace = %namespace,
            command = %id,
            aliases,
            replaced,
            "Registered command"
        );
        Ok(())
    }

    pub fn unregister_command(&self, namespace: &str, id: &str) -> bool {
        let removed = self.commands.write().unregister(namespace, id);
        if removed {
            info!(namespace = %namespace, command = %id, "Unregistered command");
        }
        removed
    }

    pub fn command(&self, lookup: &CommandLookup) -> Option<Arc<Command>> {
        self.commands.read().get(lookup)
    }

    /// Every namespace with its commands, in sorted namespace order.
    pub fn commands_snapshot(&self) -> Vec<(String, Vec<Arc<Command>>)> {
        self.commands.read().snapshot()
    }

    /// Usage counts of commands that ran at least once, busiest first.
    pub fn command_stats(&self) -> Vec<(CommandLookup, u64)> {
        self.commands.read().stats()
    }

    /// Register a type parser, returning the one it replaced.
    pub fn register_type_parser(
        &self,
        tag: impl Into<String>,
        parser: Arc<dyn TypeParser>,
    ) -> Option<Arc<dyn TypeParser>> {
        self.parsers.write().register(tag, parser)
    }

    pub fn unregister_type_parser(&self, tag: &str) -> bool {
        self.parsers.write().unregister(tag)
    }

    pub fn type_parser(&self, tag: &str) -> Option<Arc<dyn TypeParser>> {
        self.parsers.read().get(tag)
    }

    /// Register a middleware provider, returning the one it replaced.
    pub fn register_middleware_provider(
        &self,
        id: impl Into<String>,
        provider: Arc<dyn MiddlewareProvider>,
    ) -> Option<Arc<dyn MiddlewareProvider>> {
        self.providers.write().register(id, provider)
    }

    pub fn unregister_middleware_provider(&self, id: &str) -> bool {
        self.providers.write().unregister(id)
    }

    /// Build middleware instances for a declaration against the configured
    /// templates.
    pub fn resolve_middleware(
        &self,
        spec: &MiddlewareSpec,
    ) -> Result<Vec<Arc<dyn Middleware>>, MiddlewareError> {
        let config = self.config();
        self.providers.read().resolve(spec, &config.middleware_templates)
    }

    /// Check that every configured template can be instantiated.
    ///
    /// Call after all providers are registered. Each problem is logged and
    /// returned.
    pub fn verify_templates(&self) -> Vec<MiddlewareError> {
        let config = self.config();
        let providers = self.providers.read();

        let mut problems = Vec::new();
        for (name, template) in &config.middleware_templates {
            if let Err(e) = providers.instantiate(&format!("template {:?}", name), template) {
                warn!(template = %name, error = %e, "Middleware template is unusable");
                problems.push(e);
            }
        }
        problems
    }

    /// Register the built-in commands declared in configuration.
    pub fn install_builtins(&self) -> Result<usize, RegistrationError> {
        builtin::install(self)
    }

    // ------------------------------------------------------------------
    // Parsing, resolution, execution
    // ------------------------------------------------------------------

    /// Parse a raw line; `None` when it is not a command.
    pub fn parse(&self, raw: &str) -> Option<ParsedCommand> {
        let syntax = self.syntax.read().clone();
        syntax.parse(raw)
    }

    /// Find the namespace a user-typed qualifier refers to.
    pub fn find_namespace(&self, query: &str) -> Option<String> {
        let config = self.config();
        self.commands
            .read()
            .find_namespace(query, &config.plugin_aliases)
    }

    /// Resolve a parsed command to candidates for this caller.
    pub fn resolve(
        &self,
        caller: &Caller,
        environment: Environment,
        parsed: &ParsedCommand,
    ) -> Resolution {
        let config = self.config();
        let resolution = self
            .commands
            .read()
            .resolve(environment, parsed, &config.plugin_aliases);
        debug!(
            caller = %caller,
            command = %parsed,
            exact = resolution.exact.len(),
            similar = resolution.similar.len(),
            "Resolved command"
        );
        resolution
    }

    /// Execute one resolved command.
    pub fn execute(
        &self,
        caller: &Caller,
        environment: Environment,
        lookup: &CommandLookup,
        tokens: &[String],
    ) -> Execution {
        pipeline::execute(self, caller, environment, lookup, tokens)
    }

    /// Run a raw input line end to end.
    ///
    /// Returns `None` for ordinary chat text. Otherwise the command either
    /// ran, or the caller gets suggestions, a not-found notice, or the list
    /// of ambiguous candidates.
    pub fn dispatch(&self, caller: &Caller, environment: Environment, raw: &str) -> Option<Execution> {
        let parsed = self.parse(raw)?;
        let _span = spans::dispatch(&caller.to_string(), environment.as_str()).entered();

        let resolution = self.resolve(caller, environment, &parsed);
        let user_id = caller.user_id();

        let reply = match resolution.exact.as_slice() {
            [lookup] => self.execute(caller, environment, lookup, &parsed.args),
            [] if !resolution.similar.is_empty() => {
                let lines: Vec<String> = resolution
                    .similar
                    .iter()
                    .map(|(ns, aliases)| {
                        let shown: Vec<&str> = aliases
                            .iter()
                            .take(SUGGESTIONS_PER_NAMESPACE)
                            .map(String::as_str)
                            .collect();
                        format!("{}: {}", self.friendly_namespace(ns), shown.join(", "))
                    })
                    .collect();
                Execution::failed(substitute(
                    &self.localize(user_id, keys::SHOW_SIMILAR_CANDIDATES),
                    &[("candidates", &lines.join("\n"))],
                ))
            }
            [] => Execution::failed(substitute(
                &self.localize(user_id, keys::COMMAND_NOT_FOUND),
                &[("command", &parsed.name)],
            )),
            candidates => {
                let syntax = self.syntax.read().clone();
                let lines: Vec<String> = candidates
                    .iter()
                    .map(|lookup| {
                        format!(
                            "{}{}{}{}",
                            syntax.primary_prefix(),
                            self.friendly_namespace(&lookup.namespace),
                            syntax.primary_delimiter(),
                            parsed.name
                        )
                    })
                    .collect();
                Execution::failed(substitute(
                    &self.localize(user_id, keys::SHOW_EXACT_CANDIDATES),
                    &[("candidates", &lines.join("\n"))],
                ))
            }
        };

        Some(reply)
    }
}

impl CommandDescriptor {
    /// Build a descriptor from a configuration declaration.
    ///
    /// Aliases, environments and middleware come from `declaration`; the
    /// middleware is resolved against `engine`'s templates and providers.
    pub fn from_declaration(
        id: impl Into<String>,
        handler: Handler,
        parameters: Vec<Parameter>,
        declaration: &CommandDeclaration,
        engine: &Engine,
    ) -> Result<Self, RegistrationError> {
        let middleware = match declaration.middleware {
            Some(ref spec) => engine.resolve_middleware(spec)?,
            None => Vec::new(),
        };

        Ok(Self {
            id: id.into(),
            handler,
            parameters,
            aliases: declaration.aliases.to_vec(),
            environments: declaration.environments(),
            middleware,
        })
    }
}
