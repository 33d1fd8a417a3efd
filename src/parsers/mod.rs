//! Type parsers: turning one argument token into one typed [`Value`].
//!
//! Parsers are keyed by a stable type tag (see [`tags`]). Plugins may add
//! parsers for their own tags or replace the built-in ones; the last
//! registration wins.
//!
//! [`tags`]: crate::handlers::core::traits::tags

mod boolean;
mod duration;
mod numeric;
mod text;

pub use self::boolean::BoolParser;
pub use self::duration::DurationParser;
pub use self::numeric::NumericParser;
pub use self::text::{CharParser, StringParser};

use crate::handlers::core::traits::{tags, Value};
use crate::localization::keys;
use std::collections::HashMap;
use std::sync::Arc;

/// Converts a token into a [`Value`].
pub trait TypeParser: Send + Sync {
    /// Parse one token; `None` means the token is not valid for this type.
    fn parse(&self, input: &str) -> Option<Value>;

    /// Localization key of the type's display name. The text may use a
    /// `{type}` placeholder, which receives the type tag.
    fn display_key(&self) -> &'static str {
        keys::TYPE_CUSTOM
    }

    /// Localization key of a hint explaining the accepted input, if any.
    fn rules_key(&self) -> Option<&'static str> {
        None
    }
}

/// Parsers by type tag.
#[derive(Default)]
pub struct TypeParserRegistry {
    parsers: HashMap<String, Arc<dyn TypeParser>>,
}

impl TypeParserRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in parser.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(tags::I8, Arc::new(NumericParser::<i8>::new()));
        registry.register(tags::U8, Arc::new(NumericParser::<u8>::new()));
        registry.register(tags::I16, Arc::new(NumericParser::<i16>::new()));
        registry.register(tags::U16, Arc::new(NumericParser::<u16>::new()));
        registry.register(tags::I32, Arc::new(NumericParser::<i32>::new()));
        registry.register(tags::U32, Arc::new(NumericParser::<u32>::new()));
        registry.register(tags::I64, Arc::new(NumericParser::<i64>::new()));
        registry.register(tags::U64, Arc::new(NumericParser::<u64>::new()));
        registry.register(tags::F32, Arc::new(NumericParser::<f32>::new()));
        registry.register(tags::F64, Arc::new(NumericParser::<f64>::new()));
        registry.register(tags::CHAR, Arc::new(CharParser));
        registry.register(tags::BOOL, Arc::new(BoolParser));
        registry.register(tags::STRING, Arc::new(StringParser));
        registry.register(tags::DURATION, Arc::new(DurationParser));
        registry
    }

    /// Register a parser, returning the one it replaced.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        parser: Arc<dyn TypeParser>,
    ) -> Option<Arc<dyn TypeParser>> {
        self.parsers.insert(tag.into(), parser)
    }

    pub fn unregister(&mut self, tag: &str) -> bool {
        self.parsers.remove(tag).is_some()
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn TypeParser>> {
        self.parsers.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.parsers.contains_key(tag)
    }
}
