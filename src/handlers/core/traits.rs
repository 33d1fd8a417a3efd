//! Command declaration types.
//!
//! A command is declared with a plain function pointer plus an explicit
//! parameter list. The function receives the [`CommandContext`] first and
//! the bound [`Arguments`] second; since it is a `fn` and not a closure it
//! cannot capture instance state.
//!
//! ```ignore
//! fn kick(ctx: &mut CommandContext<'_>, args: &Arguments) -> HandlerResult {
//!     let player: String = args.get(0)?;
//!     let reason: Option<String> = args.opt(1)?;
//!     Ok(Some(format!("kicked {player}")))
//! }
//!
//! let descriptor = CommandDescriptor::new("kick", kick)
//!     .param(Parameter::required("player", tags::STRING))
//!     .param(Parameter::optional("reason", tags::STRING))
//!     .alias("kick");
//! ```

use super::context::{CommandContext, Environment};
use super::middleware::Middleware;
use crate::error::{HandlerError, HandlerResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Signature every command handler has.
pub type Handler = fn(&mut CommandContext<'_>, &Arguments) -> HandlerResult;

/// Built-in type tags.
pub mod tags {
    pub const BOOL: &str = "bool";
    pub const I8: &str = "i8";
    pub const U8: &str = "u8";
    pub const I16: &str = "i16";
    pub const U16: &str = "u16";
    pub const I32: &str = "i32";
    pub const U32: &str = "u32";
    pub const I64: &str = "i64";
    pub const U64: &str = "u64";
    pub const F32: &str = "f32";
    pub const F64: &str = "f64";
    pub const CHAR: &str = "char";
    pub const STRING: &str = "string";
    pub const DURATION: &str = "duration";
}

// ============================================================================
// Values
// ============================================================================

/// A parsed argument value.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(String),
    Duration(Duration),
    /// Produced by plugin-defined parsers.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Text(_) => "text",
            Self::Duration(_) => "duration",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({})", v),
            Self::Int(v) => write!(f, "Int({})", v),
            Self::UInt(v) => write!(f, "UInt({})", v),
            Self::Float(v) => write!(f, "Float({})", v),
            Self::Char(v) => write!(f, "Char({:?})", v),
            Self::Text(v) => write!(f, "Text({:?})", v),
            Self::Duration(v) => write!(f, "Duration({:?})", v),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! value_from {
    ($variant:ident <- $($t:ty),+) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v.into())
            }
        })+
    };
}

value_from!(Int <- i8, i16, i32, i64);
value_from!(UInt <- u8, u16, u32, u64);
value_from!(Float <- f32, f64);
value_from!(Bool <- bool);
value_from!(Char <- char);
value_from!(Text <- String, &str);
value_from!(Duration <- Duration);

/// Conversion out of a bound [`Value`].
pub trait FromValue: Sized {
    /// Name used in [`HandlerError::ArgumentType`].
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value_int {
    ($($t:ty),+) => {
        $(impl FromValue for $t {
            const EXPECTED: &'static str = stringify!($t);

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(v) => <$t>::try_from(*v).ok(),
                    Value::UInt(v) => <$t>::try_from(*v).ok(),
                    _ => None,
                }
            }
        })+
    };
}

from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "f32";

    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for char {
    const EXPECTED: &'static str = "char";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for Duration {
    const EXPECTED: &'static str = "duration";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Duration(v) => Some(*v),
            _ => None,
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// Arguments bound to a command's declared parameters, by position.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Option<Value>>,
    raw: Vec<String>,
}

impl Arguments {
    pub fn new(values: Vec<Option<Value>>, raw: Vec<String>) -> Self {
        Self { values, raw }
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The bound value, if any.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// The raw tokens the caller typed, including any extras.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// A required argument.
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, HandlerError> {
        self.opt(index)?
            .ok_or(HandlerError::MissingArgument(index))
    }

    /// An optional argument. Absent is `Ok(None)`, a wrong type is an error.
    pub fn opt<T: FromValue>(&self, index: usize) -> Result<Option<T>, HandlerError> {
        match self.value(index) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or(HandlerError::ArgumentType {
                    index,
                    expected: T::EXPECTED,
                }),
        }
    }

    /// A value produced by a plugin-defined parser.
    pub fn custom<T: Any + Send + Sync>(&self, index: usize) -> Option<&T> {
        match self.value(index) {
            Some(Value::Custom(v)) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Whether a parameter must be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    Required,
    /// Absent binds to nothing.
    Optional,
    /// Absent binds to the given value.
    Default(Value),
}

/// One declared positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_tag: String,
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn required(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            kind: ParameterKind::Required,
        }
    }

    pub fn optional(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            kind: ParameterKind::Optional,
        }
    }

    /// Make the parameter optional with a default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.kind = ParameterKind::Default(value.into());
        self
    }

    pub fn is_required(&self) -> bool {
        matches!(self.kind, ParameterKind::Required)
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Everything needed to register a command.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub id: String,
    pub handler: Handler,
    pub parameters: Vec<Parameter>,
    pub aliases: Vec<String>,
    pub environments: Vec<Environment>,
    pub middleware: Vec<Arc<dyn Middleware>>,
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("parameters", &self.parameters)
            .field("aliases", &self.aliases)
            .field("environments", &self.environments)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl CommandDescriptor {
    /// A chat-only command with no aliases, parameters or middleware.
    pub fn new(id: impl Into<String>, handler: Handler) -> Self {
        Self {
            id: id.into(),
            handler,
            parameters: Vec::new(),
            aliases: Vec::new(),
            environments: vec![Environment::Chat],
            middleware: Vec::new(),
        }
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn environments<I: IntoIterator<Item = Environment>>(mut self, environments: I) -> Self {
        self.environments = environments.into_iter().collect();
        self
    }

    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_opt() {
        let args = Arguments::new(
            vec![Some(Value::Int(5)), None, Some(Value::Text("x".into()))],
            vec!["5".into()],
        );
        assert_eq!(args.get::<i32>(0).unwrap(), 5);
        assert_eq!(args.get::<u8>(0).unwrap(), 5);
        assert_eq!(args.opt::<String>(1).unwrap(), None);
        assert!(matches!(args.get::<String>(1), Err(HandlerError::MissingArgument(1))));
        assert!(matches!(
            args.get::<bool>(2),
            Err(HandlerError::ArgumentType { index: 2, expected: "bool" })
        ));
        assert!(matches!(args.get::<i32>(9), Err(HandlerError::MissingArgument(9))));
    }

    #[test]
    fn test_integer_narrowing_checks_range() {
        let args = Arguments::new(vec![Some(Value::Int(300))], vec![]);
        assert!(args.get::<i8>(0).is_err());
        assert_eq!(args.get::<i16>(0).unwrap(), 300);
    }

    #[test]
    fn test_custom_values() {
        #[derive(Debug, PartialEq)]
        struct Coords(i32, i32);

        let args = Arguments::new(vec![Some(Value::custom(Coords(1, 2)))], vec![]);
        assert_eq!(args.custom::<Coords>(0), Some(&Coords(1, 2)));
        assert_eq!(args.custom::<String>(0), None);
    }

    #[test]
    fn test_parameter_builders() {
        let p = Parameter::optional("count", tags::I32).with_default(3i32);
        assert_eq!(p.kind, ParameterKind::Default(Value::Int(3)));
        assert!(!p.is_required());
        assert!(Parameter::required("x", tags::BOOL).is_required());
    }
}
