use super::TypeParser;
use crate::handlers::core::traits::Value;
use crate::localization::keys;
use std::marker::PhantomData;
use std::str::FromStr;

/// Parses any numeric type through its `FromStr` implementation.
pub struct NumericParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> NumericParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for NumericParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeParser for NumericParser<T>
where
    T: FromStr + Into<Value>,
{
    fn parse(&self, input: &str) -> Option<Value> {
        input.trim().parse::<T>().ok().map(Into::into)
    }

    fn display_key(&self) -> &'static str {
        keys::TYPE_NUMERIC
    }
}
