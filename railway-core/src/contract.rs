//! Contracts: type descriptors for input, output, error and settings values.
//!
//! A contract answers two questions: "does this value already conform?" and
//! "how do I build a conforming value from raw arguments?". The second is
//! answered by named factories, looked up through [`ConstructorSpec`] when a
//! definition is finalized.

use crate::error::ContractError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Raw arguments handed to a constructor.
pub type Args = Vec<Value>;

/// A resolved construction strategy.
pub type Constructor = Arc<dyn Fn(Args) -> Result<Value, ContractError> + Send + Sync>;

/// Factory name used when a definition does not pick one.
pub const DEFAULT_CONSTRUCTOR: &str = "new";

/// A type descriptor for values crossing an operation boundary.
pub trait Contract: Send + Sync + fmt::Debug {
    /// Human-readable name, used in errors and diagnostics.
    fn name(&self) -> &str;

    /// Whether `value` already conforms and can be used as-is.
    fn conforms(&self, value: &Value) -> bool;

    /// Look up a named factory. `None` means the contract does not respond
    /// to `method`.
    fn factory(&self, method: &str) -> Option<Constructor>;
}

/// How a slot builds its value: through a named factory on the contract, or
/// through an arbitrary function.
#[derive(Clone)]
pub enum ConstructorSpec {
    /// Dispatch to [`Contract::factory`] with this name.
    Named(Cow<'static, str>),
    /// Use this function directly.
    Func(Constructor),
}

impl ConstructorSpec {
    /// A named factory.
    pub fn named(method: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(method.into())
    }

    /// An arbitrary construction function.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(Args) -> Result<Value, ContractError> + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Resolve against `contract`. Returns `None` when the named factory
    /// does not exist; callers turn that into a missing-configuration error.
    pub fn resolve(&self, contract: &dyn Contract) -> Option<Constructor> {
        match self {
            Self::Named(method) => contract.factory(method),
            Self::Func(f) => Some(Arc::clone(f)),
        }
    }
}

impl Default for ConstructorSpec {
    fn default() -> Self {
        Self::Named(Cow::Borrowed(DEFAULT_CONSTRUCTOR))
    }
}

impl fmt::Debug for ConstructorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(method) => f.debug_tuple("Named").field(method).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// The empty contract: "no input", "no output" or "no error".
///
/// Construction succeeds with zero arguments or a single `null`; anything
/// else fails with [`ContractError::Arguments`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneContract;

impl NoneContract {
    /// Build the empty value.
    pub fn construct(args: Args) -> Result<Value, ContractError> {
        match args.as_slice() {
            [] | [Value::Null] => Ok(Value::Null),
            _ => Err(ContractError::Arguments {
                contract: "None".into(),
                count: args.len(),
            }),
        }
    }
}

impl Contract for NoneContract {
    fn name(&self) -> &str {
        "None"
    }

    fn conforms(&self, value: &Value) -> bool {
        value.is_null()
    }

    fn factory(&self, method: &str) -> Option<Constructor> {
        if method != DEFAULT_CONSTRUCTOR {
            return None;
        }
        let ctor: Constructor = Arc::new(Self::construct);
        Some(ctor)
    }
}

/// Accepts any single value and passes it through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyContract;

impl AnyContract {
    /// Pass the single argument through; zero arguments yield `null`.
    pub fn construct(mut args: Args) -> Result<Value, ContractError> {
        match args.len() {
            0 => Ok(Value::Null),
            1 => Ok(args.pop().unwrap_or_default()),
            count => Err(ContractError::Arguments {
                contract: "Any".into(),
                count,
            }),
        }
    }
}

impl Contract for AnyContract {
    fn name(&self) -> &str {
        "Any"
    }

    fn conforms(&self, _value: &Value) -> bool {
        true
    }

    fn factory(&self, method: &str) -> Option<Constructor> {
        if method != DEFAULT_CONSTRUCTOR {
            return None;
        }
        let ctor: Constructor = Arc::new(Self::construct);
        Some(ctor)
    }
}

/// A contract backed by a serde type.
///
/// A value conforms when it is already in canonical form: it deserializes
/// into `T` and serializes back to exactly the same value, so undeclared
/// fields and omitted defaults send it through the constructor. The default
/// `new`
/// factory deserializes a single argument as `T`, or the whole argument
/// list as a sequence when several are given (so `[name, age]` fills a
/// two-field struct in declaration order), and returns the re-serialized
/// canonical form. More factories can be registered by name.
pub struct Typed<T> {
    name: Cow<'static, str>,
    factories: Vec<(Cow<'static, str>, Constructor)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    /// A typed contract named after `T`, with module paths stripped
    /// (`Vec<app::User>` is named `Vec<User>`).
    pub fn new() -> Self {
        Self::named(short_type_name(std::any::type_name::<T>()))
    }

    /// A typed contract with an explicit name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            factories: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Register an additional named factory. A factory named `new`
    /// replaces the default one.
    pub fn with_factory<F>(mut self, method: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(Args) -> Result<Value, ContractError> + Send + Sync + 'static,
    {
        self.factories.push((method.into(), Arc::new(f)));
        self
    }

    /// Deserialize a value that is expected to conform.
    pub fn decode(&self, value: Value) -> Result<T, ContractError> {
        serde_json::from_value(value)
            .map_err(|e| ContractError::invalid(&*self.name, e.to_string()))
    }

    /// Serialize a typed value into its canonical raw form.
    pub fn encode(&self, value: &T) -> Result<Value, ContractError> {
        serde_json::to_value(value)
            .map_err(|e| ContractError::invalid(&*self.name, e.to_string()))
    }

    fn build(name: &str, mut args: Args) -> Result<Value, ContractError> {
        let raw = match args.len() {
            0 => Value::Null,
            1 => args.pop().unwrap_or_default(),
            _ => Value::Array(args),
        };
        let typed: T =
            serde_json::from_value(raw).map_err(|e| ContractError::invalid(name, e.to_string()))?;
        serde_json::to_value(&typed).map_err(|e| ContractError::invalid(name, e.to_string()))
    }
}

impl<T> Default for Typed<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods: Vec<&str> = self.factories.iter().map(|(m, _)| &**m).collect();
        f.debug_struct("Typed")
            .field("name", &self.name)
            .field("factories", &methods)
            .finish()
    }
}

impl<T> Contract for Typed<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn conforms(&self, value: &Value) -> bool {
        serde_json::from_value::<T>(value.clone())
            .and_then(|typed| serde_json::to_value(&typed))
            .is_ok_and(|canonical| &canonical == value)
    }

    fn factory(&self, method: &str) -> Option<Constructor> {
        if let Some((_, f)) = self.factories.iter().find(|(m, _)| m == method) {
            return Some(Arc::clone(f));
        }
        if method != DEFAULT_CONSTRUCTOR {
            return None;
        }
        let name = self.name.clone().into_owned();
        let ctor: Constructor = Arc::new(move |args| Self::build(&name, args));
        Some(ctor)
    }
}

fn short_type_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
            continue;
        }
        short.push_str(path.rsplit("::").next().unwrap_or(&path));
        path.clear();
        short.push(c);
    }
    short.push_str(path.rsplit("::").next().unwrap_or(&path));
    short
}
