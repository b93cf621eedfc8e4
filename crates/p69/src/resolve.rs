//! Turning looked up values into replacement text
//!
//! Every value is classified exactly once by [classify] into a [Classified] view. Rendering
//! matches on that view only.
//!
//! Functions are invoked with the token's arguments and their result is rendered in turn. A
//! function returning another function is rejected, so a token expands at most one call deep.
use crate::value::{Function, Value};
use num_bigint::BigInt;

/// Borrowed view of a value, tagged by how it renders
#[derive(Debug, Clone, Copy)]
pub enum Classified<'v> {
    Null,
    Text(&'v str),
    Integer(i64),
    BigInteger(&'v BigInt),
    Boolean(bool),
    List(&'v [Value]),
    Invocable(&'v Function),
    Unsupported(&'v Value),
}

/// Tag of a [Classified] value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Text,
    Integer,
    BigInteger,
    Boolean,
    List,
    Invocable,
    Unsupported,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Null => f.write_str("null"),
            Kind::Text => f.write_str("text"),
            Kind::Integer => f.write_str("integer"),
            Kind::BigInteger => f.write_str("bigint"),
            Kind::Boolean => f.write_str("boolean"),
            Kind::List => f.write_str("list"),
            Kind::Invocable => f.write_str("function"),
            Kind::Unsupported => f.write_str("unsupported"),
        }
    }
}

impl Classified<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Classified::Null => Kind::Null,
            Classified::Text(_) => Kind::Text,
            Classified::Integer(_) => Kind::Integer,
            Classified::BigInteger(_) => Kind::BigInteger,
            Classified::Boolean(_) => Kind::Boolean,
            Classified::List(_) => Kind::List,
            Classified::Invocable(_) => Kind::Invocable,
            Classified::Unsupported(_) => Kind::Unsupported,
        }
    }
}

pub fn classify(value: &Value) -> Classified<'_> {
    match value {
        Value::Null => Classified::Null,
        Value::String(s) => Classified::Text(s),
        Value::Integer(i) => Classified::Integer(*i),
        Value::BigInteger(i) => Classified::BigInteger(i),
        Value::Boolean(b) => Classified::Boolean(*b),
        Value::Array(items) => Classified::List(items),
        Value::Function(function) => Classified::Invocable(function),
        Value::Object(_) => Classified::Unsupported(value),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("'{0}' type unsupported")]
    Unsupported(&'static str),
    #[error("returning a function from a function is not allowed")]
    NestedFunction,
    #[error("function call failed")]
    Call(#[source] anyhow::Error),
}

/// Render `value` as replacement text
///
/// Returns `Ok(None)` for null, which renders as nothing and takes no suffix.
pub fn resolve_to_text(value: &Value, args: &[String]) -> Result<Option<String>, ResolveError> {
    match classify(value) {
        Classified::Invocable(function) => invoke(function, args),
        classified => render(classified),
    }
}

fn invoke(function: &Function, args: &[String]) -> Result<Option<String>, ResolveError> {
    let result = function.call(args).map_err(ResolveError::Call)?;

    match classify(&result) {
        Classified::Invocable(_) => Err(ResolveError::NestedFunction),
        classified => render(classified),
    }
}

fn render(classified: Classified<'_>) -> Result<Option<String>, ResolveError> {
    let text = match classified {
        Classified::Null => return Ok(None),
        Classified::Text(s) => s.to_string(),
        Classified::Integer(i) => i.to_string(),
        Classified::BigInteger(i) => i.to_string(),
        Classified::Boolean(b) => b.to_string(),
        Classified::List(items) => render_list(items)?,
        // only reachable for functions nested in lists
        Classified::Invocable(_) => return Err(ResolveError::Unsupported("function")),
        Classified::Unsupported(value) => {
            return Err(ResolveError::Unsupported(value.type_name()))
        }
    };

    Ok(Some(text))
}

// null elements render empty and nested lists flatten with the same separator
fn render_list(items: &[Value]) -> Result<String, ResolveError> {
    let rendered = items
        .iter()
        .map(|item| render(classify(item)).map(Option::unwrap_or_default))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rendered.join(","))
}
