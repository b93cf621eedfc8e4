//! Substitution of all tokens in a document
//!
//! 1. the text is normalized to NFC
//! 2. all tokens are scanned, left to right
//! 3. tokens are processed right to left
//!
//! Splicing a replacement shifts every offset after it. Working from the back means every token
//! still pending sits before the splice point and keeps valid offsets, so nothing is rescanned.
//!
//! Each token either succeeds or fails on its own. Failures go to the configured
//! [ErrorHandler]. Whether a failure ends the whole pass is decided by
//! [Config::throw_if_missing] or by the handler returning [ControlFlow::Break].
use crate::lookup::lookup;
use crate::resolve::{resolve_to_text, ResolveError};
use crate::scanner::{ScanError, Scanner, Token};
use crate::value::Value;
use std::ops::ControlFlow;
use unicode_normalization::UnicodeNormalization;

/// Why a single token was not replaced
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("missing or invalid token: {0}")]
    Missing(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A failed token together with its error
#[derive(thiserror::Error, derive_new::new, Debug)]
#[error("token `{}` at {} not replaced", token.raw.trim_end(), token.start)]
pub struct TokenFailure {
    pub token: Token,
    #[source]
    pub error: Error,
}

/// Receives every per-token failure
pub trait ErrorHandler {
    /// Return [ControlFlow::Break] to abort the remaining pass
    fn on_error(&self, error: &Error, token: &Token) -> ControlFlow<()>;
}

// blanket impl for Fn
impl<F> ErrorHandler for F
where
    F: Fn(&Error, &Token) -> ControlFlow<()>,
{
    fn on_error(&self, error: &Error, token: &Token) -> ControlFlow<()> {
        self(error, token)
    }
}

/// Default handler, reports failures via [tracing] and continues
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrors;

impl ErrorHandler for LogErrors {
    fn on_error(&self, error: &Error, token: &Token) -> ControlFlow<()> {
        tracing::error!(%error, token = token.raw.trim_end(), "token not replaced");
        tracing::debug!(?token);
        ControlFlow::Continue(())
    }
}

/// Options for one substitution pass
pub struct Config {
    /// Abort on the first failed token instead of leaving it in place
    pub throw_if_missing: bool,
    /// Label for diagnostics only, usually the file name
    pub reference: String,
    pub on_error: Box<dyn ErrorHandler>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            throw_if_missing: true,
            reference: "<input>".to_string(),
            on_error: Box::new(LogErrors),
        }
    }
}

impl Config {
    pub fn with_throw_if_missing(mut self, throw_if_missing: bool) -> Self {
        self.throw_if_missing = throw_if_missing;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.on_error = Box::new(handler);
        self
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("throw_if_missing", &self.throw_if_missing)
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

/// Result of a completed pass
#[derive(derive_new::new, Debug)]
pub struct Substitution {
    pub text: String,
    /// Tokens left in place, in the order they were processed (right to left)
    pub failures: Vec<TokenFailure>,
}

/// Replace every token in `text` with its value from `layers`
///
/// Layers are searched in order, the first one defining a path wins. A single value map is
/// passed as a one element slice.
///
/// Returns the first failure if the pass was aborted, see [Config].
pub fn substitute(
    layers: &[Value],
    text: &str,
    config: &Config,
) -> Result<Substitution, TokenFailure> {
    let span = tracing::info_span!("substitute", reference = %config.reference);
    let _entered = span.enter();

    let mut document: Vec<char> = text.nfc().collect();

    let mut scanned: Vec<_> = Scanner::new(&document).collect();
    tracing::debug!(tokens = scanned.len(), "scanned");
    scanned.reverse();

    let mut failures = vec![];
    for scanned_token in scanned {
        let (token, outcome) = match scanned_token {
            Ok(token) => {
                let outcome = replace_token(layers, &mut document, &token);
                (token, outcome)
            }
            Err(failure) => (failure.token, Err(failure.error.into())),
        };

        let Err(error) = outcome else {
            continue;
        };

        let flow = config.on_error.on_error(&error, &token);
        let failure = TokenFailure::new(token, error);
        if config.throw_if_missing || flow.is_break() {
            tracing::debug!(%failure, "aborting");
            return Err(failure);
        }

        failures.push(failure);
    }

    Ok(Substitution::new(document.into_iter().collect(), failures))
}

#[tracing::instrument(level = "trace", skip_all, fields(raw = %token.raw))]
fn replace_token(layers: &[Value], document: &mut Vec<char>, token: &Token) -> Result<(), Error> {
    let value =
        lookup(layers, &token.path).ok_or_else(|| Error::Missing(token.path.join(".")))?;

    let replacement = match resolve_to_text(value, &token.args)? {
        Some(mut text) => {
            text.extend(token.suffix);
            text
        }
        None => String::new(),
    };

    tracing::trace!(%replacement, "splice");
    document.splice(token.start..token.end, replacement.chars());
    Ok(())
}
