//! # p69 - tokens for css-like sources
//!
//! ## Introduction for developers
//!
//! Read this to understand how `p69` works internally.
//!
//! ### Terms
//!
//! - a `token` is any `$name`, `$name(args)` or `$a.b.c(args)` occurrence in a source text
//! - a `value map` (or `layer`) is a tree of named values, see [value::Value]
//! - a `function` is a value that is called with the token's arguments to produce the
//!   actual replacement
//!
//! This is a valid source:
//! ```css
//! .button {
//!   color: $theme.primary;
//!   padding: $space.md(px) $space.lg;
//!   font-family: $font('body', "sans-serif");
//! }
//! ```
//!
//! ### Scanning
//!
//! see [scanner::Scanner]
//!
//! The scanner walks the text with a [cursor::Cursor] and recognizes one token at a time. There
//! is no notion of blocks or scopes; a `$` anywhere starts a token. Arguments are either bare
//! (`$f(a, b)`) or quoted (`$f('a,b', "c\"d")`). A single whitespace character directly after a
//! token belongs to the token (its `suffix`) and is written back after the replacement.
//!
//! Positions are counted in `char`s, never bytes.
//!
//! ### Lookup
//!
//! see [lookup::lookup]
//!
//! The token's name is split on `.` and walked down each layer in order. The first layer that
//! contains the whole path wins.
//!
//! | **layers**                            | **token** | **result**  |
//! |---------------------------------------|-----------|-------------|
//! | `[{}, {a: {b: "x"}}]`                 | `$a.b`    | `x`         |
//! | `[{a: {b: "y"}}, {a: {b: "x"}}]`      | `$a.b`    | `y`         |
//! | `[{a: null}, {a: "x"}]`               | `$a`      | (empty)     |
//! | `[{a: null}, {a: {b: "x"}}]`          | `$a.b`    | `x`         |
//! | `[{}]`                                | `$a`      | not found   |
//!
//! ### Rendering
//!
//! see [resolve::resolve_to_text]
//!
//! Strings, integers and booleans render as text, lists render comma separated, `null` renders
//! as nothing (and drops the suffix). Functions are called and their result is rendered, unless
//! it is another function.
//!
//! ### Substitution
//!
//! see [engine::substitute]
//!
//! Tokens are replaced from the back of the text to the front so that the offsets of tokens not
//! yet replaced stay valid. Each token that fails is reported to the [engine::ErrorHandler] and
//! either left in place or aborts the whole pass, see [engine::Config].
//!
pub mod cursor;
pub mod engine;
pub mod layers;
pub mod lookup;
pub mod resolve;
pub mod scanner;
pub mod spacings;
pub mod value;
