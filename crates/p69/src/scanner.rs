//! Token scanner
//!
//! ```text
//! TOKEN   := "$" NAME [ PARAMS ] [ SUFFIX ]
//! NAME    := { alpha-numeric | "_" | "-" | "." | "$" }
//! PARAMS  := "(" [ ARG { "," ARG } ] ")"
//! ARG     := QUOTED | BARE
//! QUOTED  := "'" { any char except "'" or "\" | "\'" | "\\" } "'"
//!          | '"' { any char except '"' or "\" | '\"' | "\\" } '"'
//! BARE    := { any char except "," or ")" }
//! SUFFIX  := one white-space char
//! ```
//!
//! Tokens are recognized lexically anywhere in the text. A malformed token yields a
//! [ScanFailure] for that token only; scanning resumes right after its name.
use crate::cursor::Cursor;

pub const PREFIX: char = '$';

/// One `$...` occurrence in the source text
///
/// `start` and `end` are `char` offsets, `raw` is exactly the text between them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub raw: String,
    #[serde(serialize_with = "serialize_suffix")]
    pub suffix: Option<char>,
    pub path: Vec<String>,
    pub args: Vec<String>,
}

fn serialize_suffix<S: serde::Serializer>(
    suffix: &Option<char>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match suffix {
        Some(c) => serializer.collect_str(c),
        None => serializer.serialize_str(""),
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("missing argument for '{name}'")]
    MissingArgument { name: String },
    #[error("unterminated string for argument of '{name}'")]
    UnterminatedString { name: String },
    #[error("expected {expected}, found {}", found.map_or("end of input".to_string(), |c| format!("'{c}'")))]
    Unexpected {
        expected: &'static str,
        found: Option<char>,
    },
    #[error("invalid token name '{name}'")]
    InvalidName { name: String },
}

/// A token that could not be scanned
///
/// `token` covers only the prefix and the name; its `args` are empty.
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub token: Token,
    pub error: ScanError,
}

/// Iterator over the tokens of a text
///
/// Yields tokens in left-to-right order. A scanner is drained once.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self {
            cursor: Cursor::new(chars),
        }
    }

    /// Scan the next token, `None` once no prefix remains
    pub fn next_token(&mut self) -> Option<Result<Token, ScanFailure>> {
        if !self.cursor.seek(|c| c == PREFIX) {
            return None;
        }

        let start = self.cursor.bookmark();
        self.cursor.read();

        let name = self.scan_name();
        let after_name = self.cursor.bookmark();
        let scanned = self.scan_params(&name).and_then(|args| {
            let suffix = self.scan_suffix();
            validate_name(&name)?;
            Ok((args, suffix))
        });

        // a failed token ends after its name, the rest is scanned again for tokens
        if scanned.is_err() {
            self.cursor.goto(after_name);
        }
        let end = self.cursor.bookmark();

        let mut token = Token {
            start: start.offset(),
            end: end.offset(),
            raw: self.cursor.slice(start, end),
            suffix: None,
            path: name.split('.').map(str::to_string).collect(),
            args: vec![],
        };

        match scanned {
            Ok((args, suffix)) => {
                token.args = args;
                token.suffix = suffix;
                tracing::trace!(?token, "token scanned");
                Some(Ok(token))
            }
            Err(error) => {
                tracing::trace!(?token, %error, "token malformed");
                Some(Err(ScanFailure::new(token, error)))
            }
        }
    }

    fn scan_name(&mut self) -> String {
        self.cursor
            .read_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '$'))
    }

    fn scan_params(&mut self, name: &str) -> Result<Vec<String>, ScanError> {
        let bookmark = self.cursor.bookmark();

        self.cursor.skip_spaces();
        if self.cursor.accept(|c| c == '(').is_none() {
            self.cursor.goto(bookmark);
            return Ok(vec![]);
        }

        self.cursor.skip_spaces();
        if self.cursor.accept(|c| c == ')').is_some() {
            return Ok(vec![]);
        }

        let args = self.scan_args(name)?;
        self.cursor.expect(|c| c == ')', "')'")?;

        Ok(args)
    }

    fn scan_args(&mut self, name: &str) -> Result<Vec<String>, ScanError> {
        let mut args = vec![];

        loop {
            args.push(self.scan_arg(name)?);

            self.cursor.skip_spaces();
            if self.cursor.accept(|c| c == ',').is_none() {
                return Ok(args);
            }
        }
    }

    fn scan_arg(&mut self, name: &str) -> Result<String, ScanError> {
        self.cursor.skip_spaces();

        if let Some(delim) = self.cursor.accept(|c| c == '"' || c == '\'') {
            return self.scan_quoted_arg(delim, name);
        }

        let arg = self.cursor.read_while(|c| c != ',' && c != ')');
        if arg.is_empty() {
            return Err(ScanError::MissingArgument {
                name: name.to_string(),
            });
        }

        Ok(arg)
    }

    fn scan_quoted_arg(&mut self, delim: char, name: &str) -> Result<String, ScanError> {
        let mut result = String::new();
        let mut escaped = false;

        while !self.cursor.is_empty() {
            let run = self.cursor.read_while(|c| c != delim && c != '\\');
            if !run.is_empty() {
                // an escape only applies to the character right after the backslash
                escaped = false;
                result.push_str(&run);
            }

            if let Some(terminator) = self.cursor.accept(|c| c == delim) {
                if !escaped {
                    return Ok(result);
                }
                result.push(terminator);
                escaped = false;
                continue;
            }

            if let Some(backslash) = self.cursor.accept(|c| c == '\\') {
                if escaped {
                    result.push(backslash);
                }
                escaped = !escaped;
            }
        }

        Err(ScanError::UnterminatedString {
            name: name.to_string(),
        })
    }

    fn scan_suffix(&mut self) -> Option<char> {
        self.cursor.accept(char::is_whitespace)
    }
}

fn validate_name(name: &str) -> Result<(), ScanError> {
    if name.split('.').any(str::is_empty) {
        return Err(ScanError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, ScanFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}

/// Scan all tokens of `text` at once
pub fn scan_all(text: &str) -> Vec<Result<Token, ScanFailure>> {
    let chars: Vec<char> = text.chars().collect();
    Scanner::new(&chars).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(text: &str) -> Vec<Token> {
        scan_all(text)
            .into_iter()
            .map(|result| result.expect("token must scan"))
            .collect()
    }

    fn failure(text: &str) -> ScanFailure {
        scan_all(text)
            .into_iter()
            .find_map(Result::err)
            .expect("must fail")
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_token() {
        assert_eq!(
            tokens("$green"),
            vec![Token {
                start: 0,
                end: 6,
                raw: "$green".to_string(),
                suffix: None,
                path: strings(&["green"]),
                args: vec![],
            }]
        );
    }

    #[test]
    fn no_tokens() {
        assert!(scan_all("color: orange;").is_empty());
    }

    #[test]
    fn tokens_in_order() {
        let found = tokens("color: $green;\nbackground: $theme.base.red;\nborder: $size(2)");
        let paths: Vec<_> = found.iter().map(|t| t.path.join(".")).collect();

        assert_eq!(paths, vec!["green", "theme.base.red", "size"]);
        assert_eq!(found[2].args, strings(&["2"]));
        assert!(found.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn suffix_is_absorbed() {
        let found = tokens("$a b");

        assert_eq!(found[0].suffix, Some(' '));
        assert_eq!(found[0].raw, "$a ");
        assert_eq!(found[0].end, 3);
    }

    #[test]
    fn only_one_suffix_char() {
        let found = tokens("$a\n\nb");

        assert_eq!(found[0].suffix, Some('\n'));
        assert_eq!(found[0].raw, "$a\n");
    }

    #[test]
    fn params_probe_rewinds() {
        // no "(" after the spaces, so the first space becomes the suffix
        let found = tokens("$a   b");

        assert_eq!(found[0].args, Vec::<String>::new());
        assert_eq!(found[0].suffix, Some(' '));
        assert_eq!(found[0].raw, "$a ");
    }

    #[test]
    fn params_after_spaces() {
        let found = tokens("$f (x) ;");

        assert_eq!(found[0].args, strings(&["x"]));
        assert_eq!(found[0].raw, "$f (x) ");
    }

    #[test]
    fn empty_params() {
        let found = tokens("$f( )");

        assert_eq!(found[0].args, Vec::<String>::new());
        assert_eq!(found[0].end, 5);
    }

    #[test]
    fn bare_args_skip_leading_spaces() {
        let found = tokens("$func(alpha, beta, charlie)");

        assert_eq!(found[0].args, strings(&["alpha", "beta", "charlie"]));
        assert_eq!(found[0].raw, "$func(alpha, beta, charlie)");
    }

    #[test]
    fn quoted_args() {
        let found = tokens(r#"$f('a,b', "c\"d")"#);

        assert_eq!(found[0].args, strings(&["a,b", "c\"d"]));
    }

    #[test]
    fn quoted_escapes() {
        let found = tokens(r#"$f('it\'s', "back\\slash", 'x\yz', ')')"#);

        assert_eq!(
            found[0].args,
            strings(&["it's", "back\\slash", "xyz", ")"])
        );
    }

    #[test]
    fn mismatched_quote_is_literal() {
        let found = tokens(r#"$f("it's")"#);

        assert_eq!(found[0].args, strings(&["it's"]));
    }

    #[test]
    fn dotted_and_dollar_names() {
        let found = tokens("$a-b_c.d$e");

        assert_eq!(found[0].path, strings(&["a-b_c", "d$e"]));
    }

    #[test]
    fn missing_argument() {
        let failure = failure("$f(a,,b)");

        assert_eq!(
            failure.error,
            ScanError::MissingArgument {
                name: "f".to_string()
            }
        );
        assert_eq!(failure.token.start, 0);
    }

    #[test]
    fn unterminated_string() {
        let failure = failure("$f('abc");

        assert_eq!(
            failure.error,
            ScanError::UnterminatedString {
                name: "f".to_string()
            }
        );
        assert_eq!(failure.token.raw, "$f");
    }

    #[test]
    fn missing_close_paren() {
        let failure = failure("$f('a' x)");

        assert_eq!(
            failure.error,
            ScanError::Unexpected {
                expected: "')'",
                found: Some('x')
            }
        );
    }

    #[test]
    fn invalid_names() {
        assert!(matches!(failure("$ ").error, ScanError::InvalidName { .. }));
        assert!(matches!(failure("$a..b").error, ScanError::InvalidName { .. }));
        assert!(matches!(failure("$a.").error, ScanError::InvalidName { .. }));
    }

    #[test]
    fn failure_does_not_poison_later_tokens() {
        let results = scan_all("$f(,) $ok");

        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().path, strings(&["ok"]));
    }

    #[test]
    fn unterminated_string_keeps_later_tokens() {
        let results = scan_all("a: $f('oops;\nb: $red;\nc: $blue;");

        assert_eq!(results.len(), 3);
        let failed = results[0].as_ref().unwrap_err();
        assert_eq!((failed.token.start, failed.token.end), (3, 5));
        assert_eq!(failed.token.raw, "$f");

        let later: Vec<_> = results[1..]
            .iter()
            .map(|result| result.as_ref().unwrap().raw.as_str())
            .collect();
        assert_eq!(later, vec!["$red", "$blue"]);
    }

    #[test]
    fn unclosed_bare_argument_keeps_later_tokens() {
        let results = scan_all("a: $f(x;\nb: $red;\nc: $blue;");

        assert!(matches!(
            results[0],
            Err(ScanFailure {
                error: ScanError::Unexpected { found: None, .. },
                ..
            })
        ));
        let paths: Vec<_> = results[1..]
            .iter()
            .map(|result| result.as_ref().unwrap().path.join("."))
            .collect();
        assert_eq!(paths, strings(&["red", "blue"]));
    }

    #[test]
    fn offsets_are_scalar_values() {
        let found = tokens("🎨 $a, 😀 $b");

        assert_eq!((found[0].start, found[0].end), (2, 4));
        assert_eq!((found[1].start, found[1].end), (8, 10));
        assert_eq!(found[1].raw, "$b");
    }

    #[test]
    fn serialized_shape() {
        let found = tokens("$f(x) ");
        let json = serde_json::to_value(&found[0]).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "start": 0,
                "end": 6,
                "raw": "$f(x) ",
                "suffix": " ",
                "path": ["f"],
                "args": ["x"],
            })
        );

        let bare = serde_json::to_value(&tokens("$g")[0]).unwrap();
        assert_eq!(bare["suffix"], "");
    }
}
