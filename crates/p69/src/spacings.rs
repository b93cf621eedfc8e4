//! Spacing helpers
//!
//! Build a value map of functions that convert pixel sizes into other css units.
//!
//! ```
//! # use p69::spacings::{spacings, SpacingOptions};
//! let layer = spacings([("md", 24.0)], SpacingOptions::default());
//! // "$md" -> "1.5rem", "$md(pt)" -> "18pt", "$md(px)" -> "24px"
//! ```
//!
//! Conversions assume 96 DPI. Not perfect but precise enough.
use crate::value::Value;

const PX_IN_INCH: f64 = 96.0;
const PX_IN_MM: f64 = PX_IN_INCH * 0.03937;
const PX_IN_CM: f64 = PX_IN_MM * 10.0;
const PT_IN_INCH: f64 = 72.0;
const PX_IN_PC: f64 = 16.0;

#[derive(Debug, Clone)]
pub struct SpacingOptions {
    /// Root font size in px, used for `rem` and `em`
    pub base: f64,
    /// Unit used when a token passes no argument
    pub default_unit: String,
}

impl Default for SpacingOptions {
    fn default() -> Self {
        Self {
            base: 16.0,
            default_unit: "rem".to_string(),
        }
    }
}

/// Map each named pixel size to a function `(unit?) -> length`
pub fn spacings<K, I>(values: I, options: SpacingOptions) -> Value
where
    K: Into<String>,
    I: IntoIterator<Item = (K, f64)>,
{
    Value::object(values.into_iter().map(|(name, px)| {
        let name: String = name.into();
        let options = options.clone();
        let function_name = name.clone();

        let function = Value::function(move |args| {
            let unit = args.first().map_or(options.default_unit.as_str(), |s| s.trim());
            calc_space(&function_name, options.base, px, unit).map(Value::String)
        });

        (name, function)
    }))
}

fn calc_space(name: &str, base: f64, px: f64, unit: &str) -> anyhow::Result<String> {
    let size = match unit {
        "rem" | "em" => round(px / base, 2),
        "px" => px,
        "pt" => round(px * PT_IN_INCH / PX_IN_INCH, 2),
        "pc" => round(px / PX_IN_PC, 2),
        "in" => round(px / PX_IN_INCH, 2),
        "cm" => round(px / PX_IN_CM, 2),
        "mm" => round(px / PX_IN_MM, 1),
        _ => anyhow::bail!("spacing format not supported '{name}({unit})'"),
    };

    Ok(format!("{size}{unit}"))
}

fn round(n: f64, decimal_places: i32) -> f64 {
    let modifier = 10f64.powi(decimal_places);
    (n * modifier).round() / modifier
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::{substitute, Config};
    use pretty_assertions::assert_eq;

    fn render(text: &str) -> String {
        let layers = [Value::object([(
            "space",
            spacings([("sm", 8.0), ("md", 24.0), ("lg", 96.0)], SpacingOptions::default()),
        )])];

        substitute(&layers, text, &Config::default())
            .expect("must substitute")
            .text
    }

    #[test]
    fn default_unit() {
        assert_eq!(render("$space.md"), "1.5rem");
        assert_eq!(render("$space.sm"), "0.5rem");
    }

    #[test]
    fn explicit_units() {
        assert_eq!(
            render("$space.md(px) $space.md(em) $space.md(pt) $space.lg(in) $space.md(pc)"),
            "24px 1.5em 18pt 1in 1.5pc"
        );
    }

    #[test]
    fn custom_options() {
        let options = SpacingOptions {
            base: 8.0,
            default_unit: "em".to_string(),
        };
        let layers = [spacings([("md", 24.0)], options)];
        let text = substitute(&layers, "$md", &Config::default()).unwrap().text;

        assert_eq!(text, "3em");
    }

    #[test]
    fn unknown_unit_fails() {
        let layers = [spacings([("md", 24.0)], SpacingOptions::default())];
        let failure = substitute(&layers, "$md(furlong)", &Config::default()).unwrap_err();

        let source = std::error::Error::source(&failure.error).expect("call error has a source");
        assert_eq!(
            source.to_string(),
            "spacing format not supported 'md(furlong)'"
        );
    }
}
