//! collection of value map layers ([Value] and path to source file)
//!
//! [Layers] tracks
//! - the source path
//! - the parsed value map
//!
//! in priority order: the first inserted layer shadows all later ones.
use crate::value::Value;
use std::path::Path;

#[derive(Default, Debug)]
pub struct Layers {
    sources: Vec<Source>,
    values: Vec<Value>,
}

/// File formats a value map can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Hcl,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "hcl" => Some(Format::Hcl),
            _ => None,
        }
    }

    pub fn parse(self, contents: &str) -> Result<Value, LoadError> {
        let value: Value = match self {
            Format::Json => serde_json::from_str::<serde_json::Value>(contents)?.into(),
            Format::Yaml => serde_yaml::from_str::<serde_yaml::Value>(contents)?.into(),
            Format::Hcl => hcl::from_str::<hcl::Value>(contents)?.into(),
        };
        Ok(value)
    }
}

impl Layers {
    /// Appends a layer with lower priority than all existing ones
    pub fn insert(&mut self, layer: Value, path: impl Into<Option<std::path::PathBuf>>) {
        if !matches!(layer, Value::Object(_)) {
            tracing::warn!(kind = layer.type_name(), "layer is not an object, no path will match");
        }

        self.sources.push(path.into());
        self.values.push(layer);
    }

    pub fn load_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let format = Format::from_path(file_path)
            .ok_or_else(|| LoadError::UnsupportedFormat(file_path.to_path_buf()))?;

        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), ?format, "loading value map");

        let file_contents = std::fs::read_to_string(&file_path)?;
        let layer = format.parse(&file_contents)?;

        self.insert(layer, Some(file_path));
        Ok(())
    }

    /// All layers in priority order, ready for [crate::engine::substitute]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Source, &Value)> {
        self.sources.iter().zip(&self.values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Unsupported value map format: {}", .0.display())]
    UnsupportedFormat(std::path::PathBuf),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse json value map")]
    JsonParseFailed(#[from] serde_json::Error),
    #[error("Unable to parse yaml value map")]
    YamlParseFailed(#[from] serde_yaml::Error),
    #[error("Unable to parse hcl value map")]
    HclParseFailed(#[from] hcl::Error),
}

impl From<Value> for Layers {
    fn from(value: Value) -> Self {
        let mut layers = Layers::default();
        layers.insert(value, None);
        layers
    }
}

pub type Source = Option<std::path::PathBuf>;

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::{substitute, Config};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn format_by_extension() {
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("dir/a.hcl")), Some(Format::Hcl));
        assert_eq!(Format::from_path(Path::new("a.toml")), None);
        assert_eq!(Format::from_path(Path::new("json")), None);
    }

    #[test]
    fn layers_from_each_format() {
        let mut layers = Layers::default();
        layers.insert(
            Format::Hcl
                .parse("theme = {\n  green = \"forestgreen\"\n}\n")
                .unwrap(),
            None,
        );
        layers.insert(
            Format::Yaml.parse("theme:\n  green: lime\n  red: indianred\n").unwrap(),
            None,
        );
        layers.insert(
            Format::Json
                .parse(r#"{"theme": {"blue": "steelblue", "size": 12}}"#)
                .unwrap(),
            None,
        );

        let text = substitute(
            layers.as_slice(),
            "$theme.green $theme.red $theme.blue $theme.size",
            &Config::default(),
        )
        .unwrap()
        .text;

        assert_eq!(text, "forestgreen indianred steelblue 12");
        assert_eq!(layers.len(), 3);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Format::Json.parse("{"),
            Err(LoadError::JsonParseFailed(_))
        ));
        assert!(matches!(
            Format::Yaml.parse("a: [unclosed"),
            Err(LoadError::YamlParseFailed(_))
        ));
        assert!(matches!(
            Format::Hcl.parse("not = valid = hcl"),
            Err(LoadError::HclParseFailed(_))
        ));
    }

    #[test]
    fn unsupported_file() {
        let err = Layers::default()
            .load_file(Path::new("tokens.toml"))
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn sources_are_tracked() {
        let mut layers = Layers::from(Value::object([("a", 1)]));
        layers.insert(Value::object([("b", 2)]), PathBuf::from("b.json"));

        let sources: Vec<_> = layers.iter().map(|(source, _)| source.clone()).collect();
        assert_eq!(sources, vec![None, Some(PathBuf::from("b.json"))]);
    }
}
