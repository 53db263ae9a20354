use crate::{MatterError, SourceLocation};
use log::trace;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

type JsonMap = Map<String, JsonValue>;

const DEFAULT_DELIMITER: &str = "---";
const DEFAULT_LANGUAGE: &str = "yaml";

/// Result of splitting a document into front matter and body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matter {
    /// Parsed header as a mapping (empty when the document has none).
    pub data: JsonMap,
    /// Document body following the header.
    pub content: String,
    /// Raw header text between the delimiters.
    pub matter: String,
    /// Engine used to parse the header.
    pub language: String,
    /// Leading slice of the body, when excerpts are requested.
    pub excerpt: Option<String>,
    /// True when a header was present but held no data.
    pub is_empty: bool,
}

impl Matter {
    fn without_header(content: &str, language: &str) -> Self {
        Self {
            data: JsonMap::new(),
            content: content.to_string(),
            matter: String::new(),
            language: language.to_string(),
            excerpt: None,
            is_empty: false,
        }
    }
}

/// How the excerpt of a document is located.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Excerpt {
    /// No excerpt unless a separator is configured.
    #[default]
    Disabled,
    /// Excerpt ends at the configured separator or the open delimiter.
    Enabled,
    /// Excerpt ends at this separator.
    Separator(String),
}

/// Typed view of the parser options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatterOptions {
    /// Delimiter opening the header.
    pub open: String,
    /// Delimiter closing the header.
    pub close: String,
    /// Engine used when the opening line names none.
    pub language: String,
    /// Excerpt mode.
    pub excerpt: Excerpt,
    /// Separator ending the excerpt.
    pub excerpt_separator: Option<String>,
}

impl Default for MatterOptions {
    fn default() -> Self {
        Self {
            open: DEFAULT_DELIMITER.to_string(),
            close: DEFAULT_DELIMITER.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            excerpt: Excerpt::Disabled,
            excerpt_separator: None,
        }
    }
}

impl MatterOptions {
    /// Reads the recognized keys out of a loosely typed option map.
    ///
    /// Keys with an unexpected shape keep their default; unknown keys are ignored.
    pub fn from_map(options: &JsonMap) -> Self {
        let mut parsed = Self::default();

        match options.get("delimiters") {
            Some(JsonValue::String(delimiter)) => {
                parsed.open = delimiter.clone();
                parsed.close = delimiter.clone();
            }
            Some(JsonValue::Array(items)) => {
                let mut names = items.iter().filter_map(JsonValue::as_str);
                if let Some(open) = names.next() {
                    parsed.open = open.to_string();
                    parsed.close = names.next().unwrap_or(open).to_string();
                }
            }
            _ => {}
        }

        if let Some(language) = options.get("language").and_then(JsonValue::as_str) {
            parsed.language = language.to_string();
        }

        parsed.excerpt = match options.get("excerpt") {
            Some(JsonValue::Bool(true)) => Excerpt::Enabled,
            Some(JsonValue::String(separator)) => Excerpt::Separator(separator.clone()),
            _ => Excerpt::Disabled,
        };

        parsed.excerpt_separator = options
            .get("excerpt_separator")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        parsed
    }
}

/// Splits `input` into front matter and body using loosely typed options.
pub fn parse_matter(input: &str, options: &JsonMap) -> Result<Matter, MatterError> {
    parse_matter_with(input, &MatterOptions::from_map(options))
}

/// Splits `input` into front matter and body.
pub fn parse_matter_with(input: &str, options: &MatterOptions) -> Result<Matter, MatterError> {
    let text = input.strip_prefix('\u{feff}').unwrap_or(input);

    let Some(after_open) = opening_rest(text, &options.open) else {
        let mut matter = Matter::without_header(text, &options.language);
        matter.excerpt = excerpt(&matter.content, &matter.data, options);
        return Ok(matter);
    };

    let (language, rest) = split_language(after_open, &options.language);
    let close = format!("\n{}", options.close);

    let (header, content) = match rest.find(&close) {
        Some(index) => {
            let body = &rest[index + close.len()..];
            let body = body.strip_prefix('\r').unwrap_or(body);
            let body = body.strip_prefix('\n').unwrap_or(body);
            (&rest[..index], body)
        }
        None => (rest, ""),
    };

    let is_empty = is_blank_header(header);
    let data = if is_empty {
        JsonMap::new()
    } else {
        parse_engine(&language, header)?
    };
    trace!("parsed {} front matter with {} key(s)", language, data.len());

    let excerpt = excerpt(content, &data, options);
    Ok(Matter {
        data,
        content: content.to_string(),
        matter: header.to_string(),
        language,
        excerpt,
        is_empty,
    })
}

/// Returns the text after the opening delimiter when `text` starts with a header.
fn opening_rest<'a>(text: &'a str, open: &str) -> Option<&'a str> {
    if open.is_empty() {
        return None;
    }
    let rest = text.strip_prefix(open)?;
    // `----` is a thematic break, not a fence.
    match open.chars().last() {
        Some(last) if rest.starts_with(last) => None,
        _ => Some(rest),
    }
}

fn split_language<'a>(rest: &'a str, fallback: &str) -> (String, &'a str) {
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let raw = rest[..line_end].trim_end_matches('\r');
    let name = raw.trim();
    if name.is_empty() {
        (fallback.to_string(), rest)
    } else {
        (name.to_string(), &rest[raw.len()..])
    }
}

fn is_blank_header(header: &str) -> bool {
    header
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

fn parse_engine(language: &str, header: &str) -> Result<JsonMap, MatterError> {
    let value = match language.to_ascii_lowercase().as_str() {
        "yaml" | "yml" => parse_yaml(header)?,
        "json" => parse_json(header)?,
        "toml" => parse_toml(header)?,
        _ => return Err(MatterError::UnknownEngine(language.to_string())),
    };

    match value {
        JsonValue::Null => Ok(JsonMap::new()),
        JsonValue::Object(map) => Ok(map),
        _ => Err(MatterError::InvalidRootType),
    }
}

fn parse_yaml(header: &str) -> Result<JsonValue, MatterError> {
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(header).map_err(|err| {
        let location = err
            .location()
            .map(|loc| SourceLocation::new(loc.line(), loc.column()));
        MatterError::parse("yaml", err.to_string(), location)
    })?;
    serde_json::to_value(yaml_value)
        .map_err(|err| MatterError::parse("yaml", err.to_string(), None))
}

fn parse_json(header: &str) -> Result<JsonValue, MatterError> {
    serde_json::from_str(header).map_err(|err| {
        let location = SourceLocation::new(err.line(), err.column());
        MatterError::parse("json", err.to_string(), Some(location))
    })
}

fn parse_toml(header: &str) -> Result<JsonValue, MatterError> {
    let table: toml::Table = header.parse().map_err(|err: toml::de::Error| {
        let location = err
            .span()
            .map(|span| SourceLocation::from_offset(header, span.start));
        MatterError::parse("toml", err.message(), location)
    })?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

fn toml_to_json(value: toml::Value) -> JsonValue {
    match value {
        toml::Value::String(text) => JsonValue::String(text),
        toml::Value::Integer(number) => JsonValue::from(number),
        toml::Value::Float(number) => serde_json::Number::from_f64(number)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        toml::Value::Boolean(flag) => JsonValue::Bool(flag),
        toml::Value::Datetime(datetime) => JsonValue::String(datetime.to_string()),
        toml::Value::Array(items) => {
            JsonValue::Array(items.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => JsonValue::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn excerpt(content: &str, data: &JsonMap, options: &MatterOptions) -> Option<String> {
    let separator = data
        .get("excerpt_separator")
        .and_then(JsonValue::as_str)
        .or(options.excerpt_separator.as_deref());

    // An empty separator still requests an excerpt, ending at the open delimiter.
    let delimiter = match (&options.excerpt, separator) {
        (Excerpt::Separator(custom), _) => custom.as_str(),
        (Excerpt::Disabled, None) => return None,
        (_, Some(separator)) if !separator.is_empty() => separator,
        _ => options.open.as_str(),
    };

    content
        .find(delimiter)
        .map(|index| content[..index].to_string())
}
