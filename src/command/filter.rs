use std::fmt;

/// Options attached to a structured filter description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOptions {
    /// Passed through verbatim after `=`
    Raw(String),
    /// Positional values, joined with `:`
    List(Vec<String>),
    /// Named values in insertion order, rendered as `key=value` pairs joined with `:`
    Map(Vec<(String, String)>),
}

/// Structured filter description, normalized to `filter[=options]` before it is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub filter: String,
    pub options: Option<FilterOptions>,
}

impl FilterDescriptor {
    pub fn new<S: Into<String>>(filter: S) -> Self {
        Self {
            filter: filter.into(),
            options: None,
        }
    }

    /// Set a raw option string, e.g. `"w=640:h=480"`
    pub fn with_options<S: Into<String>>(mut self, options: S) -> Self {
        self.options = Some(FilterOptions::Raw(options.into()));
        self
    }

    /// Set positional option values
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(FilterOptions::List(
            args.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Add a named option after any options set so far.
    ///
    /// Named options accumulate; raw or positional options set earlier are kept in
    /// front, as in `pad=640:480:x=0`.
    pub fn option<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        let pair = (key.into(), value.into());
        self.options = Some(match self.options.take() {
            Some(FilterOptions::Map(mut pairs)) => {
                pairs.push(pair);
                FilterOptions::Map(pairs)
            }
            Some(earlier) if !earlier.is_empty() => {
                let rendered = format_options(&FilterOptions::Map(vec![pair]));
                FilterOptions::Raw(format!("{}:{}", format_options(&earlier), rendered))
            }
            _ => FilterOptions::Map(vec![pair]),
        });
        self
    }
}

impl FilterOptions {
    fn is_empty(&self) -> bool {
        match self {
            FilterOptions::Raw(raw) => raw.is_empty(),
            FilterOptions::List(values) => values.is_empty(),
            FilterOptions::Map(pairs) => pairs.is_empty(),
        }
    }
}

fn format_options(options: &FilterOptions) -> String {
    match options {
        FilterOptions::Raw(raw) => raw.clone(),
        FilterOptions::List(values) => values
            .iter()
            .map(|value| escape_filter_value(value))
            .collect::<Vec<_>>()
            .join(":"),
        FilterOptions::Map(pairs) => pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, escape_filter_value(value)))
            .collect::<Vec<_>>()
            .join(":"),
    }
}

impl fmt::Display for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.options.as_ref().map(format_options).unwrap_or_default();

        if options.is_empty() {
            write!(f, "{}", self.filter)
        } else {
            write!(f, "{}={}", self.filter, options)
        }
    }
}

/// One item accepted by the filter-building methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    /// Already formatted filter, e.g. `"volume=2"`
    Raw(String),
    Descriptor(FilterDescriptor),
}

impl FilterSpec {
    pub fn to_filter_string(&self) -> String {
        match self {
            FilterSpec::Raw(raw) => raw.clone(),
            FilterSpec::Descriptor(descriptor) => descriptor.to_string(),
        }
    }
}

impl From<&str> for FilterSpec {
    fn from(value: &str) -> Self {
        FilterSpec::Raw(value.to_string())
    }
}

impl From<String> for FilterSpec {
    fn from(value: String) -> Self {
        FilterSpec::Raw(value)
    }
}

impl From<&String> for FilterSpec {
    fn from(value: &String) -> Self {
        FilterSpec::Raw(value.clone())
    }
}

impl From<FilterDescriptor> for FilterSpec {
    fn from(value: FilterDescriptor) -> Self {
        FilterSpec::Descriptor(value)
    }
}

/// Normalize filter items into canonical filter tokens, one token per item
pub fn make_filter_strings<I, F>(filters: I) -> Vec<String>
where
    I: IntoIterator<Item = F>,
    F: Into<FilterSpec>,
{
    filters
        .into_iter()
        .map(|filter| filter.into().to_filter_string())
        .collect()
}

/// Escape a structured option value for both levels of filtergraph parsing.
///
/// The filter's option parser splits on `:` and unescapes `\` sequences, so `\`, `'` and `:`
/// are backslash-escaped first. The chain parser splits on `,`, `;` and brackets and strips
/// one level of quoting before that, so a value holding any reserved character is then
/// wrapped in single quotes, with embedded quotes written as `'\''`.
fn escape_filter_value(value: &str) -> String {
    if !value.contains(FILTERGRAPH_RESERVED) {
        return value.to_string();
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'' | ':') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    format!("'{}'", escaped.replace('\'', r"'\''"))
}

const FILTERGRAPH_RESERVED: &[char] = &['\\', '\'', ':', ',', ';', '[', ']'];
