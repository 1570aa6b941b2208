//! Ordered-fallback extraction over parsed HTML
//!
//! Markup on the source drifts between page templates, so every field is read
//! through a chain of strategies: the most specific structural match first, a
//! generic tag match last. The first strategy that yields a non-empty value wins;
//! when none does, callers fall back to a documented default instead of failing.

use crate::SweepError;
use scraper::{ElementRef, Selector};

/// Compiles a CSS selector, keeping the offending string in the error
pub fn compile(css: &str) -> Result<Selector, SweepError> {
    Selector::parse(css).map_err(|e| SweepError::Selector {
        css: css.to_string(),
        message: e.to_string(),
    })
}

/// Visible text of an element with runs of whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
enum Strategy {
    /// Text content of the matched element
    Text(Selector),
    /// Named attribute of the matched element
    Attr(Selector, String),
    /// Text content split on delimiters; a single value is the whole text
    Split(Selector, Vec<char>),
}

/// An ordered list of value extraction strategies
///
/// ```
/// use reel_sweep::crawler::FallbackChain;
/// use scraper::Html;
///
/// let chain = FallbackChain::new()
///     .text("span.title").unwrap()
///     .text("h2").unwrap();
///
/// let html = Html::parse_fragment("<li><h2> Dune </h2></li>");
/// assert_eq!(chain.resolve(html.root_element()), Some("Dune".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FallbackChain {
    strategies: Vec<Strategy>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy reading the element's text
    pub fn text(mut self, css: &str) -> Result<Self, SweepError> {
        self.strategies.push(Strategy::Text(compile(css)?));
        Ok(self)
    }

    /// Appends a strategy reading an attribute of the element
    pub fn attr(mut self, css: &str, name: &str) -> Result<Self, SweepError> {
        self.strategies
            .push(Strategy::Attr(compile(css)?, name.to_string()));
        Ok(self)
    }

    /// Appends a strategy reading a delimited text span
    pub fn split(mut self, css: &str, delimiters: &[char]) -> Result<Self, SweepError> {
        self.strategies
            .push(Strategy::Split(compile(css)?, delimiters.to_vec()));
        Ok(self)
    }

    /// Returns the first non-empty single value, trying strategies in order
    pub fn resolve(&self, scope: ElementRef<'_>) -> Option<String> {
        self.strategies
            .iter()
            .find_map(|strategy| first_value(strategy, scope))
    }

    /// Like [`resolve`](Self::resolve) but with a default for total failure
    pub fn resolve_or(&self, scope: ElementRef<'_>, default: &str) -> String {
        self.resolve(scope).unwrap_or_else(|| default.to_string())
    }

    /// Returns the first non-empty list of values, trying strategies in order
    ///
    /// Text and attribute strategies collect one value per matched element; a
    /// split strategy breaks the first non-empty match apart. Values are trimmed
    /// and duplicates removed, keeping first-seen order. Empty when every
    /// strategy comes up empty.
    pub fn resolve_list(&self, scope: ElementRef<'_>) -> Vec<String> {
        self.strategies
            .iter()
            .map(|strategy| all_values(strategy, scope))
            .find(|values| !values.is_empty())
            .unwrap_or_default()
    }
}

fn first_value(strategy: &Strategy, scope: ElementRef<'_>) -> Option<String> {
    match strategy {
        Strategy::Text(selector) | Strategy::Split(selector, _) => scope
            .select(selector)
            .map(element_text)
            .find(|text| !text.is_empty()),
        Strategy::Attr(selector, name) => scope
            .select(selector)
            .filter_map(|element| element.value().attr(name))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string),
    }
}

fn all_values(strategy: &Strategy, scope: ElementRef<'_>) -> Vec<String> {
    let values: Vec<String> = match strategy {
        Strategy::Text(selector) => scope.select(selector).map(element_text).collect(),
        Strategy::Attr(selector, name) => scope
            .select(selector)
            .filter_map(|element| element.value().attr(name))
            .map(str::to_string)
            .collect(),
        Strategy::Split(_, delimiters) => first_value(strategy, scope)
            .map(|text| {
                text.split(|c: char| delimiters.contains(&c))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };

    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !unique.iter().any(|seen| seen == value) {
            unique.push(value.to_string());
        }
    }
    unique
}

/// An ordered list of selectors for repeated elements
///
/// The first selector matching at least one element decides the whole result;
/// later selectors are never mixed in.
#[derive(Debug, Clone)]
pub struct ElementChain {
    selectors: Vec<Selector>,
}

impl ElementChain {
    pub fn new(css_list: &[&str]) -> Result<Self, SweepError> {
        let selectors = css_list
            .iter()
            .map(|css| compile(css))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// Elements matched by the first productive selector, in document order
    pub fn select<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .map(|selector| scope.select(selector).collect::<Vec<_>>())
            .find(|matches| !matches.is_empty())
            .unwrap_or_default()
    }
}
