use crate::config::ElementSelector;
use crate::error::{Error, Result};
use scraper::{ElementRef, Selector};

/// Compiles a configured selector into a `scraper` selector
pub fn compile(selector: &ElementSelector) -> Result<Selector> {
    compile_css(&selector.to_css())
}

pub fn compile_opt(selector: Option<&ElementSelector>) -> Result<Option<Selector>> {
    selector.map(compile).transpose()
}

pub fn compile_css(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        ::log::debug!("Rejected selector {:?}: {:?}", css, e);
        Error::Selector(css.to_string())
    })
}

/// First descendant of `element` matching `selector`
pub fn find_first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Value of an attribute, if present
pub fn attribute<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Joins the text nodes below `element` with `separator`.
///
/// With `trim` set each text node is trimmed and empty nodes are dropped.
pub fn element_text(element: ElementRef<'_>, separator: &str, trim: bool) -> String {
    if trim {
        element
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    } else {
        element.text().collect::<Vec<_>>().join(separator)
    }
}

/// Text of `element` on a single line, or `None` when it has no visible text
pub fn inline_text(element: ElementRef<'_>) -> Option<String> {
    let text = super::text::collapse_whitespace(&element_text(element, " ", true));
    if text.is_empty() { None } else { Some(text) }
}

/// Text of `element` with one line per text node, or `None` when empty
pub fn block_text(element: ElementRef<'_>) -> Option<String> {
    let text = element_text(element, "\n", true);
    if text.is_empty() { None } else { Some(text) }
}
