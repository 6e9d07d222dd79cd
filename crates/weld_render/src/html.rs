//! Minimal HTML element builder.

use std::fmt::Write;

/// Escapes text for use inside a double-quoted attribute value.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// An element under construction.
///
/// Attributes render in insertion order. `None` values are skipped, flags
/// render bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
}

impl Element {
    /// Starts an element with the given tag name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    /// Adds `name="value"`.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, Some(value.into())));
        self
    }

    /// Adds `name="value"` if `value` is present.
    pub fn opt_attr(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Adds a bare boolean attribute when `on` is set.
    pub fn flag(mut self, name: &'static str, on: bool) -> Self {
        if on {
            self.attrs.push((name, None));
        }
        self
    }

    /// Renders the opening tag.
    pub fn open(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (name, value) in &self.attrs {
            match value {
                Some(value) => {
                    let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
                }
                None => {
                    let _ = write!(out, " {name}");
                }
            }
        }
        out.push('>');
        out
    }

    /// Renders the opening tag, raw `body`, and the closing tag.
    pub fn wrap(&self, body: &str) -> String {
        format!("{}{body}</{}>", self.open(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_attribute_values() {
        assert_eq!(
            escape_attr(r#"a&b<c>"d'"#),
            "a&amp;b&lt;c&gt;&quot;d&#039;"
        );
    }

    #[test]
    fn renders_attributes_in_order() {
        let el = Element::new("script")
            .flag("async", true)
            .flag("defer", false)
            .opt_attr("nonce", None)
            .attr("src", "/a.js?1");
        assert_eq!(el.wrap(""), r#"<script async src="/a.js?1"></script>"#);
    }

    #[test]
    fn void_element() {
        let el = Element::new("link").attr("title", "a \"b\"");
        assert_eq!(el.open(), r#"<link title="a &quot;b&quot;">"#);
    }
}
