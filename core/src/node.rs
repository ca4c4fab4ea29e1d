//! Page content as a tree of nodes.
//!
//! # Design
//! A `Node` is either a text leaf or an `Element` with a tag, attributes and
//! ordered children. Attributes keep insertion order in a `Vec` so encoded
//! output is stable; keys stay unique because every setter replaces an
//! existing entry. Conversion to and from the wire JSON lives in `codec`.

/// One unit of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// A tagged node such as `p`, `a` or `figure`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    /// Text leaf for `value`. Empty text produces no node.
    pub fn text(value: impl Into<String>) -> Option<Node> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Node::Text(value))
        }
    }

    /// Element node. Children given as `None` are skipped, so the result of
    /// `Node::text` can be passed straight through.
    pub fn element<K, V, C>(
        tag: impl Into<String>,
        attrs: impl IntoIterator<Item = (K, V)>,
        children: impl IntoIterator<Item = C>,
    ) -> Node
    where
        K: Into<String>,
        V: Into<String>,
        C: Into<Option<Node>>,
    {
        let mut element = Element::new(tag);
        for (key, value) in attrs {
            element.set_attr(key, value);
        }
        element.children = children.into_iter().filter_map(Into::into).collect();
        Node::Element(element)
    }

    /// The string value of a text node; `None` for elements.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(value) => Some(value),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child unless `text` is empty.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if let Some(node) = Node::text(text) {
            self.children.push(node);
        }
        self
    }

    /// Set `key` to `value`, replacing an existing entry in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_from_empty_string_is_no_node() {
        assert_eq!(Node::text(""), None);
        assert_eq!(Node::text("Hello"), Some(Node::Text("Hello".to_string())));
    }

    #[test]
    fn as_text_narrows_without_error() {
        let text = Node::Text("Hello".to_string());
        let element = Node::from(Element::new("p"));
        assert_eq!(text.as_text(), Some("Hello"));
        assert_eq!(element.as_text(), None);
        assert!(text.as_element().is_none());
    }

    #[test]
    fn element_skips_absent_children() {
        let node = Node::element(
            "p",
            [("class", "lead")],
            [Node::text("one"), Node::text(""), Node::text("two")],
        );
        let element = node.as_element().unwrap();
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.children[1].as_text(), Some("two"));
        assert_eq!(element.attr("class"), Some("lead"));
    }

    #[test]
    fn element_with_no_attrs_or_children() {
        let node = Node::element("hr", Vec::<(String, String)>::new(), Vec::<Node>::new());
        let element = node.as_element().unwrap();
        assert_eq!(element.tag, "hr");
        assert!(element.attrs.is_empty());
        assert!(element.children.is_empty());
    }

    #[test]
    fn set_attr_keeps_keys_unique_and_order_stable() {
        let element = Element::new("a")
            .with_attr("href", "http://a")
            .with_attr("target", "_blank")
            .with_attr("href", "http://b");
        assert_eq!(
            element.attrs,
            vec![
                ("href".to_string(), "http://b".to_string()),
                ("target".to_string(), "_blank".to_string()),
            ]
        );
    }

    #[test]
    fn with_text_ignores_empty() {
        let element = Element::new("p").with_text("").with_text("Hi");
        assert_eq!(element.children, vec![Node::Text("Hi".to_string())]);
    }

    #[test]
    fn push_appends_to_fetched_paragraph() {
        let mut content = vec![Node::from(Element::new("p").with_text("Hello, world!"))];
        content[0]
            .as_element_mut()
            .unwrap()
            .push(Element::new("p").with_text("Second line."));
        let first = content[0].as_element().unwrap();
        assert_eq!(first.children.len(), 2);
        assert_eq!(first.children[1].as_element().unwrap().tag, "p");
    }
}
