//! `input.*` argument normalization
//!
//! Pine's `input.int(defval=5, title="Len")` passes its default value by
//! keyword, but the runtime expects it as the first positional argument.
//! [`normalize`] moves a `defval` keyword into that slot for the family of
//! input functions that take one.

use indexmap::IndexMap;
use pn_estree::Node;

/// Input variants whose first positional parameter is `defval`
pub const DEFVAL_VARIANTS: [&str; 10] = [
    "source",
    "int",
    "float",
    "bool",
    "string",
    "color",
    "time",
    "symbol",
    "session",
    "timeframe",
];

/// Keyword moved into the first positional slot
pub const DEFVAL: &str = "defval";

/// Call arguments after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedArgs {
    /// Positional arguments, `defval` first when it was spliced
    pub positional: Vec<Node>,
    /// Remaining keyword arguments in source order
    pub named: IndexMap<String, Node>,
    /// Whether a `defval` keyword was moved
    pub spliced_defval: bool,
}

/// Variant name when `callee` is `input.<variant>` for a defval-taking variant
pub fn input_variant(callee: &Node) -> Option<&str> {
    let Node::MemberExpression {
        object,
        property,
        computed: false,
    } = callee
    else {
        return None;
    };
    let (Node::Identifier { name: root }, Node::Identifier { name: variant }) =
        (object.as_ref(), property.as_ref())
    else {
        return None;
    };
    (root == "input" && DEFVAL_VARIANTS.contains(&variant.as_str())).then_some(variant.as_str())
}

/// Rewrite the arguments of a call to `callee`
///
/// Calls that are not defval-taking input functions come back unchanged.
pub fn normalize(
    callee: &Node,
    mut positional: Vec<Node>,
    mut named: IndexMap<String, Node>,
) -> NormalizedArgs {
    if input_variant(callee).is_none() {
        return NormalizedArgs {
            positional,
            named,
            spliced_defval: false,
        };
    }

    let defval = named.shift_remove(DEFVAL);
    let spliced_defval = defval.is_some();
    if let Some(defval) = defval {
        positional.insert(0, defval);
    }

    NormalizedArgs {
        positional,
        named,
        spliced_defval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input_member(variant: &str) -> Node {
        Node::member(Node::identifier("input"), variant)
    }

    fn int_literal(value: i64) -> Node {
        Node::literal(json!(value), value.to_string())
    }

    #[test]
    fn test_recognizes_variants() {
        for variant in DEFVAL_VARIANTS {
            assert_eq!(input_variant(&input_member(variant)), Some(variant));
        }
        assert_eq!(input_variant(&input_member("text_area")), None);
        assert_eq!(input_variant(&Node::identifier("input")), None);
        assert_eq!(
            input_variant(&Node::member(Node::identifier("ta"), "int")),
            None
        );
        assert_eq!(
            input_variant(&Node::index(
                Node::identifier("input"),
                Node::identifier("int")
            )),
            None
        );
    }

    #[test]
    fn test_defval_spliced_first() {
        let mut named = IndexMap::new();
        named.insert("title".to_owned(), Node::identifier("t"));
        named.insert("defval".to_owned(), int_literal(14));
        named.insert("minval".to_owned(), int_literal(1));

        let result = normalize(&input_member("int"), vec![Node::identifier("p")], named);

        assert!(result.spliced_defval);
        assert_eq!(result.positional, vec![int_literal(14), Node::identifier("p")]);
        let keys: Vec<_> = result.named.keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "minval"]);
    }

    #[test]
    fn test_without_defval_unchanged() {
        let mut named = IndexMap::new();
        named.insert("title".to_owned(), Node::identifier("t"));

        let result = normalize(&input_member("int"), vec![int_literal(5)], named.clone());

        assert!(!result.spliced_defval);
        assert_eq!(result.positional, vec![int_literal(5)]);
        assert_eq!(result.named, named);
    }

    #[test]
    fn test_other_callee_keeps_defval() {
        let mut named = IndexMap::new();
        named.insert("defval".to_owned(), int_literal(1));

        let result = normalize(&Node::identifier("plot"), vec![], named);

        assert!(!result.spliced_defval);
        assert!(result.positional.is_empty());
        assert!(result.named.contains_key("defval"));
    }
}
