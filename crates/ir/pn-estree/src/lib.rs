//! ESTree node vocabulary
//!
//! The output of lowering: an ESTree-shaped tree consumed by the JavaScript
//! runtime. Nodes serialize with a `"type"` discriminator and the field names
//! downstream code generation expects, so the serde attributes here are part
//! of the wire contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ESTree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Root of the output
    Program {
        /// Top-level statements
        body: Vec<Node>,
        /// Always `"module"`
        #[serde(rename = "sourceType")]
        source_type: String,
    },
    /// `let` / `const` declaration
    VariableDeclaration {
        /// Declarators, one per statement in practice
        declarations: Vec<Node>,
        /// Binding keyword
        kind: DeclarationKind,
    },
    /// `id = init` inside a declaration
    VariableDeclarator {
        /// Bound identifier or pattern
        id: Box<Node>,
        /// Initial value
        init: Option<Box<Node>>,
    },
    /// Expression used as a statement
    ExpressionStatement {
        /// The expression
        expression: Box<Node>,
    },
    /// `left = right`
    AssignmentExpression {
        /// Always `"="`
        operator: String,
        /// Assigned identifier, member or pattern
        left: Box<Node>,
        /// Assigned value
        right: Box<Node>,
    },
    /// Identifier
    Identifier {
        /// Identifier text
        name: String,
    },
    /// `object.property` or `object[property]`
    MemberExpression {
        /// Accessed object
        object: Box<Node>,
        /// Property identifier or index expression
        property: Box<Node>,
        /// True for `[]` access
        computed: bool,
    },
    /// Literal value with its source text
    Literal {
        /// JSON value
        value: Value,
        /// Textual form
        raw: String,
    },
    /// Arithmetic or comparison operation
    BinaryExpression {
        /// Operator symbol
        operator: String,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// Prefix operation
    UnaryExpression {
        /// Operator symbol
        operator: String,
        /// Always true
        prefix: bool,
        /// Operand
        argument: Box<Node>,
    },
    /// Function call
    CallExpression {
        /// Called expression
        callee: Box<Node>,
        /// Arguments in call order
        arguments: Vec<Node>,
    },
    /// `key: value` entry of an object literal
    Property {
        /// Property name
        key: Box<Node>,
        /// Property value
        value: Box<Node>,
        /// Always `"init"`
        kind: String,
        /// Always false
        method: bool,
        /// Always false
        shorthand: bool,
        /// Always false
        computed: bool,
    },
    /// Object literal
    ObjectExpression {
        /// `Property` nodes
        properties: Vec<Node>,
    },
    /// `test ? consequent : alternate`
    ConditionalExpression {
        /// Condition
        test: Box<Node>,
        /// Value when true
        consequent: Box<Node>,
        /// Value when false
        alternate: Box<Node>,
    },
    /// `&&` / `||`
    LogicalExpression {
        /// Operator symbol
        operator: String,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// `[a, b]` destructuring target
    ArrayPattern {
        /// Elements
        elements: Vec<Node>,
    },
    /// `(params) => { body }`
    ArrowFunctionExpression {
        /// Always null
        id: Option<Box<Node>>,
        /// Parameters
        params: Vec<Node>,
        /// Body block
        body: Box<Node>,
        /// Always false, the body is a block
        expression: bool,
        /// Always false
        generator: bool,
        /// Always false
        #[serde(rename = "async")]
        is_async: bool,
    },
    /// `{ ... }`
    BlockStatement {
        /// Statements
        body: Vec<Node>,
    },
    /// `return argument`
    ReturnStatement {
        /// Returned value
        argument: Option<Box<Node>>,
    },
    /// `while (test) body`
    WhileStatement {
        /// Loop condition
        test: Box<Node>,
        /// Body block
        body: Box<Node>,
    },
    /// `for (init; test; update) body`
    ForStatement {
        /// Loop variable declaration
        init: Box<Node>,
        /// Continuation test
        test: Box<Node>,
        /// Post-body update
        update: Box<Node>,
        /// Body block
        body: Box<Node>,
    },
    /// `argument++`
    UpdateExpression {
        /// Operator symbol
        operator: String,
        /// Updated identifier
        argument: Box<Node>,
        /// Always false
        prefix: bool,
    },
    /// `if (test) consequent else alternate`
    IfStatement {
        /// Condition
        test: Box<Node>,
        /// Then block
        consequent: Box<Node>,
        /// Else block or nested `if`
        alternate: Option<Box<Node>>,
    },
}

/// Binding keyword of a `VariableDeclaration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// Mutable binding
    Let,
    /// Constant binding
    Const,
}

impl Node {
    /// Value of the `"type"` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Program { .. } => "Program",
            Self::VariableDeclaration { .. } => "VariableDeclaration",
            Self::VariableDeclarator { .. } => "VariableDeclarator",
            Self::ExpressionStatement { .. } => "ExpressionStatement",
            Self::AssignmentExpression { .. } => "AssignmentExpression",
            Self::Identifier { .. } => "Identifier",
            Self::MemberExpression { .. } => "MemberExpression",
            Self::Literal { .. } => "Literal",
            Self::BinaryExpression { .. } => "BinaryExpression",
            Self::UnaryExpression { .. } => "UnaryExpression",
            Self::CallExpression { .. } => "CallExpression",
            Self::Property { .. } => "Property",
            Self::ObjectExpression { .. } => "ObjectExpression",
            Self::ConditionalExpression { .. } => "ConditionalExpression",
            Self::LogicalExpression { .. } => "LogicalExpression",
            Self::ArrayPattern { .. } => "ArrayPattern",
            Self::ArrowFunctionExpression { .. } => "ArrowFunctionExpression",
            Self::BlockStatement { .. } => "BlockStatement",
            Self::ReturnStatement { .. } => "ReturnStatement",
            Self::WhileStatement { .. } => "WhileStatement",
            Self::ForStatement { .. } => "ForStatement",
            Self::UpdateExpression { .. } => "UpdateExpression",
            Self::IfStatement { .. } => "IfStatement",
        }
    }

    /// Program of a module
    pub fn program(body: Vec<Self>) -> Self {
        Self::Program {
            body,
            source_type: "module".to_owned(),
        }
    }

    /// Identifier node
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    /// Non-computed `object.property`
    pub fn member(object: Self, property: impl Into<String>) -> Self {
        Self::MemberExpression {
            object: Box::new(object),
            property: Box::new(Self::identifier(property)),
            computed: false,
        }
    }

    /// Computed `object[index]`
    pub fn index(object: Self, index: Self) -> Self {
        Self::MemberExpression {
            object: Box::new(object),
            property: Box::new(index),
            computed: true,
        }
    }

    /// Literal node
    pub fn literal(value: Value, raw: impl Into<String>) -> Self {
        Self::Literal {
            value,
            raw: raw.into(),
        }
    }

    /// Single-declarator declaration
    pub fn declaration(kind: DeclarationKind, id: Self, init: Self) -> Self {
        Self::VariableDeclaration {
            declarations: vec![Self::VariableDeclarator {
                id: Box::new(id),
                init: Some(Box::new(init)),
            }],
            kind,
        }
    }

    /// `left = right` as a statement
    pub fn assignment(left: Self, right: Self) -> Self {
        Self::expression_statement(Self::AssignmentExpression {
            operator: "=".to_owned(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Expression statement
    pub fn expression_statement(expression: Self) -> Self {
        Self::ExpressionStatement {
            expression: Box::new(expression),
        }
    }

    /// Binary operation
    pub fn binary(operator: &str, left: Self, right: Self) -> Self {
        Self::BinaryExpression {
            operator: operator.to_owned(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Logical operation
    pub fn logical(operator: &str, left: Self, right: Self) -> Self {
        Self::LogicalExpression {
            operator: operator.to_owned(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Prefix unary operation
    pub fn unary(operator: &str, argument: Self) -> Self {
        Self::UnaryExpression {
            operator: operator.to_owned(),
            prefix: true,
            argument: Box::new(argument),
        }
    }

    /// Call expression
    pub fn call(callee: Self, arguments: Vec<Self>) -> Self {
        Self::CallExpression {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Object literal from `(key, value)` entries in order
    pub fn object(entries: impl IntoIterator<Item = (String, Self)>) -> Self {
        Self::ObjectExpression {
            properties: entries
                .into_iter()
                .map(|(key, value)| Self::Property {
                    key: Box::new(Self::identifier(key)),
                    value: Box::new(value),
                    kind: "init".to_owned(),
                    method: false,
                    shorthand: false,
                    computed: false,
                })
                .collect(),
        }
    }

    /// Block of statements
    pub fn block(body: Vec<Self>) -> Self {
        Self::BlockStatement { body }
    }

    /// `return argument`
    pub fn return_statement(argument: Self) -> Self {
        Self::ReturnStatement {
            argument: Some(Box::new(argument)),
        }
    }

    /// Block-bodied arrow function
    pub fn arrow(params: Vec<Self>, body: Vec<Self>) -> Self {
        Self::ArrowFunctionExpression {
            id: None,
            params,
            body: Box::new(Self::block(body)),
            expression: false,
            generator: false,
            is_async: false,
        }
    }

    /// `argument++`
    pub fn increment(argument: Self) -> Self {
        Self::UpdateExpression {
            operator: "++".to_owned(),
            argument: Box::new(argument),
            prefix: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_program_field_names() {
        let program = Node::program(vec![]);
        assert_eq!(
            serde_json::to_value(&program).unwrap(),
            json!({"type": "Program", "body": [], "sourceType": "module"})
        );
    }

    #[test]
    fn test_arrow_function_flags() {
        let arrow = Node::arrow(vec![Node::identifier("x")], vec![]);
        assert_eq!(
            serde_json::to_value(&arrow).unwrap(),
            json!({
                "type": "ArrowFunctionExpression",
                "id": null,
                "params": [{"type": "Identifier", "name": "x"}],
                "body": {"type": "BlockStatement", "body": []},
                "expression": false,
                "generator": false,
                "async": false
            })
        );
    }

    #[test]
    fn test_declaration_kind_lowercase() {
        let decl = Node::declaration(
            DeclarationKind::Const,
            Node::identifier("f"),
            Node::literal(json!(1), "1"),
        );
        let value = serde_json::to_value(&decl).unwrap();
        assert_eq!(value["kind"], json!("const"));
        assert_eq!(value["declarations"][0]["type"], json!("VariableDeclarator"));
        assert_eq!(value["declarations"][0]["id"]["name"], json!("f"));
    }

    #[test]
    fn test_object_properties() {
        let object = Node::object([("title".to_owned(), Node::literal(json!("Len"), "\"Len\""))]);
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({
                "type": "ObjectExpression",
                "properties": [{
                    "type": "Property",
                    "key": {"type": "Identifier", "name": "title"},
                    "value": {"type": "Literal", "value": "Len", "raw": "\"Len\""},
                    "kind": "init",
                    "method": false,
                    "shorthand": false,
                    "computed": false
                }]
            })
        );
    }

    #[test]
    fn test_if_without_alternate_serializes_null() {
        let stmt = Node::IfStatement {
            test: Box::new(Node::identifier("a")),
            consequent: Box::new(Node::block(vec![])),
            alternate: None,
        };
        let value = serde_json::to_value(&stmt).unwrap();
        assert_eq!(value["alternate"], Value::Null);
        assert_eq!(stmt.kind(), "IfStatement");
    }
}
