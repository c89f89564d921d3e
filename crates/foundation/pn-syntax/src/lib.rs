//! Pine syntax tree as emitted by the external grammar parser
//!
//! The parser dumps its tree as JSON where every node is an object carrying a
//! `"node"` discriminator naming the node class. This crate provides the
//! closed set of node kinds that the lowering pass understands, including the
//! kinds it deliberately rejects, so that every well-formed dump deserializes.

use serde::{Deserialize, Serialize};

mod op;

pub use op::Operator;

/// A node of the Pine syntax tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum SourceNode {
    /// Root of a script
    Script {
        /// Top-level statements
        body: Vec<SourceNode>,
        /// `//@version` style annotations
        #[serde(default)]
        annotations: Vec<String>,
    },
    /// Initial assignment (`x = 1`)
    Assign {
        /// Name or tuple being bound
        target: Box<SourceNode>,
        /// Assigned value
        value: Box<SourceNode>,
        /// Annotations attached to the declaration
        #[serde(default)]
        annotations: Vec<String>,
    },
    /// Explicit reassignment (`x := 1`)
    ReAssign {
        /// Name or tuple being rebound
        target: Box<SourceNode>,
        /// Assigned value
        value: Box<SourceNode>,
    },
    /// Identifier reference
    Name {
        /// Identifier text
        id: String,
    },
    /// Literal value
    Constant {
        /// The literal
        value: ConstantValue,
    },
    /// Arithmetic operation
    BinOp {
        /// Left operand
        left: Box<SourceNode>,
        /// Operator
        op: Operator,
        /// Right operand
        right: Box<SourceNode>,
    },
    /// Prefix operation
    UnaryOp {
        /// Operator
        op: Operator,
        /// Operand
        operand: Box<SourceNode>,
    },
    /// `and` / `or` over two or more operands
    BoolOp {
        /// Operator
        op: Operator,
        /// Operands, in source order
        values: Vec<SourceNode>,
    },
    /// Comparison
    Compare {
        /// Left operand
        left: Box<SourceNode>,
        /// Operators, one per comparator
        ops: Vec<Operator>,
        /// Right operands
        comparators: Vec<SourceNode>,
    },
    /// Function call
    Call {
        /// Callee expression
        func: Box<SourceNode>,
        /// Arguments, usually `Arg` nodes
        #[serde(default)]
        args: Vec<SourceNode>,
    },
    /// Attribute access (`a.b`)
    Attribute {
        /// Accessed object
        value: Box<SourceNode>,
        /// Attribute name
        attr: String,
    },
    /// Expression used as a statement
    Expr {
        /// The expression
        value: Box<SourceNode>,
    },
    /// Ternary expression (`cond ? a : b`)
    Conditional {
        /// Condition
        test: Box<SourceNode>,
        /// Value when true
        body: Box<SourceNode>,
        /// Value when false
        orelse: Box<SourceNode>,
    },
    /// History/index access (`a[1]`)
    Subscript {
        /// Indexed object
        value: Box<SourceNode>,
        /// Index expression
        slice: Box<SourceNode>,
    },
    /// Tuple (`[a, b]`), used as an assignment target
    Tuple {
        /// Elements
        elts: Vec<SourceNode>,
    },
    /// Function definition (`f(a, b) => ...`)
    FunctionDef {
        /// Function name
        name: String,
        /// Parameters, `Param` nodes
        #[serde(default)]
        args: Vec<SourceNode>,
        /// Body statements
        body: Vec<SourceNode>,
        /// Declared with `method`
        #[serde(default)]
        method: bool,
        /// Declared with `export`
        #[serde(default)]
        export: bool,
        /// Annotations attached to the definition
        #[serde(default)]
        annotations: Vec<String>,
    },
    /// Function parameter
    Param {
        /// Parameter name
        name: String,
    },
    /// Call argument, positional when `name` is absent
    Arg {
        /// Argument value
        value: Box<SourceNode>,
        /// Keyword, for named arguments
        #[serde(default)]
        name: Option<String>,
    },
    /// `while` loop
    While {
        /// Loop condition
        test: Box<SourceNode>,
        /// Body statements
        body: Vec<SourceNode>,
    },
    /// `if` statement
    If {
        /// Condition
        test: Box<SourceNode>,
        /// Body statements
        body: Vec<SourceNode>,
        /// Else arm
        #[serde(default)]
        orelse: Option<ElseArm>,
    },
    /// Counted loop (`for i = a to b [by s]`)
    ForTo {
        /// Loop variable
        target: Box<SourceNode>,
        /// Start bound
        start: Box<SourceNode>,
        /// Inclusive end bound
        end: Box<SourceNode>,
        /// Step, when written
        #[serde(default)]
        step: Option<Box<SourceNode>>,
        /// Body statements
        body: Vec<SourceNode>,
    },
    /// Comment, dropped during lowering
    Comment {
        /// Comment text
        #[serde(default)]
        value: String,
    },
    /// Augmented assignment (`x += 1`)
    AugAssign {},
    /// `for x in xs` loop
    ForIn {},
    /// `switch` statement
    Switch {},
    /// `break`
    Break {},
    /// `continue`
    Continue {},
    /// `import` statement
    Import {},
    /// `type` definition
    TypeDef {},
}

/// Else arm of an `if` statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElseArm {
    /// `else if`, a nested conditional
    Elif(Box<SourceNode>),
    /// Terminal `else` block
    Block(Vec<SourceNode>),
}

/// Literal payload of a `Constant` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    /// `true` / `false`
    Bool(bool),
    /// Integral literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// String literal
    Str(String),
    /// `na`
    Null,
}

impl SourceNode {
    /// Node class name, as written in the `"node"` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Script { .. } => "Script",
            Self::Assign { .. } => "Assign",
            Self::ReAssign { .. } => "ReAssign",
            Self::Name { .. } => "Name",
            Self::Constant { .. } => "Constant",
            Self::BinOp { .. } => "BinOp",
            Self::UnaryOp { .. } => "UnaryOp",
            Self::BoolOp { .. } => "BoolOp",
            Self::Compare { .. } => "Compare",
            Self::Call { .. } => "Call",
            Self::Attribute { .. } => "Attribute",
            Self::Expr { .. } => "Expr",
            Self::Conditional { .. } => "Conditional",
            Self::Subscript { .. } => "Subscript",
            Self::Tuple { .. } => "Tuple",
            Self::FunctionDef { .. } => "FunctionDef",
            Self::Param { .. } => "Param",
            Self::Arg { .. } => "Arg",
            Self::While { .. } => "While",
            Self::If { .. } => "If",
            Self::ForTo { .. } => "ForTo",
            Self::Comment { .. } => "Comment",
            Self::AugAssign {} => "AugAssign",
            Self::ForIn {} => "ForIn",
            Self::Switch {} => "Switch",
            Self::Break {} => "Break",
            Self::Continue {} => "Continue",
            Self::Import {} => "Import",
            Self::TypeDef {} => "TypeDef",
        }
    }

    /// Identifier text when this is a `Name` node
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name { id } => Some(id),
            _ => None,
        }
    }

    /// Script with the given top-level statements
    pub fn script(body: Vec<Self>) -> Self {
        Self::Script {
            body,
            annotations: Vec::new(),
        }
    }

    /// Identifier reference
    pub fn name(id: impl Into<String>) -> Self {
        Self::Name { id: id.into() }
    }

    /// Integer literal
    pub fn int(value: i64) -> Self {
        Self::Constant {
            value: ConstantValue::Int(value),
        }
    }

    /// Float literal
    pub fn float(value: f64) -> Self {
        Self::Constant {
            value: ConstantValue::Float(value),
        }
    }

    /// Boolean literal
    pub fn bool(value: bool) -> Self {
        Self::Constant {
            value: ConstantValue::Bool(value),
        }
    }

    /// String literal
    pub fn str(value: impl Into<String>) -> Self {
        Self::Constant {
            value: ConstantValue::Str(value.into()),
        }
    }

    /// `target = value`
    pub fn assign(target: Self, value: Self) -> Self {
        Self::Assign {
            target: Box::new(target),
            value: Box::new(value),
            annotations: Vec::new(),
        }
    }

    /// `target := value`
    pub fn reassign(target: Self, value: Self) -> Self {
        Self::ReAssign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    /// `left op right`
    pub fn bin_op(left: Self, op: Operator, right: Self) -> Self {
        Self::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Single-operator comparison
    pub fn compare(left: Self, op: Operator, right: Self) -> Self {
        Self::Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
        }
    }

    /// `func(args...)`
    pub fn call(func: Self, args: Vec<Self>) -> Self {
        Self::Call {
            func: Box::new(func),
            args,
        }
    }

    /// Positional argument
    pub fn arg(value: Self) -> Self {
        Self::Arg {
            value: Box::new(value),
            name: None,
        }
    }

    /// Named argument
    pub fn kwarg(name: impl Into<String>, value: Self) -> Self {
        Self::Arg {
            value: Box::new(value),
            name: Some(name.into()),
        }
    }

    /// `value.attr`
    pub fn attribute(value: Self, attr: impl Into<String>) -> Self {
        Self::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    /// Expression statement
    pub fn expr(value: Self) -> Self {
        Self::Expr {
            value: Box::new(value),
        }
    }

    /// Tuple of elements
    pub fn tuple(elts: Vec<Self>) -> Self {
        Self::Tuple { elts }
    }

    /// Plain function definition with named parameters
    pub fn function(name: impl Into<String>, params: &[&str], body: Vec<Self>) -> Self {
        Self::FunctionDef {
            name: name.into(),
            args: params
                .iter()
                .map(|param| Self::Param {
                    name: (*param).to_owned(),
                })
                .collect(),
            body,
            method: false,
            export: false,
            annotations: Vec::new(),
        }
    }
}
