//! Syntax tree → ESTree lowering with scope tracking

use crate::config::LowerConfig;
use crate::error::{LowerError, Result};
use crate::{input_args, ops};
use indexmap::IndexMap;
use pn_estree::{DeclarationKind, Node};
use pn_scope::{BindingKind, ScopeChain};
use pn_syntax::{ConstantValue, ElseArm, Operator, SourceNode};
use rustc_hash::FxHashMap;
use serde_json::{Number, Value};
use tracing::{debug, instrument, trace};

/// Lower a whole script with a fresh session
///
/// # Errors
///
/// Fails on the first node or operator without a lowering rule, or on a
/// tree shape that violates a lowering invariant.
pub fn lower_program(root: &SourceNode, config: &LowerConfig) -> Result<Node> {
    LoweringSession::new(config.clone()).lower_program(root)
}

/// State of one lowering pass
///
/// Owns the scope chain and the parameter-rename stack. A session lowers
/// exactly one program and is consumed by it.
#[derive(Debug)]
pub struct LoweringSession {
    config: LowerConfig,
    scopes: ScopeChain,
    /// Shadowing parameter → surrogate, one map per function being lowered
    renames: Vec<FxHashMap<String, String>>,
}

impl LoweringSession {
    /// Create a session with an empty root scope
    pub fn new(config: LowerConfig) -> Self {
        Self {
            config,
            scopes: ScopeChain::new(),
            renames: Vec::new(),
        }
    }

    /// Lower a `Script` into a `Program`
    ///
    /// # Errors
    ///
    /// See [`lower_program`].
    pub fn lower_program(mut self, root: &SourceNode) -> Result<Node> {
        let SourceNode::Script { body, .. } = root else {
            return Err(LowerError::structural(format!(
                "Expected Script at the root, found {}",
                root.kind()
            )));
        };

        let statements = self.lower_statements(body)?;
        debug!(
            statements = statements.len(),
            names = self.scopes.total_names(),
            "lowered program"
        );
        Ok(Node::program(statements))
    }

    /// Lower a statement list, dropping statements that lower to nothing
    fn lower_statements(&mut self, statements: &[SourceNode]) -> Result<Vec<Node>> {
        let mut lowered = Vec::with_capacity(statements.len());
        for statement in statements {
            if let Some(node) = self.lower_node(statement)? {
                lowered.push(node);
            }
        }
        Ok(lowered)
    }

    fn lower_block(&mut self, statements: &[SourceNode]) -> Result<Node> {
        Ok(Node::block(self.lower_statements(statements)?))
    }

    fn lower_expr(&mut self, node: &SourceNode) -> Result<Node> {
        self.lower_node(node)?.ok_or_else(|| {
            LowerError::structural(format!("{} cannot be used as an expression", node.kind()))
        })
    }

    fn lower_node(&mut self, node: &SourceNode) -> Result<Option<Node>> {
        let lowered = match node {
            SourceNode::Script { .. } => {
                return Err(LowerError::structural("Script can only appear at the root"));
            }
            SourceNode::Assign { target, value, .. } | SourceNode::ReAssign { target, value } => {
                self.lower_assignment(target, value)?
            }
            SourceNode::Name { id } => self.resolve_name(id),
            SourceNode::Constant { value } => lower_constant(value),
            SourceNode::BinOp { left, op, right } => {
                let operator = ops::arithmetic(*op)?;
                Node::binary(operator, self.lower_expr(left)?, self.lower_expr(right)?)
            }
            SourceNode::UnaryOp { op, operand } => {
                let operator = ops::unary(*op)?;
                Node::unary(operator, self.lower_expr(operand)?)
            }
            SourceNode::BoolOp { op, values } => self.lower_bool_op(*op, values)?,
            SourceNode::Compare {
                left,
                ops: operators,
                comparators,
            } => self.lower_compare(left, operators, comparators)?,
            SourceNode::Call { func, args } => self.lower_call(func, args)?,
            SourceNode::Attribute { value, attr } => Node::member(self.lower_expr(value)?, attr),
            SourceNode::Expr { value } => return self.lower_expr_statement(value),
            SourceNode::Conditional { test, body, orelse } => Node::ConditionalExpression {
                test: Box::new(self.lower_expr(test)?),
                consequent: Box::new(self.lower_expr(body)?),
                alternate: Box::new(self.lower_expr(orelse)?),
            },
            SourceNode::Subscript { value, slice } => {
                Node::index(self.lower_expr(value)?, self.lower_expr(slice)?)
            }
            SourceNode::Tuple { elts } => Node::ArrayPattern {
                elements: elts
                    .iter()
                    .map(|element| self.lower_expr(element))
                    .collect::<Result<_>>()?,
            },
            SourceNode::FunctionDef {
                name, args, body, ..
            } => self.lower_function(name, args, body)?,
            SourceNode::Param { name } => Node::identifier(name),
            SourceNode::Arg { value, .. } => self.lower_expr(value)?,
            SourceNode::While { test, body } => Node::WhileStatement {
                test: Box::new(self.lower_expr(test)?),
                body: Box::new(self.lower_block(body)?),
            },
            SourceNode::If { test, body, orelse } => {
                self.lower_if(test, body, orelse.as_ref())?
            }
            SourceNode::ForTo {
                target,
                start,
                end,
                step,
                body,
            } => self.lower_for_to(target, start, end, step.as_deref(), body)?,
            SourceNode::Comment { .. } => return Ok(None),
            SourceNode::AugAssign {}
            | SourceNode::ForIn {}
            | SourceNode::Switch {}
            | SourceNode::Break {}
            | SourceNode::Continue {}
            | SourceNode::Import {}
            | SourceNode::TypeDef {} => {
                return Err(LowerError::UnsupportedNode {
                    kind: node.kind().to_owned(),
                });
            }
        };
        Ok(Some(lowered))
    }

    /// Resolve a name reference
    ///
    /// A renamed parameter wins, then a shared mutable global seen from a
    /// function body becomes a global cell access, otherwise the name stays.
    fn resolve_name(&self, name: &str) -> Node {
        if let Some(surrogate) = self.renames.last().and_then(|renames| renames.get(name)) {
            return Node::identifier(surrogate);
        }

        if self.scopes.depth() > 0
            && !self.scopes.is_declared_in_innermost(name)
            && self.scopes.is_shared_mutable_global(name)
        {
            trace!(name, "rewrite shared global reference");
            return self.global_cell(name);
        }

        Node::identifier(name)
    }

    /// `$.let.glb1_<name>`
    fn global_cell(&self, name: &str) -> Node {
        Node::member(
            Node::member(
                Node::identifier(&self.config.global_namespace),
                &self.config.global_scope,
            ),
            self.config.global_key(name),
        )
    }

    fn lower_assignment(&mut self, target: &SourceNode, value: &SourceNode) -> Result<Node> {
        let init = self.lower_expr(value)?;

        let names = target_names(target)?;
        if names.iter().all(|name| self.scopes.is_declared_in_any(name)) {
            let left = self.lower_expr(target)?;
            return Ok(Node::assignment(left, init));
        }

        // One declaration binds every target name, old ones included
        for name in names {
            self.scopes.declare(name, BindingKind::Mutable);
        }
        let id = self.lower_expr(target)?;
        Ok(Node::declaration(DeclarationKind::Let, id, init))
    }

    fn lower_expr_statement(&mut self, value: &SourceNode) -> Result<Option<Node>> {
        match value {
            SourceNode::While { .. } | SourceNode::If { .. } | SourceNode::ForTo { .. } => {
                self.lower_node(value)
            }
            _ => Ok(Some(Node::expression_statement(self.lower_expr(value)?))),
        }
    }

    fn lower_bool_op(&mut self, op: Operator, values: &[SourceNode]) -> Result<Node> {
        let [first, second, rest @ ..] = values else {
            return Err(LowerError::structural("BoolOp requires at least two values"));
        };
        let operator = ops::logical(op)?;

        let mut expression =
            Node::logical(operator, self.lower_expr(first)?, self.lower_expr(second)?);
        for value in rest {
            expression = Node::logical(operator, expression, self.lower_expr(value)?);
        }
        Ok(expression)
    }

    fn lower_compare(
        &mut self,
        left: &SourceNode,
        operators: &[Operator],
        comparators: &[SourceNode],
    ) -> Result<Node> {
        let ([op], [right]) = (operators, comparators) else {
            return Err(LowerError::structural(format!(
                "Compare supports exactly one operator and one comparator, found {} and {}",
                operators.len(),
                comparators.len()
            )));
        };
        let operator = ops::comparison(*op)?;
        Ok(Node::binary(
            operator,
            self.lower_expr(left)?,
            self.lower_expr(right)?,
        ))
    }

    fn lower_call(&mut self, func: &SourceNode, args: &[SourceNode]) -> Result<Node> {
        let mut callee = self.lower_expr(func)?;

        let mut positional = Vec::new();
        let mut named = IndexMap::new();
        let mut explicit_tag = None;
        let mut first_literal = None;

        for arg in args {
            let (value, keyword) = match arg {
                SourceNode::Arg { value, name } => (value.as_ref(), name.as_deref()),
                other => (other, None),
            };

            if let Some(tag) = keyword
                .filter(|label| *label == "type")
                .and_then(|_| input_type_tag(value))
            {
                explicit_tag = Some(tag);
                continue;
            }

            let lowered = self.lower_expr(value)?;
            if let Some(keyword) = keyword {
                if named.insert(keyword.to_owned(), lowered).is_some() {
                    return Err(LowerError::structural(format!(
                        "Keyword argument {keyword} given more than once"
                    )));
                }
            } else {
                if positional.is_empty() {
                    first_literal = match value {
                        SourceNode::Constant { value: literal } => Some(literal),
                        _ => None,
                    };
                }
                positional.push(lowered);
            }
        }

        let tag = explicit_tag
            .or_else(|| first_literal.and_then(inferred_input_tag))
            .filter(|_| func.as_name() == Some("input"));
        if let Some(tag) = tag {
            trace!(tag, "rewrite input() to input.{tag}()");
            callee = Node::member(Node::identifier("input"), tag);
        }

        let normalized = input_args::normalize(&callee, positional, named);
        if normalized.spliced_defval {
            trace!(
                remaining = normalized.named.len(),
                "splice defval into first positional slot"
            );
        }
        let mut arguments = normalized.positional;
        if !normalized.named.is_empty() {
            arguments.push(Node::object(normalized.named));
        }
        Ok(Node::call(callee, arguments))
    }

    #[instrument(level = "debug", skip(self, params, body), fields(param_count = params.len()))]
    fn lower_function(
        &mut self,
        name: &str,
        params: &[SourceNode],
        body: &[SourceNode],
    ) -> Result<Node> {
        self.scopes.push_level();
        let depth = self.scopes.depth();

        let mut renames = FxHashMap::default();
        let mut lowered_params = Vec::with_capacity(params.len());
        for param in params {
            let SourceNode::Param { name: param_name } = param else {
                return Err(LowerError::structural(format!(
                    "Expected Param in parameters of {name}, found {}",
                    param.kind()
                )));
            };

            let shadows = self
                .scopes
                .declaration_level(param_name)
                .is_some_and(|level| level < depth);
            if shadows {
                let surrogate = self.config.surrogate(param_name);
                trace!(param = %param_name, %surrogate, "rename shadowing parameter");
                self.scopes.declare(surrogate.clone(), BindingKind::Mutable);
                lowered_params.push(Node::identifier(&surrogate));
                renames.insert(param_name.clone(), surrogate);
            } else {
                self.scopes.declare(param_name.clone(), BindingKind::Mutable);
                lowered_params.push(Node::identifier(param_name));
            }
        }

        self.renames.push(renames);
        let statements = self.lower_statements(body);
        self.renames.pop();
        let mut statements = statements?;

        // Last expression is the return value
        let returns_last = ends_in_expression(body);
        match statements.pop() {
            Some(Node::ExpressionStatement { expression }) if returns_last => {
                statements.push(Node::ReturnStatement {
                    argument: Some(expression),
                });
            }
            Some(last) => statements.push(last),
            None => {}
        }

        self.scopes.pop_level()?;
        self.scopes.declare(name, BindingKind::Fixed);

        Ok(Node::declaration(
            DeclarationKind::Const,
            Node::identifier(name),
            Node::arrow(lowered_params, statements),
        ))
    }

    fn lower_if(
        &mut self,
        test: &SourceNode,
        body: &[SourceNode],
        orelse: Option<&ElseArm>,
    ) -> Result<Node> {
        let test = self.lower_expr(test)?;
        let consequent = self.lower_block(body)?;
        let alternate = match orelse {
            None => None,
            Some(ElseArm::Elif(branch)) => Some(match branch.as_ref() {
                SourceNode::If { .. } => self.lower_expr(branch)?,
                other => self.lower_block(std::slice::from_ref(other))?,
            }),
            Some(ElseArm::Block(statements)) if statements.is_empty() => None,
            Some(ElseArm::Block(statements)) => Some(self.lower_block(statements)?),
        };

        Ok(Node::IfStatement {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
        })
    }

    /// `for i = a to b` → `for (let i = a; i <= b; i++)`
    ///
    /// The loop variable lives in the enclosing level.
    fn lower_for_to(
        &mut self,
        target: &SourceNode,
        start: &SourceNode,
        end: &SourceNode,
        step: Option<&SourceNode>,
        body: &[SourceNode],
    ) -> Result<Node> {
        let Some(name) = target.as_name() else {
            return Err(LowerError::structural(format!(
                "ForTo target must be a Name, found {}",
                target.kind()
            )));
        };
        if step.is_some_and(|step| !is_unit_step(step)) {
            return Err(LowerError::UnsupportedNode {
                kind: "ForTo with a step other than 1".to_owned(),
            });
        }

        let start = self.lower_expr(start)?;
        let end = self.lower_expr(end)?;

        self.scopes.declare(name, BindingKind::Mutable);
        let variable = self.resolve_name(name);

        let init = Node::declaration(DeclarationKind::Let, variable.clone(), start);
        let test = Node::binary("<=", variable.clone(), end);
        let update = Node::increment(variable);
        let body = self.lower_block(body)?;

        Ok(Node::ForStatement {
            init: Box::new(init),
            test: Box::new(test),
            update: Box::new(update),
            body: Box::new(body),
        })
    }
}

/// Names bound by an assignment target
fn target_names(target: &SourceNode) -> Result<Vec<&str>> {
    match target {
        SourceNode::Name { id } => Ok(vec![id.as_str()]),
        SourceNode::Tuple { elts } => elts
            .iter()
            .map(|element| {
                element.as_name().ok_or_else(|| {
                    LowerError::structural(format!(
                        "Tuple assignment targets must be names, found {}",
                        element.kind()
                    ))
                })
            })
            .collect(),
        other => Err(LowerError::structural(format!(
            "Assignment target must be a Name or Tuple, found {}",
            other.kind()
        ))),
    }
}

/// Tag named by a `type=input.<tag>` argument
/// Whether the last non-comment statement is a bare expression
fn ends_in_expression(body: &[SourceNode]) -> bool {
    let last = body
        .iter()
        .rev()
        .find(|statement| !matches!(statement, SourceNode::Comment { .. }));
    match last {
        Some(SourceNode::Expr { value }) => !matches!(
            value.as_ref(),
            SourceNode::While { .. } | SourceNode::If { .. } | SourceNode::ForTo { .. }
        ),
        _ => false,
    }
}

fn input_type_tag(value: &SourceNode) -> Option<&str> {
    match value {
        SourceNode::Attribute { value, attr } if value.as_name() == Some("input") => Some(attr),
        _ => None,
    }
}

/// Input variant implied by a literal first argument
fn inferred_input_tag(literal: &ConstantValue) -> Option<&'static str> {
    match literal {
        ConstantValue::Bool(_) => Some("bool"),
        ConstantValue::Float(_) => Some("float"),
        ConstantValue::Int(_) => Some("int"),
        ConstantValue::Str(_) | ConstantValue::Null => None,
    }
}

fn is_unit_step(step: &SourceNode) -> bool {
    match step {
        SourceNode::Constant {
            value: ConstantValue::Int(amount),
        } => *amount == 1,
        SourceNode::Constant {
            value: ConstantValue::Float(amount),
        } => (*amount - 1.0).abs() < f64::EPSILON,
        _ => false,
    }
}

/// Literal with its JavaScript source text
fn lower_constant(value: &ConstantValue) -> Node {
    match value {
        ConstantValue::Bool(flag) => Node::literal(Value::Bool(*flag), flag.to_string()),
        ConstantValue::Int(number) => Node::literal(Value::from(*number), number.to_string()),
        ConstantValue::Float(number) => Node::literal(
            Number::from_f64(*number).map_or(Value::Null, Value::Number),
            format!("{number:?}"),
        ),
        ConstantValue::Str(text) => {
            let value = Value::String(text.clone());
            let raw = value.to_string();
            Node::literal(value, raw)
        }
        ConstantValue::Null => Node::literal(Value::Null, "null"),
    }
}
