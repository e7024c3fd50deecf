use std::rc::Rc;

use crate::expr::{Expr, VariableData};
use crate::token::Token;

/// A bare expression evaluated for its side effects; the value is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionData {
    pub expr: Expr,
}

/// `print expr;`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintData {
    pub expr: Expr,
}

/// `var name [= initializer];`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarData {
    pub name: Token,
    pub initializer: Option<Expr>,
}

/// `{ statements... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockData {
    pub statements: Vec<Stmt>,
}

/// `if (condition) then_branch [else else_branch]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfData {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

/// `while (condition) body`. `for` loops desugar into this during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileData {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

/// `fun name(params...) { body }`, also used for method declarations inside
/// a class body (which reuse this same node shape, see spec.md §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionData {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
}

/// `return [value];`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnData {
    pub keyword: Token,
    pub value: Option<Expr>,
}

/// `class name [< superclass] { methods... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassData {
    pub name: Token,
    pub superclass: Option<VariableData>,
    pub methods: Vec<FunctionData>,
}

/// A statement in the language.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExpressionData),
    Print(PrintData),
    Var(VarData),
    Block(BlockData),
    If(IfData),
    While(WhileData),
    Function(Rc<FunctionData>),
    Return(ReturnData),
    Class(ClassData),
}

impl Stmt {
    /// Accepts a visitor and returns the result of the visit.
    pub fn accept<T>(&self, visitor: &mut dyn StmtVisitor<T>) -> T {
        match self {
            Stmt::Expression(data) => visitor.visit_expression_stmt(data),
            Stmt::Print(data) => visitor.visit_print_stmt(data),
            Stmt::Var(data) => visitor.visit_var_stmt(data),
            Stmt::Block(data) => visitor.visit_block_stmt(data),
            Stmt::If(data) => visitor.visit_if_stmt(data),
            Stmt::While(data) => visitor.visit_while_stmt(data),
            Stmt::Function(data) => visitor.visit_function_stmt(data),
            Stmt::Return(data) => visitor.visit_return_stmt(data),
            Stmt::Class(data) => visitor.visit_class_stmt(data),
        }
    }
}

pub trait StmtVisitor<T> {
    fn visit_expression_stmt(&mut self, stmt: &ExpressionData) -> T;
    fn visit_print_stmt(&mut self, stmt: &PrintData) -> T;
    fn visit_var_stmt(&mut self, stmt: &VarData) -> T;
    fn visit_block_stmt(&mut self, stmt: &BlockData) -> T;
    fn visit_if_stmt(&mut self, stmt: &IfData) -> T;
    fn visit_while_stmt(&mut self, stmt: &WhileData) -> T;
    fn visit_function_stmt(&mut self, stmt: &FunctionData) -> T;
    fn visit_return_stmt(&mut self, stmt: &ReturnData) -> T;
    fn visit_class_stmt(&mut self, stmt: &ClassData) -> T;
}
