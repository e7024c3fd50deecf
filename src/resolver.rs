use std::collections::HashMap;
use std::mem;

use crate::error::{Error, ResolveError};
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LogicalData,
    SetData, SuperData, ThisData, UnaryData, VariableData,
};
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::stmt::{
    BlockData, ClassData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt,
    StmtVisitor, VarData, WhileData,
};
use crate::token::Token;

enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

enum ClassKind {
    None,
    Class,
    Subclass,
}

/// A static pass over the AST computing, for each `Variable`/`Assign`/
/// `This`/`Super` node, the exact enclosing-scope depth at which its name
/// is defined (spec.md §4.3). The result is recorded directly into the
/// evaluator's side table; names never found in a tracked scope are left
/// unrecorded and treated as global at evaluation time.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionKind,
    current_class: ClassKind,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            ResolveError {
                token: name.clone(),
                message: format!("Already a variable with name '{}' in this scope.", name.lexeme),
            }
            .throw();
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.insert(name.lexeme.clone(), true);
    }

    fn resolve_local(&mut self, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(name, depth);
                return;
            }
        }
    }

    fn resolve_function(&mut self, function: &FunctionData, kind: FunctionKind) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }
}

impl<'a> ExprVisitor<()> for Resolver<'a> {
    fn visit_literal_expr(&mut self, _literal: &Literal) {}

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) {
        self.resolve_expr(&grouping.expr);
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) {
        self.resolve_expr(&unary.expr);
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) {
        self.resolve_expr(&binary.left);
        self.resolve_expr(&binary.right);
    }

    fn visit_logical_expr(&mut self, logical: &LogicalData) {
        self.resolve_expr(&logical.left);
        self.resolve_expr(&logical.right);
    }

    fn visit_variable_expr(&mut self, variable: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&variable.name.lexeme) == Some(&false) {
                ResolveError {
                    token: variable.name.clone(),
                    message: "Can't read local variable in its own initializer.".to_string(),
                }
                .throw();
            }
        }

        self.resolve_local(&variable.name);
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) {
        self.resolve_expr(&assign.value);
        self.resolve_local(&assign.name);
    }

    fn visit_call_expr(&mut self, call: &CallData) {
        self.resolve_expr(&call.callee);
        for argument in &call.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, get: &GetData) {
        self.resolve_expr(&get.object);
    }

    fn visit_set_expr(&mut self, set: &SetData) {
        self.resolve_expr(&set.value);
        self.resolve_expr(&set.object);
    }

    fn visit_this_expr(&mut self, this: &ThisData) {
        if let ClassKind::None = self.current_class {
            ResolveError {
                token: this.keyword.clone(),
                message: "Can't use 'this' outside of a class.".to_string(),
            }
            .throw();
            return;
        }

        self.resolve_local(&this.keyword);
    }

    fn visit_super_expr(&mut self, super_expr: &SuperData) {
        match self.current_class {
            ClassKind::Subclass => {}
            ClassKind::None => ResolveError {
                token: super_expr.keyword.clone(),
                message: "Can't use 'super' outside of a class.".to_string(),
            }
            .throw(),
            ClassKind::Class => ResolveError {
                token: super_expr.keyword.clone(),
                message: "Can't use 'super' in a class with no superclass.".to_string(),
            }
            .throw(),
        }

        self.resolve_local(&super_expr.keyword);
    }
}

impl<'a> StmtVisitor<()> for Resolver<'a> {
    fn visit_expression_stmt(&mut self, stmt: &ExpressionData) {
        self.resolve_expr(&stmt.expr);
    }

    fn visit_print_stmt(&mut self, stmt: &PrintData) {
        self.resolve_expr(&stmt.expr);
    }

    fn visit_var_stmt(&mut self, stmt: &VarData) {
        self.declare(&stmt.name);
        if let Some(initializer) = &stmt.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&stmt.name);
    }

    fn visit_block_stmt(&mut self, stmt: &BlockData) {
        self.begin_scope();
        self.resolve(&stmt.statements);
        self.end_scope();
    }

    fn visit_if_stmt(&mut self, stmt: &IfData) {
        self.resolve_expr(&stmt.condition);
        self.resolve_stmt(&stmt.then_branch);
        if let Some(else_branch) = &stmt.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileData) {
        self.resolve_expr(&stmt.condition);
        self.resolve_stmt(&stmt.body);
    }

    fn visit_function_stmt(&mut self, stmt: &FunctionData) {
        self.declare(&stmt.name);
        self.define(&stmt.name);
        self.resolve_function(stmt, FunctionKind::Function);
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnData) {
        if let FunctionKind::None = self.current_function {
            ResolveError {
                token: stmt.keyword.clone(),
                message: "Can't return from top-level code.".to_string(),
            }
            .throw();
        }

        if let Some(value) = &stmt.value {
            if let FunctionKind::Initializer = self.current_function {
                ResolveError {
                    token: stmt.keyword.clone(),
                    message: "Can't return a value from an initializer.".to_string(),
                }
                .throw();
            }
            self.resolve_expr(value);
        }
    }

    fn visit_class_stmt(&mut self, stmt: &ClassData) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassKind::Class);

        self.declare(&stmt.name);
        self.define(&stmt.name);

        if let Some(superclass) = &stmt.superclass {
            if superclass.name.lexeme == stmt.name.lexeme {
                ResolveError {
                    token: superclass.name.clone(),
                    message: "A class can't inherit from itself.".to_string(),
                }
                .throw();
            }

            self.current_class = ClassKind::Subclass;
            self.resolve_local(&superclass.name);

            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

        for method in &stmt.methods {
            let kind = if method.name.lexeme == "init" { FunctionKind::Initializer } else { FunctionKind::Method };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if stmt.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve_errors(source: &str) -> bool {
        crate::error::reset_error();
        let tokens = Scanner::new(source).scan_tokens();
        let statements = Parser::new(tokens).parse();
        let mut interpreter = Interpreter::new();
        Resolver::new(&mut interpreter).resolve(&statements);
        crate::error::did_error()
    }

    #[test]
    fn reading_own_initializer_is_an_error() {
        assert!(resolve_errors("{ var a = a; }"));
    }

    #[test]
    fn this_outside_class_is_an_error() {
        assert!(resolve_errors("print this;"));
    }

    #[test]
    fn super_without_superclass_is_an_error() {
        assert!(resolve_errors("class A { hi() { super.hi(); } }"));
    }

    #[test]
    fn class_inheriting_itself_is_an_error() {
        assert!(resolve_errors("class A < A {}"));
    }

    #[test]
    fn returning_a_value_from_init_is_an_error() {
        assert!(resolve_errors("class A { init() { return 1; } }"));
    }

    #[test]
    fn bare_return_from_init_is_allowed() {
        assert!(!resolve_errors("class A { init() { return; } }"));
    }

    #[test]
    fn redeclaring_a_local_is_an_error() {
        assert!(resolve_errors("{ var a = 1; var a = 2; }"));
    }

    #[test]
    fn redeclaring_a_global_is_allowed() {
        assert!(!resolve_errors("var a = 1; var a = 2;"));
    }
}
