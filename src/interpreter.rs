use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::{Env, Environment};
use crate::error::{RuntimeError, Unwind};
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LogicalData,
    SetData, SuperData, ThisData, UnaryData, VariableData,
};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::Object;
use crate::stmt::{
    BlockData, ClassData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt,
    StmtVisitor, VarData, WhileData,
};
use crate::token::{Token, Type};

/// Tree-walks a resolved program (spec.md §4.4). Holds two environment
/// handles: `globals`, the fixed root that `clock` lives in, and `env`, the
/// scope currently in force — they start out equal and diverge as blocks,
/// calls, and methods push and pop scopes. `output` is where `print`
/// statements write (spec.md §4.4 `Print`) — stdout by default, but boxed
/// so tests can redirect it into an in-memory buffer without spawning a
/// subprocess (see `Lox::with_output`).
pub struct Interpreter {
    pub globals: Env,
    env: Env,
    locals: HashMap<Token, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    pub fn with_output(output: impl Write + 'static) -> Self {
        let globals = Environment::new_global();
        globals.borrow_mut().define("clock", Object::NativeFunction(Rc::new(NativeFunction::clock())));

        Interpreter {
            env: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output: Box::new(output),
        }
    }

    /// Records the scope depth the resolver computed for a variable-use
    /// site (spec.md §4.3). Keyed by the token itself, which stands in for
    /// AST-node identity (see token.rs).
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Unwind::Error(error)) => {
                    use crate::error::Error;
                    error.throw();
                    return;
                }
                Err(Unwind::Return(_)) => {
                    unreachable!("resolver forbids `return` outside a function")
                }
            }
        }
    }

    /// Evaluates a single bare expression (the `evaluate` CLI surface,
    /// spec.md §6). Returns the value on success, printing nothing itself.
    pub fn interpret_expression(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        match self.evaluate(expr) {
            Ok(value) => Ok(value),
            Err(Unwind::Error(error)) => Err(error),
            Err(Unwind::Return(_)) => unreachable!("a bare expression cannot return"),
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        expr.accept(self)
    }

    /// Executes `statements` inside `env`, restoring the previous scope on
    /// normal completion *and* on any unwind (spec.md §4.4 `Block`).
    pub fn execute_block(&mut self, statements: &[Stmt], env: Env) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.env, env);

        let mut result = Ok(());
        for stmt in statements {
            result = self.execute(stmt);
            if result.is_err() {
                break;
            }
        }

        self.env = previous;
        result
    }

    fn lookup_variable(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(name) {
            Some(&depth) => self.env.borrow().get_at(depth, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn assign_variable(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        match self.locals.get(name) {
            Some(&depth) => {
                self.env.borrow_mut().assign_at(depth, name, value);
                Ok(())
            }
            None => self.globals.borrow_mut().assign(name, value),
        }
    }

    fn as_number(&self, token: &Token, value: &Object) -> Result<f64, RuntimeError> {
        match value {
            Object::Literal(Literal::Number(n)) => Ok(*n),
            _ => Err(RuntimeError { token: token.clone(), message: "Operand must be a number.".to_string() }),
        }
    }

    fn call_value(&mut self, callee: Object, arguments: Vec<Object>, paren: &Token) -> Result<Object, Unwind> {
        let arity = match &callee {
            Object::Function(f) => f.arity(),
            Object::NativeFunction(n) => n.arity,
            Object::Class(c) => c.arity(),
            _ => {
                return Err(RuntimeError {
                    token: paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                }
                .into())
            }
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: paren.clone(),
                message: format!("Expected {} arguments but got {}.", arity, arguments.len()),
            }
            .into());
        }

        match callee {
            Object::Function(f) => f.call(self, arguments).map_err(Unwind::from),
            Object::NativeFunction(n) => (n.function)(self, arguments).map_err(Unwind::from),
            Object::Class(class) => {
                let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(&class))));
                let instance_object = Object::Instance(Rc::clone(&instance));

                if let Some(initializer) = class.find_method("init") {
                    initializer.bind(instance_object.clone()).call(self, arguments).map_err(Unwind::from)?;
                }

                Ok(instance_object)
            }
            _ => unreachable!("arity check above already rejected non-callables"),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprVisitor<Result<Object, Unwind>> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Object, Unwind> {
        Ok(Object::Literal(literal.clone()))
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) -> Result<Object, Unwind> {
        self.evaluate(&grouping.expr)
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) -> Result<Object, Unwind> {
        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Bang => Ok(Object::Literal(Literal::Bool(!right.is_truthy()))),
            Type::Minus => {
                let n = self.as_number(&unary.operator, &right)?;
                Ok(Object::Literal(Literal::Number(-n)))
            }
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) -> Result<Object, Unwind> {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let op = &binary.operator;

        if matches!(
            op.r#type,
            Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual | Type::Minus | Type::Slash | Type::Star
        ) {
            let (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) = (&left, &right) else {
                return Err(RuntimeError { token: op.clone(), message: "Operands must be numbers.".to_string() }.into());
            };
            let (l, r) = (*l, *r);

            return Ok(Object::Literal(match op.r#type {
                Type::Greater => Literal::Bool(l > r),
                Type::GreaterEqual => Literal::Bool(l >= r),
                Type::Less => Literal::Bool(l < r),
                Type::LessEqual => Literal::Bool(l <= r),
                Type::Minus => Literal::Number(l - r),
                Type::Slash => Literal::Number(l / r),
                Type::Star => Literal::Number(l * r),
                _ => unreachable!(),
            }));
        }

        match op.r#type {
            Type::EqualEqual => Ok(Object::Literal(Literal::Bool(left == right))),
            Type::BangEqual => Ok(Object::Literal(Literal::Bool(left != right))),
            Type::Plus => match (left, right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
                    Ok(Object::Literal(Literal::Number(l + r)))
                }
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                    Ok(Object::Literal(Literal::String(l + &r)))
                }
                _ => Err(RuntimeError {
                    token: op.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }
                .into()),
            },
            _ => unreachable!(),
        }
    }

    fn visit_logical_expr(&mut self, logical: &LogicalData) -> Result<Object, Unwind> {
        let left = self.evaluate(&logical.left)?;

        match logical.operator.r#type {
            Type::Or if left.is_truthy() => Ok(left),
            Type::Or => self.evaluate(&logical.right),
            Type::And if !left.is_truthy() => Ok(left),
            Type::And => self.evaluate(&logical.right),
            _ => unreachable!(),
        }
    }

    fn visit_variable_expr(&mut self, variable: &VariableData) -> Result<Object, Unwind> {
        Ok(self.lookup_variable(&variable.name)?)
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) -> Result<Object, Unwind> {
        let value = self.evaluate(&assign.value)?;
        self.assign_variable(&assign.name, value.clone())?;
        Ok(value)
    }

    fn visit_call_expr(&mut self, call: &CallData) -> Result<Object, Unwind> {
        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        self.call_value(callee, arguments, &call.paren)
    }

    fn visit_get_expr(&mut self, get: &GetData) -> Result<Object, Unwind> {
        let object = self.evaluate(&get.object)?;

        match &object {
            Object::Instance(instance) => Ok(instance.borrow().get(&get.name, &object)?),
            _ => Err(RuntimeError {
                token: get.name.clone(),
                message: "Only instances have properties.".to_string(),
            }
            .into()),
        }
    }

    fn visit_set_expr(&mut self, set: &SetData) -> Result<Object, Unwind> {
        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = &object else {
            return Err(RuntimeError {
                token: set.name.clone(),
                message: "Only instances have properties.".to_string(),
            }
            .into());
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, this: &ThisData) -> Result<Object, Unwind> {
        Ok(self.lookup_variable(&this.keyword)?)
    }

    fn visit_super_expr(&mut self, super_expr: &SuperData) -> Result<Object, Unwind> {
        let depth = *self
            .locals
            .get(&super_expr.keyword)
            .expect("resolver to have resolved every `super` expression");

        let superclass = self.env.borrow().get_at(depth, &super_expr.keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("resolver-verified `super` target is always a class")
        };

        let instance = self.env.borrow().get_at_name(depth - 1, "this", &super_expr.keyword)?;

        let method = superclass.find_method(&super_expr.method.lexeme).ok_or_else(|| RuntimeError {
            token: super_expr.method.clone(),
            message: format!("Undefined property '{}'.", super_expr.method.lexeme),
        })?;

        Ok(Object::Function(Rc::new(method.bind(instance))))
    }
}

impl StmtVisitor<Result<(), Unwind>> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &ExpressionData) -> Result<(), Unwind> {
        self.evaluate(&stmt.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &PrintData) -> Result<(), Unwind> {
        let value = self.evaluate(&stmt.expr)?;
        writeln!(self.output, "{value}").expect("write to the print sink to succeed");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &VarData) -> Result<(), Unwind> {
        let value = match &stmt.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::Literal(Literal::Nil),
        };

        self.env.borrow_mut().define(&stmt.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &BlockData) -> Result<(), Unwind> {
        let env = Environment::child(&self.env);
        self.execute_block(&stmt.statements, env)
    }

    fn visit_if_stmt(&mut self, stmt: &IfData) -> Result<(), Unwind> {
        if self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.then_branch)
        } else if let Some(else_branch) = &stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileData) -> Result<(), Unwind> {
        while self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.body)?;
        }
        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &FunctionData) -> Result<(), Unwind> {
        let function = Function::new(Rc::new(stmt.clone()), Rc::clone(&self.env), false);
        self.env.borrow_mut().define(&stmt.name.lexeme, Object::Function(Rc::new(function)));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnData) -> Result<(), Unwind> {
        let value = match &stmt.value {
            Some(value) => self.evaluate(value)?,
            None => Object::Literal(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &ClassData) -> Result<(), Unwind> {
        let superclass = match &stmt.superclass {
            Some(variable) => {
                let value = self.lookup_variable(&variable.name)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        return Err(RuntimeError {
                            token: variable.name.clone(),
                            message: "Superclass must be a class.".to_string(),
                        }
                        .into())
                    }
                }
            }
            None => None,
        };

        self.env.borrow_mut().define(&stmt.name.lexeme, Object::Literal(Literal::Nil));

        let outer = Rc::clone(&self.env);
        if let Some(superclass) = &superclass {
            self.env = Environment::child(&outer);
            self.env.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
        }

        let mut methods = HashMap::new();
        for method in &stmt.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::new(method.clone()), Rc::clone(&self.env), is_initializer);
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        self.env = outer;

        let class = Class::new(stmt.name.lexeme.clone(), superclass, methods);
        self.env.borrow_mut().assign(&stmt.name, Object::Class(Rc::new(class)))?;
        Ok(())
    }
}
