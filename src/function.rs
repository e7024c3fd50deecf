use std::fmt::{self, Debug, Display};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::environment::{Env, Environment};
use crate::error::{RuntimeError, Unwind};
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::object::Object;
use crate::stmt::FunctionData;

/// A user-defined function or method (spec.md §3 "User Function"). Carries
/// its AST declaration and the environment in force at the point it was
/// declared — not at the point it's called — which is what makes it a
/// closure.
#[derive(Clone)]
pub struct Function {
    declaration: Rc<FunctionData>,
    closure: Env,
    is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: Env, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Returns a new function whose closure wraps the original one in a
    /// scope defining `this = instance` (spec.md §4.6). The resolver relies
    /// on this exact extra layer: a method body resolves `this` at depth 0
    /// into this wrapping scope.
    pub fn bind(&self, instance: Object) -> Function {
        let env = Environment::child(&self.closure);
        env.borrow_mut().define("this", instance);
        Function::new(Rc::clone(&self.declaration), env, self.is_initializer)
    }

    pub fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let env = Environment::child(&self.closure);
        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            env.borrow_mut().define(&param.lexeme, argument);
        }

        let result = interpreter.execute_block(&self.declaration.body, env);

        let value = match result {
            Ok(()) => Object::Literal(Literal::Nil),
            Err(Unwind::Return(value)) => value,
            Err(Unwind::Error(error)) => return Err(error),
        };

        if self.is_initializer {
            // `init` always yields `this`, even after a bare `return;`
            // (spec.md §3). `this` lives in the closure itself, one level
            // below the fresh call environment, hence distance 0 from there.
            return self.closure.borrow().get_at_name(0, "this", &self.declaration.name);
        }

        Ok(value)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

/// A native function injected into `globals` at evaluator construction
/// (spec.md §4.5). Only `clock` is specified; the function pointer takes
/// the interpreter so a richer native could observe program state.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl NativeFunction {
    pub fn clock() -> NativeFunction {
        NativeFunction {
            name: "clock",
            arity: 0,
            function: |_, _| {
                let seconds = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .expect("system clock to be after the Unix epoch")
                    .as_secs_f64();
                Ok(Object::Literal(Literal::Number(seconds)))
            },
        }
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native:{}>", self.name)
    }
}
