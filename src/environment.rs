use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A scope-local name-to-value map chained to its enclosing scope
/// (spec.md §3). Shared via `Rc<RefCell<_>>` since closures, method
/// closures, and re-entrant calls may all hold a reference to the same
/// environment — mutation must stay visible across every holder.
#[derive(Debug)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Object>,
}

pub type Env = Rc<RefCell<Environment>>;

impl Environment {
    pub fn new(enclosing: Option<Env>) -> Self {
        Environment { enclosing, values: HashMap::new() }
    }

    pub fn new_global() -> Env {
        Rc::new(RefCell::new(Environment::new(None)))
    }

    pub fn child(enclosing: &Env) -> Env {
        Rc::new(RefCell::new(Environment::new(Some(Rc::clone(enclosing)))))
    }

    /// Insert or overwrite `name` in this scope only.
    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    /// Look up here, then walk the enclosing chain.
    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Assign to the nearest scope that already defines `name`.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Walk exactly `distance` enclosing steps up, no further search.
    fn ancestor(&self, distance: usize) -> Env {
        let mut env = self
            .enclosing
            .clone()
            .expect("resolver-computed depth to stay within the live environment chain");

        for _ in 1..distance {
            let next = env
                .borrow()
                .enclosing
                .clone()
                .expect("resolver-computed depth to stay within the live environment chain");
            env = next;
        }

        env
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        self.get_at_name(distance, &name.lexeme, name)
    }

    /// As [`Environment::get_at`], but keyed by a plain string rather than a
    /// source token — used for the `this`/`super` lookups synthesized by
    /// the evaluator (spec.md §4.4 `Super`), which have no variable-use
    /// token of their own at the exact name being fetched. `diagnostic` is
    /// only used to report a line number if the resolver's guarantee that
    /// this slot exists somehow doesn't hold.
    pub fn get_at_name(&self, distance: usize, name: &str, diagnostic: &Token) -> Result<Object, RuntimeError> {
        let value = if distance == 0 {
            self.values.get(name).cloned()
        } else {
            self.ancestor(distance).borrow().values.get(name).cloned()
        };

        value.ok_or_else(|| RuntimeError {
            token: diagnostic.clone(),
            message: format!("Undefined variable '{name}'."),
        })
    }

    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance == 0 {
            self.values.insert(name.lexeme.clone(), value);
            return;
        }

        self.ancestor(distance).borrow_mut().values.insert(name.lexeme.clone(), value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Literal;
    use crate::token::{Location, Type};

    fn tok(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, Location::new(1, 0))
    }

    #[test]
    fn define_then_get_round_trips() {
        let mut env = Environment::new(None);
        env.define("a", Object::Literal(Literal::Number(1.0)));
        assert_eq!(env.get(&tok("a")).unwrap(), Object::Literal(Literal::Number(1.0)));
    }

    #[test]
    fn assign_updates_nearest_defining_scope() {
        let global = Environment::new_global();
        global.borrow_mut().define("a", Object::Literal(Literal::Number(1.0)));

        let inner = Environment::child(&global);
        inner.borrow_mut().assign(&tok("a"), Object::Literal(Literal::Number(2.0))).unwrap();

        assert_eq!(global.borrow().get(&tok("a")).unwrap(), Object::Literal(Literal::Number(2.0)));
    }

    #[test]
    fn get_absent_variable_errors() {
        let env = Environment::new(None);
        assert!(env.get(&tok("missing")).is_err());
    }

    #[test]
    fn get_at_zero_reads_current_scope_directly() {
        let mut env = Environment::new(None);
        env.define("a", Object::Literal(Literal::Number(3.0)));
        assert_eq!(env.get_at(0, &tok("a")).unwrap(), Object::Literal(Literal::Number(3.0)));
    }

    #[test]
    fn get_at_walks_exact_depth_without_searching() {
        let global = Environment::new_global();
        global.borrow_mut().define("a", Object::Literal(Literal::Bool(true)));
        let middle = Environment::child(&global);
        let inner = Environment::child(&middle);

        assert_eq!(inner.borrow().get_at(2, &tok("a")).unwrap(), Object::Literal(Literal::Bool(true)));
    }
}
