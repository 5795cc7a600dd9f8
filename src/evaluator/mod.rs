//! The recursive tree-walking evaluator.
//!
//! [`Evaluator`] owns the [`Heap`] and the global [`Environment`]; every public entry point
//! ([`Evaluator::eval_program`]) takes the current environment explicitly rather than reading it
//! from module-level mutable state (see `SPEC_FULL.md`'s note on this), which is what lets the
//! same evaluator be reused across REPL lines without reconstructing the heap or globals each
//! time. Collection only runs at statement boundaries ([`Evaluator::maybe_collect`]), never in
//! the middle of evaluating an expression, so a value still sitting in a local variable on the
//! host call stack is never swept out from under it.

use crate::ast::{
    Block, CallExpr, Expr, ForStatement, FunctionLiteral, IfExpr, IndexExpr, Program, Statement,
    WhileStatement,
};
use crate::gc::{self, Heap, ObjHandle};
use crate::object::{builtins, BuiltinKind, Environment, FunctionValue, StringData, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

type Env = Rc<RefCell<Environment>>;

pub struct Evaluator<'out> {
    heap: Heap,
    globals: Env,
    call_stack: Vec<Env>,
    string_cache: HashMap<usize, Rc<str>>,
    out: &'out mut dyn Write,
}

impl<'out> Evaluator<'out> {
    pub fn new(out: &'out mut dyn Write) -> Self {
        let mut heap = Heap::new();
        let globals = Environment::new();
        builtins::register(&mut heap, &globals);
        Self {
            heap,
            globals,
            call_stack: Vec::new(),
            string_cache: HashMap::new(),
            out,
        }
    }

    /// The environment persistent REPL sessions bind new `let`s into across lines.
    pub fn globals(&self) -> Env {
        self.globals.clone()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Evaluate every statement in `program` against `env`, in order. Mirrors
    /// [`Evaluator::eval_block`]'s short-circuit-on-error behaviour: a runtime `ERROR` halts the
    /// remaining top-level statements and becomes the program's result, matching the CLI
    /// contract that a top-level `ERROR` value is printed and causes a non-zero exit.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> ObjHandle {
        let mut result = self.heap.null_handle();
        for stmt in &program.statements {
            result = self.eval_statement(stmt, env);
            if self.is_error(result) {
                return result;
            }
            self.maybe_collect();
        }
        result
    }

    fn roots(&self) -> Vec<Env> {
        let mut roots = vec![self.globals.clone()];
        roots.extend(self.call_stack.iter().cloned());
        roots
    }

    fn maybe_collect(&mut self) {
        if self.heap.should_collect() {
            let roots = self.roots();
            gc::collect(&mut self.heap, &roots);
        }
    }

    fn is_error(&self, handle: ObjHandle) -> bool {
        matches!(self.heap.get(handle), Value::Error(_))
    }

    fn is_return(&self, handle: ObjHandle) -> bool {
        matches!(self.heap.get(handle), Value::ReturnValue(_))
    }

    fn error(&mut self, message: impl Into<String>) -> ObjHandle {
        let message = message.into();
        crate::object::report_runtime_error(&message);
        self.heap.alloc(Value::Error(message))
    }

    // ---- statements ----------------------------------------------------------------------

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> ObjHandle {
        match stmt {
            Statement::Let { name, value, .. } => {
                let handle = self.eval_expr(value, env);
                if self.is_error(handle) {
                    return handle;
                }
                env.borrow_mut().set(name.name.clone(), handle);
                handle
            }
            Statement::Return { value, .. } => {
                let handle = self.eval_expr(value, env);
                if self.is_error(handle) {
                    return handle;
                }
                self.heap.alloc(Value::ReturnValue(handle))
            }
            Statement::Expression { expr, .. } => self.eval_expr(expr, env),
            Statement::Block(block) => self.eval_block(block, env),
            Statement::While(while_stmt) => self.eval_while(while_stmt, env),
            Statement::For(for_stmt) => self.eval_for(for_stmt, env),
        }
    }

    /// Evaluate `block`'s statements in `env` (a block introduces no scope of its own; the
    /// caller decides whether a fresh environment backs it). Stops and returns immediately on
    /// the first `ERROR` or `RETURN_VALUE`, which is how `return` and error propagation climb
    /// out of nested `if`/`while`/`for` bodies without unwrapping at every level.
    fn eval_block(&mut self, block: &Block, env: &Env) -> ObjHandle {
        let mut result = self.heap.null_handle();
        for stmt in &block.statements {
            result = self.eval_statement(stmt, env);
            if self.is_error(result) || self.is_return(result) {
                return result;
            }
            self.maybe_collect();
        }
        result
    }

    fn eval_while(&mut self, while_stmt: &WhileStatement, env: &Env) -> ObjHandle {
        loop {
            let condition = self.eval_expr(&while_stmt.condition, env);
            if self.is_error(condition) {
                return condition;
            }
            if condition != self.heap.true_handle() {
                return self.heap.null_handle();
            }

            let body_result = self.eval_block(&while_stmt.body, env);
            if self.is_error(body_result) || self.is_return(body_result) {
                return body_result;
            }
        }
    }

    fn eval_for(&mut self, for_stmt: &ForStatement, env: &Env) -> ObjHandle {
        let start = self.eval_expr(&for_stmt.start, env);
        if self.is_error(start) {
            return start;
        }
        let Some(mut current) = self.heap.get(start).as_integer() else {
            return self.error(format!(
                "type error: for loop start must be INTEGER, got {}",
                self.heap.get(start).type_name()
            ));
        };

        let end_handle = self.eval_expr(&for_stmt.end, env);
        if self.is_error(end_handle) {
            return end_handle;
        }
        let Some(end) = self.heap.get(end_handle).as_integer() else {
            return self.error(format!(
                "type error: for loop end must be INTEGER, got {}",
                self.heap.get(end_handle).type_name()
            ));
        };

        loop {
            let in_range = if for_stmt.inclusive { current <= end } else { current < end };
            if !in_range {
                return self.heap.null_handle();
            }

            let var_handle = self.heap.alloc(Value::Integer(current));
            env.borrow_mut().set(for_stmt.var.name.clone(), var_handle);

            let body_result = self.eval_block(&for_stmt.body, env);
            if self.is_error(body_result) || self.is_return(body_result) {
                return body_result;
            }

            current = current.wrapping_add(1);
        }
    }

    // ---- expressions ----------------------------------------------------------------------

    fn eval_expr(&mut self, expr: &Expr, env: &Env) -> ObjHandle {
        match expr {
            Expr::Identifier(ident) => match env.borrow().get(&ident.name) {
                Some(handle) => handle,
                None => self.error(format!("undefined variable: '{}'", ident.name)),
            },
            Expr::IntegerLiteral { value, .. } => self.heap.alloc(Value::Integer(*value)),
            Expr::StringLiteral { value, .. } => {
                let key = expr as *const Expr as usize;
                let data = self
                    .string_cache
                    .entry(key)
                    .or_insert_with(|| Rc::from(value.as_str()))
                    .clone();
                self.heap.alloc(Value::Str(StringData::Borrowed(data)))
            }
            Expr::BooleanLiteral { value, .. } => self.heap.bool_handle(*value),
            Expr::NullLiteral { .. } => self.heap.null_handle(),
            Expr::Prefix { op, right, .. } => self.eval_prefix(*op, right, env),
            Expr::Infix { op, left, right, .. } => self.eval_infix(*op, left, right, env),
            Expr::If(if_expr) => self.eval_if(if_expr, env),
            Expr::Function(func) => self.eval_function_literal(func, env),
            Expr::Call(call) => self.eval_call(call, env),
            Expr::ArrayLiteral { elements, .. } => self.eval_array_literal(elements, env),
            Expr::Index(index) => self.eval_index(index, env),
        }
    }

    fn eval_prefix(&mut self, op: crate::ast::PrefixOp, right: &Expr, env: &Env) -> ObjHandle {
        use crate::ast::PrefixOp;

        let value = self.eval_expr(right, env);
        if self.is_error(value) {
            return value;
        }

        match op {
            PrefixOp::Not => {
                if value == self.heap.true_handle() {
                    self.heap.false_handle()
                } else if value == self.heap.false_handle() {
                    self.heap.true_handle()
                } else if value == self.heap.null_handle() {
                    self.heap.true_handle()
                } else {
                    self.heap.false_handle()
                }
            }
            PrefixOp::Negate => match self.heap.get(value).as_integer() {
                Some(n) => self.heap.alloc(Value::Integer(n.wrapping_neg())),
                None => {
                    let type_name = self.heap.get(value).type_name();
                    self.error(format!("type error: cannot negate {type_name}"))
                }
            },
        }
    }

    fn eval_infix(&mut self, op: crate::ast::InfixOp, left: &Expr, right: &Expr, env: &Env) -> ObjHandle {
        let left_handle = self.eval_expr(left, env);
        if self.is_error(left_handle) {
            return left_handle;
        }
        let right_handle = self.eval_expr(right, env);
        if self.is_error(right_handle) {
            return right_handle;
        }
        self.apply_infix(op, left_handle, right_handle)
    }

    fn apply_infix(&mut self, op: crate::ast::InfixOp, left: ObjHandle, right: ObjHandle) -> ObjHandle {
        use crate::ast::InfixOp;

        match (self.heap.get(left).clone(), self.heap.get(right).clone()) {
            (Value::Integer(a), Value::Integer(b)) => self.apply_integer_infix(op, a, b),
            (Value::Str(a), Value::Str(b)) => self.apply_string_infix(op, &a, &b),
            (Value::Boolean(_), Value::Boolean(_)) => {
                self.apply_identity_infix(op, left, right, "BOOLEAN")
            }
            (Value::Null, Value::Null) => self.apply_identity_infix(op, left, right, "NULL"),
            (Value::Null, other) if matches!(op, InfixOp::Equal | InfixOp::NotEqual) => {
                let _ = other;
                self.heap.bool_handle(matches!(op, InfixOp::NotEqual))
            }
            (other, Value::Null) if matches!(op, InfixOp::Equal | InfixOp::NotEqual) => {
                let _ = other;
                self.heap.bool_handle(matches!(op, InfixOp::NotEqual))
            }
            (left_val, right_val) => {
                let left_type = left_val.type_name();
                let right_type = right_val.type_name();
                if left_type == right_type {
                    self.error(format!("unknown operator: {left_type} {op} {right_type}"))
                } else {
                    self.error(format!("type mismatch: {left_type} {op} {right_type}"))
                }
            }
        }
    }

    fn apply_integer_infix(&mut self, op: crate::ast::InfixOp, a: i64, b: i64) -> ObjHandle {
        use crate::ast::InfixOp;

        match op {
            InfixOp::Add => self.heap.alloc(Value::Integer(a.wrapping_add(b))),
            InfixOp::Subtract => self.heap.alloc(Value::Integer(a.wrapping_sub(b))),
            InfixOp::Multiply => self.heap.alloc(Value::Integer(a.wrapping_mul(b))),
            InfixOp::Divide => {
                if b == 0 {
                    self.error("division by zero in division operation")
                } else {
                    self.heap.alloc(Value::Integer(a.wrapping_div(b)))
                }
            }
            InfixOp::Modulo => {
                if b == 0 {
                    self.error("division by zero in modulo operation")
                } else {
                    self.heap.alloc(Value::Integer(a.wrapping_rem(b)))
                }
            }
            InfixOp::LessThan => self.heap.bool_handle(a < b),
            InfixOp::GreaterThan => self.heap.bool_handle(a > b),
            InfixOp::Equal => self.heap.bool_handle(a == b),
            InfixOp::NotEqual => self.heap.bool_handle(a != b),
        }
    }

    fn apply_string_infix(&mut self, op: crate::ast::InfixOp, a: &StringData, b: &StringData) -> ObjHandle {
        use crate::ast::InfixOp;

        match op {
            InfixOp::Add => {
                let concatenated = format!("{}{}", a.as_str(), b.as_str());
                self.heap.alloc(Value::Str(StringData::Owned(concatenated)))
            }
            InfixOp::Equal => self.heap.bool_handle(a.as_str() == b.as_str()),
            InfixOp::NotEqual => self.heap.bool_handle(a.as_str() != b.as_str()),
            _ => self.error(format!("unknown operator: STRING {op} STRING")),
        }
    }

    fn apply_identity_infix(
        &mut self,
        op: crate::ast::InfixOp,
        left: ObjHandle,
        right: ObjHandle,
        type_name: &str,
    ) -> ObjHandle {
        use crate::ast::InfixOp;

        match op {
            InfixOp::Equal => self.heap.bool_handle(left == right),
            InfixOp::NotEqual => self.heap.bool_handle(left != right),
            _ => self.error(format!("unknown operator: {type_name} {op} {type_name}")),
        }
    }

    fn eval_if(&mut self, if_expr: &IfExpr, env: &Env) -> ObjHandle {
        let condition = self.eval_expr(&if_expr.condition, env);
        if self.is_error(condition) {
            return condition;
        }

        if condition == self.heap.true_handle() {
            self.eval_block(&if_expr.consequence, env)
        } else if let Some(alternative) = &if_expr.alternative {
            self.eval_block(alternative, env)
        } else {
            self.heap.null_handle()
        }
    }

    fn eval_function_literal(&mut self, func: &FunctionLiteral, env: &Env) -> ObjHandle {
        let value = Value::Function(FunctionValue {
            params: Rc::new(func.params.clone()),
            body: Rc::new(func.body.clone()),
            env: env.clone(),
        });
        self.heap.alloc(value)
    }

    fn eval_call(&mut self, call: &CallExpr, env: &Env) -> ObjHandle {
        let callee = self.eval_expr(&call.callee, env);
        if self.is_error(callee) {
            return callee;
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let handle = self.eval_expr(arg, env);
            if self.is_error(handle) {
                return handle;
            }
            args.push(handle);
        }

        match self.heap.get(callee).clone() {
            Value::Builtin(builtin) => builtins::call(builtin.kind, &mut self.heap, self.out, &args),
            Value::Function(function) => self.call_function(&function, &args),
            other => self.error(format!("not a function: {}", other.type_name())),
        }
    }

    fn call_function(&mut self, function: &FunctionValue, args: &[ObjHandle]) -> ObjHandle {
        if function.params.len() != args.len() {
            return self.error(format!(
                "wrong number of arguments: expected {}, got {}",
                function.params.len(),
                args.len()
            ));
        }

        let call_env = Environment::enclosed(function.env.clone());
        for (param, &arg) in function.params.iter().zip(args) {
            call_env.borrow_mut().set(param.name.clone(), arg);
        }

        self.call_stack.push(call_env.clone());
        let result = self.eval_block(&function.body, &call_env);
        self.call_stack.pop();

        match self.heap.get(result) {
            Value::ReturnValue(inner) => *inner,
            _ => result,
        }
    }

    fn eval_array_literal(&mut self, elements: &[Expr], env: &Env) -> ObjHandle {
        let mut handles = Vec::with_capacity(elements.len());
        for element in elements {
            let handle = self.eval_expr(element, env);
            if self.is_error(handle) {
                return handle;
            }
            handles.push(handle);
        }
        self.heap.alloc(Value::Array(handles))
    }

    fn eval_index(&mut self, index_expr: &IndexExpr, env: &Env) -> ObjHandle {
        let left = self.eval_expr(&index_expr.left, env);
        if self.is_error(left) {
            return left;
        }
        let Some(elements) = self.heap.get(left).as_array().map(<[_]>::to_vec) else {
            return self.error(format!(
                "type error: cannot index into {}",
                self.heap.get(left).type_name()
            ));
        };

        let index = self.eval_expr(&index_expr.index, env);
        if self.is_error(index) {
            return index;
        }
        let Some(idx) = self.heap.get(index).as_integer() else {
            return self.error(format!(
                "type error: array index must be INTEGER, got {}",
                self.heap.get(index).type_name()
            ));
        };

        if idx < 0 || idx as usize >= elements.len() {
            return self.error(format!(
                "array index out of bounds: index {idx}, length {}",
                elements.len()
            ));
        }

        elements[idx as usize]
    }
}
