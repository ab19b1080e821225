//! Interpreter implementation
//!
//! This module implements the tree-walking interpreter for NahualScript.

use std::rc::Rc;

use crate::error::{Diagnostic, Frame, NahualError, NahualResult, SourceLocation};
use crate::parser::ast::{Block, Expr, Literal, LogicalOp, Program, Stmt};
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;
use crate::types::TypeChecker;
use super::builtins::{self, HostIo};
use super::environment::{EnvId, Environments};
use super::function::{FunctionBody, FunctionDef};
use super::operators::{eval_binary, eval_unary};
use super::value::{ListValue, Value};

/// Interpreter settings
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Verbose diagnostics
    pub debug: bool,
    /// Deepest allowed nesting of declared-function calls
    pub max_call_depth: usize,
    /// Name reported in diagnostic locations
    pub filename: Option<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_call_depth: 200,
            filename: None,
        }
    }
}

/// Control flow signals
#[derive(Debug, Clone, PartialEq)]
enum ControlFlow {
    None,
    Return(Option<Value>),
}

/// A running call of a declared function
#[derive(Debug)]
struct Activation {
    function_name: String,
    call_site: SourceLocation,
    env: EnvId,
}

/// Interpreter
pub struct Interpreter {
    config: InterpreterConfig,
    envs: Environments,
    globals: EnvId,
    current: EnvId,
    control_flow: ControlFlow,
    activations: Vec<Activation>,
    io: HostIo,
}

impl Interpreter {
    pub fn new(debug: bool) -> Self {
        Self::with_config(InterpreterConfig {
            debug,
            ..InterpreterConfig::default()
        })
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self::with_io(config, HostIo::stdio())
    }

    /// Interpreter reading and printing through `io` instead of stdio
    pub fn with_io(config: InterpreterConfig, io: HostIo) -> Self {
        let mut envs = Environments::new();
        let globals = envs.root();
        builtins::register(&mut envs, globals);

        Self {
            config,
            envs,
            globals,
            current: globals,
            control_flow: ControlFlow::None,
            activations: Vec::new(),
            io,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Parse and execute `source`, turning any failure into a diagnostic.
    ///
    /// Globals persist between calls on the same interpreter.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, source: &str) -> Result<Option<Value>, Diagnostic> {
        let result = Parser::parse_source(source, self.config.filename.as_deref())
            .and_then(|program| self.execute(&program));

        result.map_err(|error| {
            tracing::debug!(kind = %error.kind, message = %error.message, "program failed");
            Diagnostic::with_source(error, source).verbose(self.config.debug)
        })
    }

    /// Execute a parsed program in the global environment.
    ///
    /// Yields the value of the last top-level declaration, or the value of a
    /// top-level `retornar`.
    pub fn execute(&mut self, program: &Program) -> NahualResult<Option<Value>> {
        let mut last = None;

        for stmt in &program.declarations {
            match self.execute_stmt(stmt) {
                Ok(value) => last = value,
                Err(err) => {
                    self.reset();
                    return Err(err);
                }
            }

            if let ControlFlow::Return(value) = std::mem::replace(&mut self.control_flow, ControlFlow::None) {
                return Ok(value);
            }
        }

        Ok(last)
    }

    /// Value of a global variable
    pub fn global(&self, name: &str) -> Option<Value> {
        self.envs.lookup_variable(self.globals, name).ok().cloned()
    }

    /// Call a global function from the host
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> NahualResult<Option<Value>> {
        let function = self.envs.lookup_function(self.globals, name)?;
        let call_site = function
            .declared_at
            .clone()
            .unwrap_or_else(|| SourceLocation::at(1, 1));

        let result = self.call_function(function, args, &call_site);
        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Drop every activation left behind by an aborted program.
    fn reset(&mut self) {
        self.envs.discard(self.globals);
        self.current = self.globals;
        self.activations.clear();
        self.control_flow = ControlFlow::None;
    }

    // ===== Statements =====

    fn execute_stmt(&mut self, stmt: &Stmt) -> NahualResult<Option<Value>> {
        ensure_sufficient_stack(|| self.execute_stmt_inner(stmt)).map_err(|e| e.at(stmt.location()))
    }

    fn execute_stmt_inner(&mut self, stmt: &Stmt) -> NahualResult<Option<Value>> {
        match stmt {
            Stmt::VarDecl {
                type_name,
                name,
                initializer,
                ..
            } => {
                let value = self.eval_expr(initializer)?;
                TypeChecker::check_assignment(name, *type_name, &value)?;
                tracing::trace!(name = %name, value = %value, "define variable");
                self.envs.define_variable(self.current, name.clone(), value.clone());
                Ok(Some(value))
            }

            Stmt::Assign { name, value, .. } => {
                let value = self.eval_expr(value)?;
                let previous = self.envs.lookup_variable(self.current, name)?;
                TypeChecker::check_assignment(name, previous.kind(), &value)?;
                self.envs.assign_variable(self.current, name, value.clone())?;
                Ok(Some(value))
            }

            Stmt::FunctionDecl {
                name,
                params,
                body,
                location,
            } => {
                let function = FunctionDef {
                    name: name.clone(),
                    params: params.clone(),
                    body: FunctionBody::Ast(body.clone()),
                    closure: self.current,
                    declared_at: Some(location.clone()),
                };
                self.envs.define_function(self.current, name.clone(), Rc::new(function));
                Ok(None)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.eval_expr(condition)?;
                if TypeChecker::check_condition(&condition)? {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(None)
                }
            }

            Stmt::While { condition, body, .. } => {
                loop {
                    let value = self.eval_expr(condition)?;
                    if !TypeChecker::check_condition(&value)? {
                        break;
                    }

                    self.execute_block(body)?;
                    if self.control_flow != ControlFlow::None {
                        break;
                    }
                }
                Ok(None)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                self.control_flow = ControlFlow::Return(value);
                Ok(None)
            }

            Stmt::Block(block) => self.execute_block(block),

            Stmt::Expression { expr, .. } => self.evaluate(expr),
        }
    }

    /// Blocks share the enclosing environment.
    fn execute_block(&mut self, block: &Block) -> NahualResult<Option<Value>> {
        let mut last = None;

        for stmt in &block.statements {
            last = self.execute_stmt(stmt)?;
            if self.control_flow != ControlFlow::None {
                break;
            }
        }

        Ok(last)
    }

    // ===== Expressions =====

    /// Evaluate an expression whose value is required
    fn eval_expr(&mut self, expr: &Expr) -> NahualResult<Value> {
        match self.evaluate(expr)? {
            Some(value) => Ok(value),
            None => {
                let name = match expr {
                    Expr::Call { name, .. } => name.as_str(),
                    _ => "expression",
                };
                Err(NahualError::semantic(format!("'{}' does not return a value", name))
                    .at(expr.location()))
            }
        }
    }

    /// Evaluate an expression; only calls may produce no value.
    fn evaluate(&mut self, expr: &Expr) -> NahualResult<Option<Value>> {
        ensure_sufficient_stack(|| self.evaluate_inner(expr)).map_err(|e| e.at(expr.location()))
    }

    fn evaluate_inner(&mut self, expr: &Expr) -> NahualResult<Option<Value>> {
        match expr {
            Expr::Literal { value, .. } => Ok(Some(match value {
                Literal::Integer(n) => Value::Integer(*n),
                Literal::Float(f) => Value::Float(*f),
                Literal::String(s) => Value::String(s.clone()),
                Literal::Boolean(b) => Value::Boolean(*b),
            })),

            Expr::Variable { name, .. } => self.envs.lookup_variable(self.current, name).cloned().map(Some),

            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                eval_binary(*operator, left, right).map(Some)
            }

            Expr::Logical {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.eval_expr(left)?;
                let left = TypeChecker::check_boolean(operator.as_str(), &left)?;

                let short_circuit = match operator {
                    LogicalOp::And => !left,
                    LogicalOp::Or => left,
                };
                if short_circuit {
                    return Ok(Some(Value::Boolean(left)));
                }

                let right = self.eval_expr(right)?;
                Ok(Some(Value::Boolean(TypeChecker::check_boolean(operator.as_str(), &right)?)))
            }

            Expr::Unary {
                operator, operand, ..
            } => {
                let operand = self.eval_expr(operand)?;
                eval_unary(*operator, operand).map(Some)
            }

            Expr::Call {
                name,
                arguments,
                location,
            } => {
                let function = self.envs.lookup_function(self.current, name)?;
                let args = self.eval_arguments(arguments)?;
                self.call_function(function, args, location)
            }

            Expr::SystemCall {
                function,
                arguments,
                location,
            } => {
                let function = self.envs.lookup_function(self.globals, function.name())?;
                let args = self.eval_arguments(arguments)?;
                self.call_function(function, args, location)
            }

            Expr::List { elements, .. } => {
                let elements = self.eval_arguments(elements)?;
                Ok(Some(Value::List(ListValue::from_elements(elements))))
            }

            Expr::Index { target, index, .. } => {
                let target = self.eval_expr(target)?;
                let index = self.eval_expr(index)?;
                match (target, index) {
                    (Value::List(list), Value::Integer(i)) => list.get(i).cloned().map(Some),
                    (Value::List(_), other) => Err(NahualError::type_mismatch(
                        "list index must be an espiritu",
                        "espiritu",
                        other.type_name(),
                    )),
                    (other, _) => Err(NahualError::type_mismatch(
                        format!("cannot index into {}", other.type_name()),
                        "ofrenda",
                        other.type_name(),
                    )),
                }
            }

            Expr::MethodCall {
                receiver,
                method,
                arguments,
                ..
            } => {
                let target = self.eval_expr(receiver)?;
                let args = self.eval_arguments(arguments)?;
                self.call_method(receiver, target, method, args).map(Some)
            }
        }
    }

    fn eval_arguments(&mut self, arguments: &[Expr]) -> NahualResult<Vec<Value>> {
        arguments.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Methods exist only on lists.
    fn call_method(&mut self, receiver: &Expr, target: Value, method: &str, args: Vec<Value>) -> NahualResult<Value> {
        let mut list = match target {
            Value::List(list) => list,
            other => {
                return Err(NahualError::semantic(format!(
                    "{} has no method '{}'",
                    other.type_name(),
                    method
                )))
            }
        };

        let expect_args = |count: usize| {
            if args.len() == count {
                Ok(())
            } else {
                Err(NahualError::semantic(format!(
                    "method '{}' expects {} argument(s), got {}",
                    method,
                    count,
                    args.len()
                )))
            }
        };

        match method {
            "agregar" => {
                expect_args(1)?;
                list.push(args[0].clone())?;
                // Write the grown list back to the variable it came from
                if let Expr::Variable { name, .. } = receiver {
                    self.envs.assign_variable(self.current, name, Value::List(list))?;
                }
                Ok(Value::Boolean(true))
            }
            "longitud" => {
                expect_args(0)?;
                i64::try_from(list.elements.len())
                    .map(Value::Integer)
                    .map_err(|_| NahualError::execution("length does not fit in an espiritu"))
            }
            _ => Err(NahualError::semantic(format!("ofrenda has no method '{}'", method))),
        }
    }

    // ===== Calls =====

    fn call_function(
        &mut self,
        function: Rc<FunctionDef>,
        args: Vec<Value>,
        call_site: &SourceLocation,
    ) -> NahualResult<Option<Value>> {
        function.check_arity(args.len())?;

        let body = match &function.body {
            FunctionBody::Native(native) => {
                tracing::trace!(function = %function.name, "native call");
                return (native.func)(&mut self.io, &args).map(Some);
            }
            FunctionBody::Ast(body) => body,
        };

        if self.activations.len() >= self.config.max_call_depth {
            return Err(NahualError::execution(format!(
                "maximum call depth of {} exceeded in '{}'",
                self.config.max_call_depth, function.name
            )));
        }

        for (param, arg) in function.params.iter().zip(&args) {
            TypeChecker::check_argument(&function.name, &param.name, param.type_name, arg)?;
        }

        tracing::debug!(
            function = %function.name,
            depth = self.activations.len() + 1,
            "call"
        );

        let env = self.envs.push(function.closure);
        for (param, arg) in function.params.iter().zip(args) {
            self.envs.define_variable(env, param.name.clone(), arg);
        }

        let caller = std::mem::replace(&mut self.current, env);
        self.activations.push(Activation {
            function_name: function.name.clone(),
            call_site: call_site.clone(),
            env,
        });

        let result = self.execute_block(body);

        let result = match result {
            Ok(_) => match std::mem::replace(&mut self.control_flow, ControlFlow::None) {
                ControlFlow::Return(value) => Ok(value),
                ControlFlow::None => Ok(None),
            },
            Err(err) => {
                let frames = self.capture_call_stack();
                Err(err.with_call_stack(frames))
            }
        };

        self.activations.pop();
        self.current = caller;
        self.envs.discard(env);

        if let Ok(ref value) = result {
            tracing::trace!(function = %function.name, returned = ?value, "return");
        }
        result
    }

    /// Frames of every active call, innermost last
    fn capture_call_stack(&self) -> Vec<Frame> {
        self.activations
            .iter()
            .map(|activation| Frame {
                function_name: activation.function_name.clone(),
                location: Some(activation.call_site.clone()),
                locals: self.envs.snapshot(activation.env),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io::{self, Cursor, Write};

    #[derive(Clone, Default)]
    struct Output(Rc<RefCell<Vec<u8>>>);

    impl Write for Output {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn interpreter_with_input(input: &str) -> (Interpreter, Output) {
        let output = Output::default();
        let io = HostIo::new(Cursor::new(input.to_string()), output.clone());
        (Interpreter::with_io(InterpreterConfig::default(), io), output)
    }

    fn interpreter() -> (Interpreter, Output) {
        interpreter_with_input("")
    }

    fn printed(output: &Output) -> String {
        String::from_utf8(output.0.borrow().clone()).unwrap()
    }

    fn run_err(source: &str) -> NahualError {
        let (mut interp, _) = interpreter();
        interp.run(source).unwrap_err().into_error()
    }

    #[test]
    fn test_program_value_is_last_declaration() {
        let (mut interp, _) = interpreter();
        let value = interp.run("espiritu x := 2; x multiplicar 21;").unwrap();
        assert_eq!(value, Some(Value::Integer(42)));
    }

    #[test]
    fn test_top_level_return_halts() {
        let (mut interp, output) = interpreter();
        let value = interp.run("retornar 7; invocar \"nunca\";").unwrap();
        assert_eq!(value, Some(Value::Integer(7)));
        assert_eq!(printed(&output), "");
    }

    #[test]
    fn test_declaration_keeps_value_as_given() {
        let (mut interp, _) = interpreter();
        interp.run("energia e := 3; espiritu i := 2.5;").unwrap();
        assert_eq!(interp.global("e"), Some(Value::Integer(3)));
        assert_eq!(interp.global("i"), Some(Value::Float(2.5)));
    }

    #[test]
    fn test_declaration_type_mismatch() {
        let err = run_err("espiritu x := \"no es un número\";");
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
        assert_eq!(err.location, Some(SourceLocation::at(1, 1)));
    }

    #[test]
    fn test_factorial() {
        let (mut interp, _) = interpreter();
        let source = "
            sabiduria factorial(espiritu n) {
                vision (n menor_igual 1) { retornar 1; }
                retornar n multiplicar factorial(n separar 1);
            }
            espiritu r := factorial(5);
        ";
        interp.run(source).unwrap();
        assert_eq!(interp.global("r"), Some(Value::Integer(120)));
        assert_eq!(interp.call("factorial", vec![Value::Integer(6)]).unwrap(), Some(Value::Integer(720)));
    }

    #[test]
    fn test_shadowing_inside_function() {
        let (mut interp, _) = interpreter();
        let source = "
            espiritu x := 1;
            sabiduria f() { espiritu x := 99; retornar x; }
            espiritu y := f();
        ";
        interp.run(source).unwrap();
        assert_eq!(interp.global("x"), Some(Value::Integer(1)));
        assert_eq!(interp.global("y"), Some(Value::Integer(99)));
    }

    #[test]
    fn test_assignment_updates_enclosing_binding() {
        let (mut interp, _) = interpreter();
        let source = "
            espiritu total := 0;
            sabiduria sumar(espiritu n) { total := total unir n; }
            sumar(3); sumar(4);
        ";
        interp.run(source).unwrap();
        assert_eq!(interp.global("total"), Some(Value::Integer(7)));
    }

    #[test]
    fn test_assignment_requires_existing_binding() {
        let err = run_err("nada := 1;");
        assert_eq!(
            err.kind,
            ErrorKind::UnresolvedBinding {
                name: "nada".to_string()
            }
        );
    }

    #[test]
    fn test_closure_sees_declaring_scope() {
        let (mut interp, _) = interpreter();
        let source = "
            sabiduria externo(espiritu base) {
                sabiduria interno(espiritu n) { retornar base unir n; }
                retornar interno(10);
            }
            espiritu r := externo(5);
        ";
        interp.run(source).unwrap();
        assert_eq!(interp.global("r"), Some(Value::Integer(15)));
    }

    #[test]
    fn test_callee_cannot_see_caller_locals() {
        let err = run_err(
            "sabiduria leer() { retornar oculto; }
             sabiduria llamar() { espiritu oculto := 1; retornar leer(); }
             llamar();",
        );
        assert!(err.kind.is_semantic());
    }

    #[test]
    fn test_while_loop_and_print() {
        let (mut interp, output) = interpreter();
        let source = "
            espiritu i := 0;
            mantra s := \"\";
            ritual (i menor 3) {
                s := s unir convertir(i, \"mantra\");
                i := i unir 1;
            }
            invocar s, i;
        ";
        interp.run(source).unwrap();
        assert_eq!(printed(&output), "012 3\n");
    }

    #[test]
    fn test_condition_must_be_boolean() {
        let err = run_err("vision (1) { invocar 1; }");
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
    }

    #[test]
    fn test_logical_short_circuit() {
        let (mut interp, _) = interpreter();
        // the right operand would fail if evaluated
        let value = interp.run("falso y (1 dividir 0 igual 1);").unwrap();
        assert_eq!(value, Some(Value::Boolean(false)));
        let value = interp.run("cierto o indefinida;").unwrap();
        assert_eq!(value, Some(Value::Boolean(true)));
    }

    #[test]
    fn test_list_methods() {
        let (mut interp, _) = interpreter();
        interp
            .run("ofrenda xs := [1, 2, 3]; xs.agregar(4); espiritu n := longitud(xs); espiritu m := xs.longitud();")
            .unwrap();
        assert_eq!(interp.global("n"), Some(Value::Integer(4)));
        assert_eq!(interp.global("m"), Some(Value::Integer(4)));
    }

    #[test]
    fn test_list_append_kind_mismatch() {
        let err = run_err("ofrenda xs := [1, 2, 3]; xs.agregar(\"a\");");
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
    }

    #[test]
    fn test_method_errors_are_semantic() {
        assert_eq!(run_err("ofrenda xs := []; xs.quitar(1);").kind, ErrorKind::Semantic);
        assert_eq!(run_err("mantra s := \"a\"; s.agregar(1);").kind, ErrorKind::Semantic);
        assert_eq!(run_err("ofrenda xs := []; xs.agregar();").kind, ErrorKind::Semantic);
    }

    #[test]
    fn test_index_out_of_range() {
        let err = run_err("ofrenda xs := [1]; xs[1];");
        assert_eq!(err.kind, ErrorKind::Execution);
        let err = run_err("ofrenda xs := [1]; xs[separar 1];");
        assert_eq!(err.kind, ErrorKind::Execution);
    }

    #[test]
    fn test_argument_checks() {
        let err = run_err("sabiduria f(espiritu n) { retornar n; } f(1, 2);");
        assert_eq!(err.kind, ErrorKind::Semantic);

        let err = run_err("sabiduria f(espiritu n) { retornar n; } f(\"uno\");");
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
        assert!(err.message.contains("'n'"));
    }

    #[test]
    fn test_missing_return_value() {
        let err = run_err("sabiduria f() { invocar 1; } espiritu x := f();");
        assert_eq!(err.kind, ErrorKind::Semantic);
        assert!(err.message.contains("'f'"));
    }

    #[test]
    fn test_call_stack_is_captured() {
        let source = "
            sabiduria dividir_por(espiritu d) { retornar 10 dividir d; }
            sabiduria calcular(espiritu v) { retornar dividir_por(v separar v); }
            calcular(3);
        ";
        let err = run_err(source);
        assert_eq!(err.kind, ErrorKind::Execution);
        assert_eq!(err.location, Some(SourceLocation::at(2, 58)));

        let names: Vec<&str> = err.call_stack.iter().map(|f| f.function_name.as_str()).collect();
        assert_eq!(names, vec!["calcular", "dividir_por"]);
        assert_eq!(err.call_stack[1].locals, vec![("d".to_string(), "0".to_string())]);
    }

    #[test]
    fn test_call_depth_limit() {
        let config = InterpreterConfig {
            max_call_depth: 40,
            ..InterpreterConfig::default()
        };
        let io = HostIo::new(Cursor::new(String::new()), Output::default());
        let mut interp = Interpreter::with_io(config, io);
        let err = interp
            .run("sabiduria sin_fin(espiritu n) { retornar sin_fin(n unir 1); } sin_fin(0);")
            .unwrap_err()
            .into_error();
        assert_eq!(err.kind, ErrorKind::Execution);
        assert!(err.message.contains("maximum call depth"));
        assert_eq!(err.call_stack.len(), 40);

        // the interpreter is usable again afterwards
        assert_eq!(interp.run("1 unir 1;").unwrap(), Some(Value::Integer(2)));
    }

    const SUM_TO: &str = "sabiduria s(espiritu n) { vision (n igual 0) { retornar 0; } retornar n unir s(n separar 1); }";

    #[test]
    fn test_recursion_just_inside_default_depth() {
        let (mut interp, _) = interpreter();
        interp.run(&format!("{} espiritu r := s(199);", SUM_TO)).unwrap();
        assert_eq!(interp.global("r"), Some(Value::Integer(19900)));
    }

    #[test]
    fn test_recursion_past_default_depth() {
        let (mut interp, _) = interpreter();
        let err = interp
            .run(&format!("{} espiritu r := s(201);", SUM_TO))
            .unwrap_err()
            .into_error();
        assert_eq!(err.kind, ErrorKind::Execution);
        assert!(err.message.contains("maximum call depth of 200"));
        assert_eq!(err.call_stack.len(), 200);
        assert_eq!(interp.global("r"), None);
    }

    #[test]
    fn test_deeply_nested_expression_evaluates() {
        let (mut interp, _) = interpreter();
        let source = format!("verdad v := {}cierto; espiritu x := (((1 unir 1)));", "no ".repeat(1000));
        interp.run(&source).unwrap();
        assert_eq!(interp.global("v"), Some(Value::Boolean(true)));
        assert_eq!(interp.global("x"), Some(Value::Integer(2)));
    }

    #[test]
    fn test_failure_stops_later_declarations() {
        let (mut interp, output) = interpreter();
        assert!(interp.run("invocar 1; invocar 1 dividir 0; invocar 2;").is_err());
        assert_eq!(printed(&output), "1\n");
    }

    #[test]
    fn test_percibir_reads_input() {
        let (mut interp, output) = interpreter_with_input("21\n");
        interp
            .run("mantra s := percibir(\"n? \"); espiritu n := convertir(s, \"espiritu\") multiplicar 2;")
            .unwrap();
        assert_eq!(interp.global("n"), Some(Value::Integer(42)));
        assert_eq!(printed(&output), "n? ");
    }

    #[test]
    fn test_globals_persist_between_runs() {
        let (mut interp, _) = interpreter();
        interp.run("sabiduria doble(espiritu n) { retornar n multiplicar 2; }").unwrap();
        assert_eq!(interp.run("doble(4);").unwrap(), Some(Value::Integer(8)));
    }
}
