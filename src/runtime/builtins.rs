//! Built-in functions and the host streams they use

use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;

use crate::error::{NahualError, NahualResult};
use crate::types::{convert, Kind};
use super::environment::{EnvId, Environments};
use super::function::{Arity, FunctionDef};
use super::value::Value;

/// Input and output streams seen by `percibir` and `invocar`
pub struct HostIo {
    pub input: Box<dyn BufRead>,
    pub output: Box<dyn Write>,
}

impl HostIo {
    pub fn new(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Process standard input and output
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

/// Bind every built-in in `env`
pub fn register(envs: &mut Environments, env: EnvId) {
    let builtins: [(&str, Arity, super::function::NativeFn); 4] = [
        ("invocar", Arity::Variadic, invocar),
        ("percibir", Arity::Range(0, 1), percibir),
        ("longitud", Arity::Exact(1), longitud),
        ("convertir", Arity::Exact(2), convertir),
    ];

    for (name, arity, func) in builtins {
        envs.define_function(env, name, Rc::new(FunctionDef::native(name, arity, func, env)));
    }
}

fn host_error(action: &str, err: io::Error) -> NahualError {
    NahualError::execution(format!("failed to {}: {}", action, err))
}

/// Print the arguments separated by spaces
fn invocar(io: &mut HostIo, args: &[Value]) -> NahualResult<Value> {
    let line: Vec<String> = args.iter().map(|value| value.to_string()).collect();
    writeln!(io.output, "{}", line.join(" ")).map_err(|e| host_error("write output", e))?;
    io.output.flush().map_err(|e| host_error("write output", e))?;
    Ok(Value::Boolean(true))
}

/// Read one line, after showing the optional prompt
fn percibir(io: &mut HostIo, args: &[Value]) -> NahualResult<Value> {
    if let Some(prompt) = args.first() {
        write!(io.output, "{}", prompt).map_err(|e| host_error("write prompt", e))?;
        io.output.flush().map_err(|e| host_error("write prompt", e))?;
    }

    let mut line = String::new();
    let read = io
        .input
        .read_line(&mut line)
        .map_err(|e| host_error("read input", e))?;
    if read == 0 {
        return Err(NahualError::execution("end of input while reading with percibir"));
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::String(line))
}

fn longitud(_: &mut HostIo, args: &[Value]) -> NahualResult<Value> {
    let length = match &args[0] {
        Value::List(list) => list.elements.len(),
        Value::String(s) => s.chars().count(),
        other => {
            return Err(NahualError::type_mismatch(
                format!("longitud is not defined for {}", other.type_name()),
                "ofrenda/mantra",
                other.type_name(),
            ))
        }
    };

    i64::try_from(length)
        .map(Value::Integer)
        .map_err(|_| NahualError::execution("length does not fit in an espiritu"))
}

fn convertir(_: &mut HostIo, args: &[Value]) -> NahualResult<Value> {
    match &args[1] {
        Value::String(target) => convert(args[0].clone(), target),
        other => Err(NahualError::type_mismatch(
            "convertir expects the target type name as a mantra",
            Kind::String.name(),
            other.type_name(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::value::ListValue;
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn host(input: &str) -> (HostIo, Captured) {
        let out = Captured::default();
        (HostIo::new(Cursor::new(input.to_string()), out.clone()), out)
    }

    #[test]
    fn test_invocar_joins_with_spaces() {
        let (mut io, out) = host("");
        let result = invocar(
            &mut io,
            &[Value::String("total:".into()), Value::Integer(3), Value::Float(2.0)],
        )
        .unwrap();
        assert_eq!(result, Value::Boolean(true));
        assert_eq!(out.text(), "total: 3 2.0\n");
    }

    #[test]
    fn test_percibir_strips_line_ending() {
        let (mut io, out) = host("Ana\r\nLuis\n");
        let first = percibir(&mut io, &[Value::String("nombre: ".into())]).unwrap();
        let second = percibir(&mut io, &[]).unwrap();
        assert_eq!(first, Value::String("Ana".into()));
        assert_eq!(second, Value::String("Luis".into()));
        assert_eq!(out.text(), "nombre: ");
    }

    #[test]
    fn test_percibir_at_end_of_input() {
        let (mut io, _) = host("");
        let err = percibir(&mut io, &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Execution);
    }

    #[test]
    fn test_longitud() {
        let (mut io, _) = host("");
        let list = Value::List(ListValue::from_elements(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(longitud(&mut io, &[list]).unwrap(), Value::Integer(2));
        assert_eq!(longitud(&mut io, &[Value::String("niño".into())]).unwrap(), Value::Integer(4));
        let err = longitud(&mut io, &[Value::Integer(5)]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
    }

    #[test]
    fn test_convertir_needs_type_name() {
        let (mut io, _) = host("");
        let ok = convertir(&mut io, &[Value::Float(3.14), Value::String("espiritu".into())]).unwrap();
        assert_eq!(ok, Value::Integer(3));
        let err = convertir(&mut io, &[Value::Float(3.14), Value::Integer(1)]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Type { .. }));
    }

    #[test]
    fn test_register_binds_all_builtins() {
        let mut envs = Environments::new();
        let root = envs.root();
        register(&mut envs, root);
        for name in ["invocar", "percibir", "longitud", "convertir"] {
            assert!(envs.lookup_function(root, name).unwrap().is_native());
        }
    }
}
