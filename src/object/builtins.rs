//! Built-in functions registered into the global environment at startup.
//!
//! `print` is the only builtin with an observable side effect, so it is the only one that takes
//! the evaluator's output sink; the CLI binary wires that sink to `stdout`, while tests wire it
//! to an in-memory buffer so program output can be asserted on without spawning a process.

use crate::gc::{Heap, ObjHandle};
use crate::object::{Builtin, BuiltinKind, Environment, StringData, Value};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Bind every built-in into `env`, allocating one [`Value::Builtin`] per function.
pub fn register(heap: &mut Heap, env: &Rc<RefCell<Environment>>) {
    bind(heap, env, "แสดง", BuiltinKind::Print);
    bind(heap, env, "len", BuiltinKind::Len);
    bind(heap, env, "push", BuiltinKind::Push);
    bind(heap, env, "pop", BuiltinKind::Pop);
}

fn bind(heap: &mut Heap, env: &Rc<RefCell<Environment>>, name: &'static str, kind: BuiltinKind) {
    let handle = heap.alloc(Value::Builtin(Builtin { name, kind }));
    env.borrow_mut().set(name, handle);
}

/// Dispatch a builtin call. `out` receives anything `print` writes; other builtins ignore it.
pub fn call(kind: BuiltinKind, heap: &mut Heap, out: &mut dyn Write, args: &[ObjHandle]) -> ObjHandle {
    match kind {
        BuiltinKind::Print => print(heap, out, args),
        BuiltinKind::Len => len(heap, args),
        BuiltinKind::Push => push(heap, args),
        BuiltinKind::Pop => pop(heap, args),
    }
}

fn arity_error(heap: &mut Heap, expected: usize, got: usize) -> ObjHandle {
    let message = format!("wrong number of arguments: expected {expected}, got {got}");
    crate::object::report_runtime_error(&message);
    heap.alloc(Value::Error(message))
}

fn type_error(heap: &mut Heap, builtin: &str, got: &str) -> ObjHandle {
    let message = format!("argument to `{builtin}` not supported, got {got}");
    crate::object::report_runtime_error(&message);
    heap.alloc(Value::Error(message))
}

fn print(heap: &mut Heap, out: &mut dyn Write, args: &[ObjHandle]) -> ObjHandle {
    let rendered: Vec<String> = args.iter().map(|&handle| display_value(heap, handle)).collect();
    // A broken pipe (e.g. `phasa script.ph | head`) is not a language-level error; ignore it the
    // way a Unix tool typically does rather than panicking mid-program.
    let _ = writeln!(out, "{}", rendered.join(" "));
    heap.null_handle()
}

fn len(heap: &mut Heap, args: &[ObjHandle]) -> ObjHandle {
    if args.len() != 1 {
        return arity_error(heap, 1, args.len());
    }

    match heap.get(args[0]) {
        Value::Str(s) => heap.alloc(Value::Integer(s.byte_len() as i64)),
        Value::Array(elements) => {
            let len = elements.len() as i64;
            heap.alloc(Value::Integer(len))
        }
        other => {
            let type_name = other.type_name();
            type_error(heap, "len", type_name)
        }
    }
}

fn push(heap: &mut Heap, args: &[ObjHandle]) -> ObjHandle {
    if args.len() != 2 {
        return arity_error(heap, 2, args.len());
    }

    let array_handle = args[0];
    let value_handle = args[1];

    match heap.get(array_handle) {
        Value::Array(_) => {}
        other => return type_error(heap, "push", other.type_name()),
    }

    if let Value::Array(elements) = heap.get_mut(array_handle) {
        elements.push(value_handle);
    }
    array_handle
}

fn pop(heap: &mut Heap, args: &[ObjHandle]) -> ObjHandle {
    if args.len() != 1 {
        return arity_error(heap, 1, args.len());
    }

    match heap.get(args[0]) {
        Value::Array(elements) if elements.is_empty() => {
            crate::object::report_runtime_error("pop from empty array");
            return heap.alloc(Value::Error("pop from empty array".to_string()));
        }
        Value::Array(_) => {}
        other => return type_error(heap, "pop", other.type_name()),
    }

    let popped = if let Value::Array(elements) = heap.get_mut(args[0]) {
        elements.pop()
    } else {
        None
    };
    popped.expect("array was checked non-empty above")
}

/// Top-level rendering used directly by `print`: strings print as their raw bytes (no quotes),
/// and arrays expand one level with [`format_element`] applied to each entry.
pub fn display_value(heap: &Heap, handle: ObjHandle) -> String {
    match heap.get(handle) {
        Value::Integer(n) => n.to_string(),
        Value::Boolean(true) => "จริง".to_string(),
        Value::Boolean(false) => "เท็จ".to_string(),
        Value::Str(s) => s.as_str().to_string(),
        Value::Null => "ว่างเปล่า".to_string(),
        Value::Array(elements) => format_array(heap, elements),
        Value::Function(_) => "<function>".to_string(),
        Value::Builtin(b) => format!("<builtin: {}>", b.name),
        Value::Error(message) => format!("ERROR: {message}"),
        Value::ReturnValue(inner) => display_value(heap, *inner),
    }
}

fn format_array(heap: &Heap, elements: &[ObjHandle]) -> String {
    let rendered: Vec<String> = elements.iter().map(|&handle| format_element(heap, handle)).collect();
    format!("[{}]", rendered.join(", "))
}

/// Rendering used for values nested one level inside a printed array: strings are quoted, and a
/// nested array collapses to the literal text `[nested array]` rather than expanding further.
fn format_element(heap: &Heap, handle: ObjHandle) -> String {
    match heap.get(handle) {
        Value::Str(s) => format!("\"{}\"", s.as_str()),
        Value::Array(_) => "[nested array]".to_string(),
        _ => display_value(heap, handle),
    }
}

pub fn owned_string(value: impl Into<String>) -> StringData {
    StringData::Owned(value.into())
}

pub fn borrowed_string(value: &str) -> StringData {
    StringData::Borrowed(Rc::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_reports_byte_length_of_strings() {
        let mut heap = Heap::new();
        let handle = heap.alloc(Value::Str(owned_string("abc")));
        let result = len(&mut heap, &[handle]);
        assert!(matches!(heap.get(result), Value::Integer(3)));
    }

    #[test]
    fn len_rejects_unsupported_types() {
        let mut heap = Heap::new();
        let handle = heap.alloc(Value::Integer(1));
        let result = len(&mut heap, &[handle]);
        match heap.get(result) {
            Value::Error(message) => assert!(message.contains("INTEGER")),
            other => panic!("expected error, got {:?}", other.type_name()),
        }
    }

    #[test]
    fn push_grows_array_in_place() {
        let mut heap = Heap::new();
        let element = heap.alloc(Value::Integer(1));
        let array = heap.alloc(Value::Array(vec![element]));
        let new_element = heap.alloc(Value::Integer(2));

        let result = push(&mut heap, &[array, new_element]);
        assert_eq!(result, array);
        assert_eq!(heap.get(array).as_array().unwrap().len(), 2);
    }

    #[test]
    fn pop_from_empty_array_is_an_error() {
        let mut heap = Heap::new();
        let array = heap.alloc(Value::Array(Vec::new()));
        let result = pop(&mut heap, &[array]);
        match heap.get(result) {
            Value::Error(message) => assert!(message.contains("empty")),
            other => panic!("expected error, got {:?}", other.type_name()),
        }
    }

    #[test]
    fn array_print_quotes_nested_strings_and_collapses_nested_arrays() {
        let mut heap = Heap::new();
        let s = heap.alloc(Value::Str(owned_string("hi")));
        let inner = heap.alloc(Value::Array(Vec::new()));
        let outer = heap.alloc(Value::Array(vec![s, inner]));
        assert_eq!(display_value(&heap, outer), "[\"hi\", [nested array]]");
    }

    #[test]
    fn print_writes_space_separated_values_with_trailing_newline() {
        let mut heap = Heap::new();
        let a = heap.alloc(Value::Integer(1));
        let b = heap.alloc(Value::Str(owned_string("x")));
        let mut out = Vec::new();
        print(&mut heap, &mut out, &[a, b]);
        assert_eq!(String::from_utf8(out).unwrap(), "1 x\n");
    }
}
