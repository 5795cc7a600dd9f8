//! Runtime values and the environments that bind names to them.
//!
//! Every [`Value`] lives in the [`crate::gc::Heap`] behind an [`crate::gc::ObjHandle`] rather
//! than directly inside an `Rc`: the collector needs to be able to walk "all live objects" and
//! reclaim the ones no root can reach, which a plain `Rc`-counted graph can't express (and can't
//! detect a reference cycle in, which closures capturing their own enclosing scope produce
//! routinely). [`Environment`], by contrast, is an ordinary `Rc<RefCell<_>>` chain — it is a
//! root for the values it holds handles to, not itself a GC-managed object.

pub mod builtins;
mod environment;
mod value;

pub use environment::Environment;
pub use value::{Builtin, BuiltinKind, FunctionValue, StringData, Value};

use colored::Colorize;

/// Every runtime `ERROR` value is reported here the moment it is allocated, independent of
/// whatever prints the final propagated result — matching the original interpreter's behaviour
/// of surfacing a runtime problem to stderr as soon as it happens, not only once it reaches the
/// top of the call stack.
pub fn report_runtime_error(message: &str) {
    eprintln!("{}", format!("error[runtime]: {message}").red().bold());
}
