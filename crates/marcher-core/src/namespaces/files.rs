//! File-system predicates and edits. Failures are reported as `false`, never as
//! errors.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use crate::error::Result;
use crate::runtime::dispatch::CallContext;
use crate::runtime::frame::{Arguments, Frame};
use crate::runtime::value::Value;
use super::{arg_text, check_argc, def, BuiltinSpec};

pub fn builtins() -> Vec<BuiltinSpec> {
    vec![
        def("bool file_exists( string file )",                      file_exists),
        def("bool file_touch( string file )",                       file_touch),
        def("bool file_delete( string file )",                      file_delete),
        def("bool file_rename( string src_file, string dst_file )", file_rename),
    ]
}

fn outcome(op: &str, path: &str, r: io::Result<()>) -> Value<'static> {
    match r {
        Ok(()) => Value::bool(true),
        Err(e) => {
            tracing::debug!(op, path, error = %e, "file operation failed");
            Value::bool(false)
        }
    }
}

fn file_exists(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    let file = arg_text(args, 0, frame)?;
    Ok(Value::bool(Path::new(&file).exists()))
}

/// Create the file if missing; existing contents are left alone.
fn file_touch(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    let file = arg_text(args, 0, frame)?;
    let r = OpenOptions::new().create(true).append(true).open(&file).map(|_| ());
    Ok(outcome("touch", &file, r))
}

fn file_delete(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    let file = arg_text(args, 0, frame)?;
    Ok(outcome("delete", &file, fs::remove_file(&file)))
}

fn file_rename(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 2)?;
    let src = arg_text(args, 0, frame)?;
    let dst = arg_text(args, 1, frame)?;
    Ok(outcome("rename", &src, fs::rename(&src, &dst)))
}
