use crate::error::Result;
use crate::runtime::dispatch::CallContext;
use crate::runtime::frame::{Arguments, Frame};
use crate::runtime::value::Value;
use super::{check_argc, def, BuiltinSpec};

pub fn builtins() -> Vec<BuiltinSpec> {
    vec![def("f64 get_time()", get_time)]
}

/// Seconds elapsed since the runtime was created.
fn get_time(ctx: &CallContext<'_>, _frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 0)?;
    Ok(Value::num(ctx.runtime.elapsed()))
}
