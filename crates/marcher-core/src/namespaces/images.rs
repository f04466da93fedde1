//! Color image construction and tone mapping.

use crate::error::{Result, RuntimeError};
use crate::runtime::dispatch::CallContext;
use crate::runtime::frame::{Arguments, Frame};
use crate::runtime::value::Value;
use crate::types::arrays::ColorImage;
use crate::types::key::TypeKey;
use crate::types::vectors::Color;
use super::{arg_as, arg_num, check_argc, def, BuiltinSpec};

const COLOR_IMAGE: TypeKey = TypeKey::of("color_image");

pub fn builtins() -> Vec<BuiltinSpec> {
    vec![
        def("color_image create_image( num width, num height, color fill )",  create_image),
        def("color_image saturate( color_image image, num gamma )",           saturate),
    ]
}

fn dimension(name: &str, v: f64) -> Result<usize> {
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
        return Err(RuntimeError::invalid_argument(name, format!("image dimension must be a whole number >= 0, got {v}")));
    }
    Ok(v as usize)
}

fn create_image(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 3)?;
    let width = dimension("create_image", arg_num(args, 0, frame)?)?;
    let height = dimension("create_image", arg_num(args, 1, frame)?)?;
    let fill = arg_as::<Color>(args, 2, frame)?;

    let mut ret = ctx.runtime.types().create(COLOR_IMAGE)?;
    ret.downcast_mut::<ColorImage>()?.set_size_2d(width, height, fill)?;
    Ok(ret)
}

/// Returns a tone-mapped copy; the argument itself is left untouched.
fn saturate(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 2)?;
    let image = arg_as::<ColorImage>(args, 0, frame)?;
    let gamma = arg_num(args, 1, frame)?;

    let mut ret = ctx.runtime.types().create(COLOR_IMAGE)?;
    let out = ret.downcast_mut::<ColorImage>()?;
    *out = image;
    out.saturate(gamma, ctx.runtime.config().parallel_saturate_min);
    Ok(ret)
}
