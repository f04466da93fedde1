//! Vector, color and rotation constructors.
//! Rotation angles are given in degrees.

use crate::error::Result;
use crate::runtime::dispatch::CallContext;
use crate::runtime::frame::{Arguments, Frame};
use crate::runtime::value::Value;
use crate::types::key::TypeKey;
use crate::types::vectors::{Color, M3d, V3d};
use super::{arg_num, check_argc, def, BuiltinSpec};

const V3D:   TypeKey = TypeKey::of("v3d");
const COLOR: TypeKey = TypeKey::of("color");
const M3D:   TypeKey = TypeKey::of("m3d");

pub fn builtins() -> Vec<BuiltinSpec> {
    vec![
        def("v3d create_vec( num x, num y, num z )",       create_vec),
        def("v3d vecx( num v )",                           vecx),
        def("v3d vecy( num v )",                           vecy),
        def("v3d vecz( num v )",                           vecz),
        def("color create_color( num r, num g, num b )",   create_color),
        def("color colr( num v )",                         colr),
        def("color colg( num v )",                         colg),
        def("color colb( num v )",                         colb),
        def("m3d rotx( num deg )",                         rotx),
        def("m3d roty( num deg )",                         roty),
        def("m3d rotz( num deg )",                         rotz),
    ]
}

// ─── Vectors ──────────────────────────────────────────────────────────────────

fn build_vec(ctx: &CallContext<'_>, fill: impl FnOnce(&mut V3d) -> Result<()>) -> Result<Value<'static>> {
    let mut ret = ctx.runtime.types().create(V3D)?;
    fill(ret.downcast_mut::<V3d>()?)?;
    Ok(ret)
}

fn create_vec(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 3)?;
    build_vec(ctx, |v| {
        v.x = arg_num(args, 0, frame)?;
        v.y = arg_num(args, 1, frame)?;
        v.z = arg_num(args, 2, frame)?;
        Ok(())
    })
}

fn vecx(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    build_vec(ctx, |v| { v.x = arg_num(args, 0, frame)?; Ok(()) })
}

fn vecy(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    build_vec(ctx, |v| { v.y = arg_num(args, 0, frame)?; Ok(()) })
}

fn vecz(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    build_vec(ctx, |v| { v.z = arg_num(args, 0, frame)?; Ok(()) })
}

// ─── Colors ───────────────────────────────────────────────────────────────────

fn build_color(ctx: &CallContext<'_>, fill: impl FnOnce(&mut Color) -> Result<()>) -> Result<Value<'static>> {
    let mut ret = ctx.runtime.types().create(COLOR)?;
    fill(ret.downcast_mut::<Color>()?)?;
    Ok(ret)
}

fn create_color(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 3)?;
    build_color(ctx, |c| {
        c.r = arg_num(args, 0, frame)?;
        c.g = arg_num(args, 1, frame)?;
        c.b = arg_num(args, 2, frame)?;
        Ok(())
    })
}

fn colr(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    build_color(ctx, |c| { c.r = arg_num(args, 0, frame)?; Ok(()) })
}

fn colg(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    build_color(ctx, |c| { c.g = arg_num(args, 0, frame)?; Ok(()) })
}

fn colb(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    build_color(ctx, |c| { c.b = arg_num(args, 0, frame)?; Ok(()) })
}

// ─── Rotations ────────────────────────────────────────────────────────────────

fn build_rot(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments, rot: fn(f64) -> M3d) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    let angle = arg_num(args, 0, frame)?.to_radians();
    let mut ret = ctx.runtime.types().create(M3D)?;
    *ret.downcast_mut::<M3d>()? = rot(angle);
    Ok(ret)
}

fn rotx(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    build_rot(ctx, frame, args, M3d::rot_x)
}

fn roty(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    build_rot(ctx, frame, args, M3d::rot_y)
}

fn rotz(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    build_rot(ctx, frame, args, M3d::rot_z)
}
