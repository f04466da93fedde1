//! Scene object constructors. Every builtin returns a fresh owned shape, constructed
//! through the type registry and then filled in from its arguments.

use crate::error::Result;
use crate::runtime::dispatch::CallContext;
use crate::runtime::frame::{Arguments, Frame};
use crate::runtime::value::Value;
use crate::types::entity::Entity;
use crate::types::key::TypeKey;
use crate::types::shapes::{Plane, Sphere, Squaroid, Torus};
use super::{arg_num, arg_text, check_argc, def, BuiltinSpec};

const PLANE:    TypeKey = TypeKey::of("plane");
const SPHERE:   TypeKey = TypeKey::of("sphere");
const SQUAROID: TypeKey = TypeKey::of("squaroid");
const TORUS:    TypeKey = TypeKey::of("torus");

pub fn builtins() -> Vec<BuiltinSpec> {
    vec![
        def("root create_object( string name )",                                      create_object),
        def("plane create_plane()",                                                   create_plane),
        def("sphere create_sphere( num radius )",                                     create_sphere),
        def("squaroid create_squaroid( num a, num b, num c, num r )",                 create_squaroid),
        def("squaroid create_cylinder( num radius_x, num radius_y )",                 create_cylinder),
        def("torus create_torus( num radius1, num radius2 )",                         create_torus),
        def("squaroid create_hyperboloid1( num radius_x, num radius_y, num radius_z )", create_hyperboloid1),
        def("squaroid create_hyperboloid2( num radius_x, num radius_y, num radius_z )", create_hyperboloid2),
        def("squaroid create_ellipsoid( num radius_x, num radius_y, num radius_z )",  create_ellipsoid),
        def("squaroid create_cone( num radius_x, num radius_y, num radius_z )",       create_cone),
    ]
}

fn build<T: Entity>(ctx: &CallContext<'_>, key: TypeKey, fill: impl FnOnce(&mut T) -> Result<()>) -> Result<Value<'static>> {
    let mut ret = ctx.runtime.types().create(key)?;
    fill(ret.downcast_mut::<T>()?)?;
    Ok(ret)
}

/// Default instance of any registered type, looked up by name.
fn create_object(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    let name = arg_text(args, 0, frame)?;
    ctx.runtime.types().create_by_name(&name)
}

fn create_plane(ctx: &CallContext<'_>, _frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 0)?;
    build(ctx, PLANE, |_: &mut Plane| Ok(()))
}

fn create_sphere(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    let radius = arg_num(args, 0, frame)?;
    build(ctx, SPHERE, |s: &mut Sphere| { s.set_radius(radius); Ok(()) })
}

fn create_squaroid(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 4)?;
    let a = arg_num(args, 0, frame)?;
    let b = arg_num(args, 1, frame)?;
    let c = arg_num(args, 2, frame)?;
    let r = arg_num(args, 3, frame)?;
    build(ctx, SQUAROID, |s: &mut Squaroid| {
        (s.a, s.b, s.c, s.r) = (a, b, c, r);
        Ok(())
    })
}

fn create_cylinder(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 2)?;
    let rx = arg_num(args, 0, frame)?;
    let ry = arg_num(args, 1, frame)?;
    let shape = Squaroid::cylinder(rx, ry)?;
    build(ctx, SQUAROID, |s: &mut Squaroid| { *s = shape; Ok(()) })
}

fn create_torus(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 2)?;
    let r1 = arg_num(args, 0, frame)?;
    let r2 = arg_num(args, 1, frame)?;
    let shape = Torus::with_radii(r1, r2, ctx.runtime.config().envelope_margin)?;
    build(ctx, TORUS, |t: &mut Torus| { *t = shape; Ok(()) })
}

// ─── Three-radius quadrics ────────────────────────────────────────────────────

fn quadric(
    ctx: &CallContext<'_>,
    frame: &dyn Frame,
    args: &Arguments,
    make: fn(f64, f64, f64) -> Result<Squaroid>,
) -> Result<Value<'static>> {
    check_argc(ctx, args, 3)?;
    let rx = arg_num(args, 0, frame)?;
    let ry = arg_num(args, 1, frame)?;
    let rz = arg_num(args, 2, frame)?;
    let shape = make(rx, ry, rz)?;
    build(ctx, SQUAROID, |s: &mut Squaroid| { *s = shape; Ok(()) })
}

fn create_hyperboloid1(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    quadric(ctx, frame, args, Squaroid::hyperboloid1)
}

fn create_hyperboloid2(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    quadric(ctx, frame, args, Squaroid::hyperboloid2)
}

fn create_ellipsoid(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    quadric(ctx, frame, args, Squaroid::ellipsoid)
}

fn create_cone(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    quadric(ctx, frame, args, Squaroid::cone)
}

#[cfg(test)]
mod tests {
    use crate::runtime::frame::EvalFrame;
    use crate::{ErrorCode, Runtime, RuntimeConfig};

    /// Builtins installed over an empty type registry.
    fn bare_runtime() -> Runtime {
        let mut rt = Runtime::new(RuntimeConfig::default());
        crate::namespaces::register_builtins(&mut rt).unwrap();
        rt
    }

    #[test]
    fn shapes_come_from_the_registry() {
        let rt = bare_runtime();
        let mut frame = EvalFrame::new();
        frame.push_value(2.0);
        let one = frame.arguments();
        let none = EvalFrame::new();

        let err = rt.dispatch("create_sphere", &frame, &one).unwrap_err();
        assert_eq!(err.code(), ErrorCode::T004);
        let err = rt.dispatch("create_plane", &none, &none.arguments()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::T004);

        let mut named = EvalFrame::new();
        named.push_value("sphere".to_string());
        let err = rt.dispatch("create_object", &named, &named.arguments()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::T001);
    }

    #[test]
    fn registered_shapes_are_filled_in() {
        let rt = Runtime::standard().unwrap();
        let mut frame = EvalFrame::new();
        frame.push_value(2.0);
        let v = rt.dispatch("create_sphere", &frame, &frame.arguments()).unwrap();
        assert_eq!(v.type_name(), "sphere");
        assert_eq!(v.downcast_ref::<super::Sphere>().unwrap().radius, 2.0);
    }
}
