//! Standard builtins, grouped by concern. Each group exports a table of
//! `(signature, entry)` pairs; `register_builtins` installs the groups in a fixed order.

use crate::error::{Result, RuntimeError};
use crate::runtime::dispatch::{Builtin, BuiltinFn, CallContext};
use crate::runtime::frame::{Arguments, Frame};
use crate::types::arrays::{ColorImage, ColorRow};
use crate::types::entity::Entity;
use crate::types::registry::TypeRegistry;
use crate::types::shapes::{Plane, Sphere, Squaroid, Torus};
use crate::types::vectors::{Color, M3d, Ray, RayCone, V2d, V3d, color_copy_typed, v3d_copy_typed};
use crate::Runtime;

pub mod vectors;
pub mod strings;
pub mod math;
pub mod files;
pub mod objects;
pub mod images;
pub mod time;

pub type BuiltinSpec = (&'static str, BuiltinFn);

fn def(signature: &'static str, entry: BuiltinFn) -> BuiltinSpec { (signature, entry) }

// ─── Registration ─────────────────────────────────────────────────────────────

/// Primitives, flat entities (nested ones after the types they embed), arrays, shapes.
pub(crate) fn register_types(r: &mut TypeRegistry) -> Result<()> {
    r.register_opaque::<f64>("f64")?;
    r.register_opaque::<i64>("i64")?;
    r.register_opaque::<bool>("bool")?;
    r.register_opaque::<String>("string")?;

    r.register_entity::<V2d>()?;
    let v3d = r.register_entity::<V3d>()?;
    r.register_entity::<M3d>()?;
    r.register_entity::<Ray>()?;
    r.register_entity::<RayCone>()?;
    let color = r.register_entity::<Color>()?;
    r.set_copy_typed(v3d, v3d_copy_typed)?;
    r.set_copy_typed(color, color_copy_typed)?;

    r.register_opaque::<ColorRow>("color_row")?;
    r.register_opaque::<ColorImage>("color_image")?;

    r.register_opaque::<Plane>("plane")?;
    r.register_opaque::<Sphere>("sphere")?;
    r.register_opaque::<Squaroid>("squaroid")?;
    r.register_opaque::<Torus>("torus")?;
    Ok(())
}

pub(crate) fn register_builtins(rt: &mut Runtime) -> Result<()> {
    let groups: [Vec<BuiltinSpec>; 7] = [
        vectors::builtins(),
        strings::builtins(),
        math::builtins(),
        files::builtins(),
        objects::builtins(),
        images::builtins(),
        time::builtins(),
    ];
    for (signature, entry) in groups.into_iter().flatten() {
        rt.register_builtin(Builtin::new(signature, entry)?)?;
    }
    Ok(())
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

pub(crate) fn check_argc(ctx: &CallContext<'_>, args: &Arguments, n: usize) -> Result<()> {
    if args.size() != n {
        Err(RuntimeError::Arity { name: ctx.builtin.name.clone(), expected: n, got: args.size() })
    } else {
        Ok(())
    }
}

/// Evaluate argument `i` as a number and release it.
pub(crate) fn arg_num(args: &Arguments, i: usize, frame: &dyn Frame) -> Result<f64> {
    let v = args.get(i, frame)?;
    let n = v.to_number()?;
    v.release();
    Ok(n)
}

/// Evaluate argument `i` as a string and release it.
pub(crate) fn arg_text(args: &Arguments, i: usize, frame: &dyn Frame) -> Result<String> {
    let v = args.get(i, frame)?;
    let s = v.to_text()?;
    v.release();
    Ok(s)
}

/// Evaluate argument `i`, copy out a `T`, and release the argument.
pub(crate) fn arg_as<T: Entity + Clone>(args: &Arguments, i: usize, frame: &dyn Frame) -> Result<T> {
    let v = args.get(i, frame)?;
    let out = v.downcast_ref::<T>()?.clone();
    v.release();
    Ok(out)
}
