//! Scalar math. Every builtin returns an owned `f64`; trigonometry takes radians
//! unless the name ends in `_d`.

use crate::error::Result;
use crate::runtime::dispatch::CallContext;
use crate::runtime::frame::{Arguments, Frame};
use crate::runtime::value::Value;
use super::{arg_num, check_argc, def, BuiltinSpec};

pub fn builtins() -> Vec<BuiltinSpec> {
    vec![
        def("f64 sqrt( num val )",                 sqrt),
        def("f64 sqr( num val )",                  sqr),
        def("f64 exp( num val )",                  exp),
        def("f64 log( num val )",                  log),
        def("f64 to_deg( num rad )",               to_deg),
        def("f64 to_rad( num deg )",               to_rad),
        def("f64 sin( num val )",                  sin),
        def("f64 cos( num val )",                  cos),
        def("f64 tan( num val )",                  tan),
        def("f64 sin_d( num deg )",                sin_d),
        def("f64 cos_d( num deg )",                cos_d),
        def("f64 tan_d( num deg )",                tan_d),
        def("f64 asin( num val )",                 asin),
        def("f64 acos( num val )",                 acos),
        def("f64 atan( num val )",                 atan),
        def("f64 pow( num base, num exp )",        pow),
        def("f64 ceiling( num val )",              ceiling),
        def("f64 floor( num val )",                floor),
    ]
}

/// Shared body of every one-argument builtin.
fn unary(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments, op: fn(f64) -> f64) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    Ok(Value::num(op(arg_num(args, 0, frame)?)))
}

macro_rules! unary_builtins {
    ($($name:ident => $op:expr;)*) => {
        $(
            fn $name(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
                unary(ctx, frame, args, $op)
            }
        )*
    };
}

// ─── One argument ─────────────────────────────────────────────────────────────

unary_builtins! {
    sqrt    => f64::sqrt;
    sqr     => |x| x * x;
    exp     => f64::exp;
    log     => f64::ln;
    to_deg  => f64::to_degrees;
    to_rad  => f64::to_radians;
    sin     => f64::sin;
    cos     => f64::cos;
    tan     => f64::tan;
    sin_d   => |x| x.to_radians().sin();
    cos_d   => |x| x.to_radians().cos();
    tan_d   => |x| x.to_radians().tan();
    asin    => f64::asin;
    acos    => f64::acos;
    atan    => f64::atan;
    ceiling => f64::ceil;
    floor   => f64::floor;
}

// ─── Two arguments ────────────────────────────────────────────────────────────

fn pow(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 2)?;
    let base = arg_num(args, 0, frame)?;
    let exp = arg_num(args, 1, frame)?;
    Ok(Value::num(base.powf(exp)))
}

#[cfg(test)]
mod tests {
    use crate::runtime::frame::EvalFrame;
    use crate::Runtime;

    fn call1(name: &str, x: f64) -> f64 {
        let rt = Runtime::standard().unwrap();
        let mut frame = EvalFrame::new();
        frame.push_value(x);
        let args = frame.arguments();
        rt.dispatch(name, &frame, &args).unwrap().to_number().unwrap()
    }

    #[test]
    fn degree_variants_match_radian_ones() {
        assert!((call1("sin_d", 30.0) - 0.5).abs() < 1e-12);
        assert!((call1("cos_d", 60.0) - 0.5).abs() < 1e-12);
        assert!((call1("tan_d", 45.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rounding_and_squares() {
        assert_eq!(call1("ceiling", 1.2), 2.0);
        assert_eq!(call1("floor", -1.2), -2.0);
        assert_eq!(call1("sqr", -3.0), 9.0);
        assert_eq!(call1("sqrt", 16.0), 4.0);
    }

    #[test]
    fn log_is_natural() {
        assert!((call1("log", std::f64::consts::E) - 1.0).abs() < 1e-12);
        assert_eq!(call1("exp", 0.0), 1.0);
    }

    #[test]
    fn pow_takes_two() {
        let rt = Runtime::standard().unwrap();
        let mut frame = EvalFrame::new();
        frame.push_value(2.0f64);
        frame.push_value(10.0f64);
        let args = frame.arguments();
        assert_eq!(rt.dispatch("pow", &frame, &args).unwrap().to_number().unwrap(), 1024.0);
    }
}
