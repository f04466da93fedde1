//! String construction and number parsing.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Result, RuntimeError};
use crate::runtime::dispatch::CallContext;
use crate::runtime::frame::{Arguments, Frame};
use crate::runtime::value::Value;
use super::{arg_text, check_argc, def, BuiltinSpec};

pub fn builtins() -> Vec<BuiltinSpec> {
    vec![
        def("string create_string_fa( string format, root arg )",   create_string_fa),
        def("string_to_num( string text )",                         string_to_num),
    ]
}

// ─── Builtins ─────────────────────────────────────────────────────────────────

fn create_string_fa(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 2)?;
    let format = arg_text(args, 0, frame)?;
    let arg = args.get(1, frame)?;
    let out = format_one(&format, &arg)?;
    arg.release();
    Ok(Value::text(out))
}

/// `f64` when the numeric span contains `.`, `e` or `E`, otherwise `i64`.
fn string_to_num(ctx: &CallContext<'_>, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>> {
    check_argc(ctx, args, 1)?;
    let text = arg_text(args, 0, frame)?;
    let s = text.trim_start_matches([' ', '\t', '\n']);
    let end = s.find(|c: char| !"+-0123456789eE.".contains(c)).unwrap_or(s.len());
    let span = &s[..end];

    let bad = |what: &str| RuntimeError::invalid_argument("string_to_num", format!("{what} in {text:?}"));
    if span.is_empty() {
        return Err(bad("no number"));
    }
    if span.contains(['.', 'e', 'E']) {
        span.parse::<f64>().map(Value::num).map_err(|_| bad("malformed float"))
    } else {
        span.parse::<i64>().map(Value::int).map_err(|_| bad("malformed integer"))
    }
}

// ─── Formatting ───────────────────────────────────────────────────────────────

/// One `%` directive: `%[flags][width][.precision]conv`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Directive {
    left:      bool,
    zero:      bool,
    plus:      bool,
    space:     bool,
    width:     usize,
    precision: Option<usize>,
    conv:      char,
}

fn format_err(message: impl Into<String>) -> RuntimeError {
    RuntimeError::invalid_argument("create_string_fa", message)
}

/// printf with a single argument. Supports `%s %g %f %e %d %i` and `%%`.
fn format_one(format: &str, arg: &Value<'_>) -> Result<String> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut consumed = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let d = parse_directive(&mut chars)?;
        if consumed {
            return Err(format_err("format has more than one conversion"));
        }
        consumed = true;
        out.push_str(&render(&d, arg)?);
    }
    Ok(out)
}

fn parse_directive(chars: &mut Peekable<Chars<'_>>) -> Result<Directive> {
    let mut d = Directive::default();
    while let Some(&c) = chars.peek() {
        match c {
            '-' => d.left = true,
            '0' => d.zero = true,
            '+' => d.plus = true,
            ' ' => d.space = true,
            _ => break,
        }
        chars.next();
    }
    d.width = digits(chars).unwrap_or(0);
    if chars.peek() == Some(&'.') {
        chars.next();
        d.precision = Some(digits(chars).unwrap_or(0));
    }
    d.conv = match chars.next() {
        Some(c @ ('s' | 'g' | 'f' | 'e' | 'd' | 'i')) => c,
        Some(c) => return Err(format_err(format!("unsupported conversion `%{c}`"))),
        None    => return Err(format_err("format ends inside a conversion")),
    };
    Ok(d)
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(v) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(v as usize));
        chars.next();
    }
    n
}

fn render(d: &Directive, arg: &Value<'_>) -> Result<String> {
    let body = match d.conv {
        's' => {
            let s = arg.to_text()?;
            let s = match d.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s,
            };
            return Ok(pad(d, s, false));
        }
        'd' | 'i' => format!("{}", arg.to_number()?.trunc() as i64),
        'f' => fixed(arg.to_number()?, d.precision.unwrap_or(6)),
        'e' => scientific(arg.to_number()?, d.precision.unwrap_or(6)),
        _   => general(arg.to_number()?, d.precision.unwrap_or(6)),
    };
    let body = if body.starts_with('-') {
        body
    } else if d.plus {
        format!("+{body}")
    } else if d.space {
        format!(" {body}")
    } else {
        body
    };
    Ok(pad(d, body, true))
}

fn pad(d: &Directive, body: String, numeric: bool) -> String {
    let len = body.chars().count();
    if len >= d.width {
        return body;
    }
    let fill = d.width - len;
    if d.left {
        format!("{body}{}", " ".repeat(fill))
    } else if d.zero && numeric && !body.ends_with(|c: char| c.is_alphabetic()) {
        let sign_len = usize::from(body.starts_with(['+', '-', ' ']));
        format!("{}{}{}", &body[..sign_len], "0".repeat(fill), &body[sign_len..])
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}

fn non_finite(v: f64) -> Option<String> {
    if v.is_nan() {
        Some("nan".into())
    } else if v.is_infinite() {
        Some(if v < 0.0 { "-inf".into() } else { "inf".into() })
    } else {
        None
    }
}

fn fixed(v: f64, precision: usize) -> String {
    non_finite(v).unwrap_or_else(|| format!("{v:.precision$}"))
}

/// `d.ddde±XX` with at least two exponent digits.
fn scientific(v: f64, precision: usize) -> String {
    if let Some(s) = non_finite(v) {
        return s;
    }
    let s = format!("{v:.precision$e}");
    let (mantissa, exp) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

/// `%g`: scientific when the exponent is below -4 or at least the precision,
/// fixed otherwise; trailing zeros removed.
fn general(v: f64, precision: usize) -> String {
    if let Some(s) = non_finite(v) {
        return s;
    }
    let p = precision.max(1);
    if v == 0.0 {
        return if v.is_sign_negative() { "-0".into() } else { "0".into() };
    }
    let probe = format!("{v:.prec$e}", prec = p - 1);
    let exp: i32 = probe.split_once('e').and_then(|(_, e)| e.parse().ok()).unwrap_or(0);

    if exp < -4 || exp >= p as i32 {
        let s = scientific(v, p - 1);
        s.split_once('e')
            .map(|(m, e)| format!("{}e{e}", strip_zeros(m)))
            .unwrap_or_else(|| s.clone())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{v:.decimals$}")).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
