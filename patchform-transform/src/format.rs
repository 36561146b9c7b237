//! printf-style formatting over document values.
//!
//! Supported verbs: `%s %v %d %f %t %q %x %X %%`, with the flags `-+ 0#`,
//! a width and a precision. A verb with no operand left renders as
//! `%!v(MISSING)`, an operand of the wrong type as `%!d(string=abc)`, and
//! unused operands are appended as `%!(EXTRA type=value, ...)`. Widths and
//! precisions above 1e6 render `%!(BADWIDTH)` / `%!(BADPREC)` and are
//! ignored.

use crate::value::{as_int, kind_name, render};
use serde_json::Value;
use std::iter::Peekable;
use std::str::Chars;

/// Largest width or precision honoured.
const MAX_WIDTH: usize = 1_000_000;

#[derive(Debug, Default)]
struct Spec {
    minus: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

pub fn sprintf(fmt: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(fmt.len());
    let mut chars = fmt.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                '#' => {}
                _ => break,
            }
            chars.next();
        }
        spec.width = digits(&mut chars);
        if spec.width.is_some_and(|w| w > MAX_WIDTH) {
            out.push_str("%!(BADWIDTH)");
            spec.width = None;
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = digits(&mut chars).unwrap_or(0);
            if precision > MAX_WIDTH {
                out.push_str("%!(BADPREC)");
            } else {
                spec.precision = Some(precision);
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                out.push_str(&format_one(verb, &spec, arg));
            }
            None => {
                out.push_str("%!");
                out.push(verb);
                out.push_str("(MISSING)");
            }
        }
    }

    if next_arg < args.len() {
        let extra: Vec<String> = args[next_arg..]
            .iter()
            .map(|a| format!("{}={}", kind_name(a), render(a)))
            .collect();
        out.push_str("%!(EXTRA ");
        out.push_str(&extra.join(", "));
        out.push(')');
    }
    out
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    n
}

fn format_one(verb: char, spec: &Spec, arg: &Value) -> String {
    let int = match arg {
        Value::Number(n) => as_int(n),
        _ => None,
    };
    let float = match arg {
        Value::Number(n) if int.is_none() => n.as_f64(),
        _ => None,
    };

    match (verb, arg, int, float) {
        ('s' | 'v', _, _, _) => {
            let mut text = render(arg);
            if let (Some(p), Value::String(_)) = (spec.precision, arg) {
                text = text.chars().take(p).collect();
            }
            pad(text, spec, false)
        }
        ('d', _, Some(i), _) => pad(signed(i.to_string(), i < 0, spec), spec, true),
        ('f', _, _, Some(f)) => {
            let body = format!("{:.*}", spec.precision.unwrap_or(6), f);
            pad(signed(body, f.is_sign_negative(), spec), spec, true)
        }
        ('t', Value::Bool(b), _, _) => pad(b.to_string(), spec, false),
        ('q', Value::String(_), _, _) => pad(arg.to_string(), spec, false),
        ('x' | 'X', Value::String(s), _, _) => {
            let h = hex::encode(s.as_bytes());
            pad(case(h, verb), spec, false)
        }
        ('x' | 'X', _, Some(i), _) => {
            let h = if i < 0 {
                format!("-{:x}", i.unsigned_abs())
            } else {
                format!("{i:x}")
            };
            pad(case(h, verb), spec, true)
        }
        _ => format!("%!{verb}({}={})", kind_name(arg), render(arg)),
    }
}

fn case(hex: String, verb: char) -> String {
    if verb == 'X' { hex.to_uppercase() } else { hex }
}

fn signed(body: String, negative: bool, spec: &Spec) -> String {
    if negative {
        body
    } else if spec.plus {
        format!("+{body}")
    } else if spec.space {
        format!(" {body}")
    } else {
        body
    }
}

fn pad(body: String, spec: &Spec, numeric: bool) -> String {
    let Some(width) = spec.width else {
        return body;
    };
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;
    if spec.minus {
        format!("{body}{}", " ".repeat(fill))
    } else if spec.zero && numeric {
        let sign_len = if body.starts_with(['-', '+', ' ']) { 1 } else { 0 };
        let (sign, rest) = body.split_at(sign_len);
        format!("{sign}{}{rest}", "0".repeat(fill))
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}
