// Text form of JSON values as Python's str() prints them once loaded with the
// json module: True/False/None, `[1, 2]`, `{'a': 'b'}`, floats in repr form
// and integers with every digit kept.
//
// Integers depend on serde_json keeping the number text (arbitrary_precision)
// and objects on the key order of the file (preserve_order).

use serde_json::{Map, Number, Value};

pub fn to_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => repr(other),
    }
}

pub fn repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => number(n),
        Value::String(s) => string(s),
        Value::Array(a) => format!(
            "[{}]",
            a.iter().map(repr).collect::<Vec<String>>().join(", ")
        ),
        Value::Object(o) => object(o),
    }
}

fn object(map: &Map<String, Value>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(key, value)| format!("{}: {}", string(key), repr(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn is_integer_text(text: &str) -> bool {
    !text.contains(&['.', 'e', 'E'][..])
}

fn number(n: &Number) -> String {
    let text = n.to_string();
    if is_integer_text(&text) {
        // Python has no negative zero integer.
        return if text == "-0" { "0".to_string() } else { text };
    }
    match text.parse::<f64>() {
        Ok(f) => float(f),
        Err(_) => text,
    }
}

// Python switches to the exponent notation outside [1e-4, 1e16).
fn float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:e}", f);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if f == 0.0 || (-4..16).contains(&exponent) {
        let fixed = format!("{}", f);
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.0", fixed)
        }
    } else {
        format!(
            "{}e{}{:02}",
            mantissa,
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    }
}

// Single quotes unless the text has a single quote and no double one.
fn string(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut r = String::with_capacity(s.len() + 2);
    r.push(quote);
    for c in s.chars() {
        match c {
            '\\' => r.push_str("\\\\"),
            '\n' => r.push_str("\\n"),
            '\r' => r.push_str("\\r"),
            '\t' => r.push_str("\\t"),
            c if c == quote => {
                r.push('\\');
                r.push(c);
            }
            c if (c as u32) < 0x20 || (0x7f..0xa0).contains(&(c as u32)) => {
                r.push_str(&format!("\\x{:02x}", c as u32))
            }
            c => r.push(c),
        }
    }
    r.push(quote);
    r
}
