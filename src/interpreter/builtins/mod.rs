//! Built-in prototype objects and the global bootstrap

pub mod array;
pub mod boolean;
pub mod date;
pub mod function;
pub mod number;
pub mod object;
pub mod string;

pub use array::*;
pub use boolean::*;
pub use date::*;
pub use function::*;
pub use number::*;
pub use object::*;
pub use string::*;

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, ExoticObject, JsObjectRef, JsString, JsValue};

/// Wire every built-in prototype, the paired constructors, and the global
/// object. Called once from `Interpreter::new`.
pub fn init_runtime(interp: &mut Interpreter) {
    object::init_object_prototype(interp);
    function::init_function_prototype(interp);
    array::init_array_prototype(interp);
    string::init_string_prototype(interp);
    number::init_number_prototype(interp);
    boolean::init_boolean_prototype(interp);
    date::init_date_prototype(interp);

    let object_ctor = object::create_object_constructor(interp);
    let array_ctor = array::create_array_constructor(interp);
    let string_ctor = string::create_string_constructor(interp);
    let number_ctor = number::create_number_constructor(interp);
    let boolean_ctor = boolean::create_boolean_constructor(interp);
    let date_ctor = date::create_date_constructor(interp);

    let global = interp.global.cheap_clone();
    install(interp, &global, "Object", JsValue::Object(object_ctor));
    install(interp, &global, "Array", JsValue::Object(array_ctor));
    install(interp, &global, "String", JsValue::Object(string_ctor));
    install(interp, &global, "Number", JsValue::Object(number_ctor));
    install(interp, &global, "Boolean", JsValue::Object(boolean_ctor));
    install(interp, &global, "Date", JsValue::Object(date_ctor));

    install(interp, &global, "NaN", JsValue::Number(f64::NAN));
    install(interp, &global, "Infinity", JsValue::Number(f64::INFINITY));
    install(interp, &global, "undefined", JsValue::Undefined);

    register_global_functions(interp);
}

fn install(interp: &mut Interpreter, obj: &JsObjectRef, name: &str, value: JsValue) {
    let key = interp.key(name);
    obj.borrow_mut().insert_hidden(key, value);
}

/// Wire a constructor to its prototype: `ctor.prototype` and the
/// `prototype.constructor` back-link, both hidden.
pub(crate) fn link_constructor(
    interp: &mut Interpreter,
    ctor: &JsObjectRef,
    prototype: &JsObjectRef,
) {
    let proto_key = interp.key("prototype");
    ctor.borrow_mut()
        .insert_hidden(proto_key, JsValue::Object(prototype.cheap_clone()));
    let ctor_key = interp.key("constructor");
    prototype
        .borrow_mut()
        .insert_hidden(ctor_key, JsValue::Object(ctor.cheap_clone()));
}

/// Register global functions (parseInt, parseFloat, isNaN, isFinite,
/// escape, unescape)
fn register_global_functions(interp: &mut Interpreter) {
    let global = interp.global.cheap_clone();
    interp.register_method(&global, "parseInt", global_parse_int, 2);
    interp.register_method(&global, "parseFloat", global_parse_float, 1);
    interp.register_method(&global, "isNaN", global_is_nan, 1);
    interp.register_method(&global, "isFinite", global_is_finite, 1);
    interp.register_method(&global, "escape", global_escape, 1);
    interp.register_method(&global, "unescape", global_unescape, 1);
}

pub fn global_parse_int(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let string = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from(""),
    };
    let radix = args.get(1).map(|v| v.to_int32()).unwrap_or(10);

    let s = string.as_str().trim();
    if s.is_empty() {
        return Ok(JsValue::Number(f64::NAN));
    }

    let radix = if radix == 0 { 10 } else { radix };
    if !(2..=36).contains(&radix) {
        return Ok(JsValue::Number(f64::NAN));
    }

    let (negative, s) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    let s = if radix == 16 {
        s.strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s)
    } else {
        s
    };

    // Parse digits until the first invalid character
    let mut result: f64 = 0.0;
    let mut found_digit = false;
    for c in s.chars() {
        let digit = match c.to_digit(radix as u32) {
            Some(d) => d as f64,
            None => break,
        };
        found_digit = true;
        result = result * (radix as f64) + digit;
    }

    if !found_digit {
        return Ok(JsValue::Number(f64::NAN));
    }
    Ok(JsValue::Number(if negative { -result } else { result }))
}

pub fn global_parse_float(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let string = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from(""),
    };
    let s = string.as_str().trim();
    if s.is_empty() {
        return Ok(JsValue::Number(f64::NAN));
    }

    // Longest valid float prefix
    let mut num_str = String::new();
    let mut has_dot = false;
    let mut has_exp = false;
    let mut chars = s.chars().peekable();

    if matches!(chars.peek(), Some('-') | Some('+')) {
        if let Some(c) = chars.next() {
            num_str.push(c);
        }
    }
    while let Some(&c) = chars.peek() {
        match c {
            '0'..='9' => {
                num_str.push(c);
                chars.next();
            }
            '.' if !has_dot && !has_exp => {
                has_dot = true;
                num_str.push(c);
                chars.next();
            }
            'e' | 'E' if !has_exp => {
                has_exp = true;
                num_str.push(c);
                chars.next();
                if matches!(chars.peek(), Some('-') | Some('+')) {
                    if let Some(sign) = chars.next() {
                        num_str.push(sign);
                    }
                }
            }
            _ => break,
        }
    }
    match num_str.parse::<f64>() {
        Ok(n) => Ok(JsValue::Number(n)),
        Err(_) => Ok(JsValue::Number(f64::NAN)),
    }
}

// Global isNaN - converts its argument to number first
pub fn global_is_nan(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = match args.first() {
        Some(v) => interp.to_number_value(v)?,
        None => f64::NAN,
    };
    Ok(JsValue::Boolean(n.is_nan()))
}

// Global isFinite - converts its argument to number first
pub fn global_is_finite(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = match args.first() {
        Some(v) => interp.to_number_value(v)?,
        None => f64::NAN,
    };
    Ok(JsValue::Boolean(n.is_finite()))
}

// Characters the legacy escape() leaves as-is
const ESCAPE_UNESCAPED: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789@*_+-./";

pub fn global_escape(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from("undefined"),
    };
    let mut result = String::new();
    for unit in s.as_str().encode_utf16() {
        let c = char::from_u32(unit as u32);
        if c.map(|c| ESCAPE_UNESCAPED.contains(c)).unwrap_or(false) {
            if let Some(c) = c {
                result.push(c);
            }
        } else if unit < 256 {
            result.push_str(&format!("%{:02X}", unit));
        } else {
            result.push_str(&format!("%u{:04X}", unit));
        }
    }
    Ok(JsValue::from(result))
}

pub fn global_unescape(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from("undefined"),
    };
    let mut units: Vec<u16> = Vec::new();
    let source: Vec<char> = s.as_str().chars().collect();
    let mut i = 0;
    while i < source.len() {
        if source[i] == '%' {
            // %uXXXX form first, then %XX
            if i + 5 < source.len() && source[i + 1] == 'u' {
                let hex: String = source[i + 2..i + 6].iter().collect();
                if let Ok(unit) = u16::from_str_radix(&hex, 16) {
                    units.push(unit);
                    i += 6;
                    continue;
                }
            }
            if i + 2 < source.len() {
                let hex: String = source[i + 1..i + 3].iter().collect();
                if let Ok(unit) = u8::from_str_radix(&hex, 16) {
                    units.push(unit as u16);
                    i += 3;
                    continue;
                }
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(source[i].encode_utf16(&mut buf));
        i += 1;
    }
    Ok(JsValue::from(String::from_utf16_lossy(&units)))
}

// ═══════════════════════════════════════════════════════════════════════════
// Host value bridge (serde_json)
// ═══════════════════════════════════════════════════════════════════════════

/// Convert a JSON value into a script value.
pub fn json_to_js_value(
    interp: &mut Interpreter,
    json: &serde_json::Value,
) -> Result<JsValue, JsError> {
    match json {
        serde_json::Value::Null => Ok(JsValue::Null),
        serde_json::Value::Bool(b) => Ok(JsValue::Boolean(*b)),
        serde_json::Value::Number(n) => Ok(JsValue::Number(n.as_f64().unwrap_or(f64::NAN))),
        serde_json::Value::String(s) => Ok(JsValue::String(JsString::from(s.as_str()))),
        serde_json::Value::Array(items) => {
            let elements = items
                .iter()
                .map(|item| json_to_js_value(interp, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(JsValue::Object(interp.create_array_from(elements)))
        }
        serde_json::Value::Object(map) => {
            let obj = interp.create_object();
            for (k, v) in map {
                let value = json_to_js_value(interp, v)?;
                let key = interp.key(k);
                obj.borrow_mut().set_property(key, value)?;
            }
            Ok(JsValue::Object(obj))
        }
    }
}

/// Convert a script value to JSON. Undefined maps to null; object graphs are
/// followed to a fixed depth so that cyclic graphs fail instead of hanging.
pub fn js_value_to_json(value: &JsValue) -> Result<serde_json::Value, JsError> {
    js_value_to_json_depth(value, 0)
}

const MAX_JSON_DEPTH: usize = 64;

fn js_value_to_json_depth(value: &JsValue, depth: usize) -> Result<serde_json::Value, JsError> {
    if depth > MAX_JSON_DEPTH {
        return Err(JsError::type_error("value graph too deep to serialize"));
    }
    match value {
        JsValue::Undefined | JsValue::Null => Ok(serde_json::Value::Null),
        JsValue::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        JsValue::Number(n) => {
            // Integral doubles serialize as JSON integers so that bridged
            // values round-trip structurally
            if n.is_finite() && n.trunc() == *n && n.abs() <= i64::MAX as f64 {
                return Ok(serde_json::Value::Number(serde_json::Number::from(
                    *n as i64,
                )));
            }
            Ok(serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null))
        }
        JsValue::String(s) => Ok(serde_json::Value::String(s.as_str().to_string())),
        JsValue::Object(obj) => {
            let b = obj.borrow();
            if let ExoticObject::Array { elements } = &b.exotic {
                let items = elements
                    .iter()
                    .map(|slot| match slot {
                        Some(v) => js_value_to_json_depth(v, depth + 1),
                        None => Ok(serde_json::Value::Null),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(serde_json::Value::Array(items));
            }
            let mut map = serde_json::Map::new();
            for (key, prop) in &b.properties {
                if prop.hidden {
                    continue;
                }
                map.insert(
                    key.to_string(),
                    js_value_to_json_depth(&prop.value, depth + 1)?,
                );
            }
            Ok(serde_json::Value::Object(map))
        }
    }
}

/// ToObject: wrap a primitive as an object of the matching kind.
pub fn to_object(interp: &mut Interpreter, value: &JsValue) -> JsObjectRef {
    match value {
        JsValue::Object(obj) => obj.cheap_clone(),
        JsValue::String(s) => interp.create_string_object(s.cheap_clone()),
        JsValue::Number(n) => interp.create_number_object(*n),
        JsValue::Boolean(b) => interp.create_boolean_object(*b),
        JsValue::Undefined | JsValue::Null => interp.create_object(),
    }
}
