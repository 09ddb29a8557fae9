//! String built-in methods

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, ExoticObject, JsObjectRef, JsString, JsValue};

use super::link_constructor;

pub fn init_string_prototype(interp: &mut Interpreter) {
    let proto = interp.string_prototype.cheap_clone();
    interp.register_method(&proto, "toString", string_to_string, 0);
    interp.register_method(&proto, "valueOf", string_value_of, 0);
    interp.register_method(&proto, "charAt", string_char_at, 1);
    interp.register_method(&proto, "charCodeAt", string_char_code_at, 1);
    interp.register_method(&proto, "indexOf", string_index_of, 2);
    interp.register_method(&proto, "lastIndexOf", string_last_index_of, 2);
    interp.register_method(&proto, "substring", string_substring, 2);
    interp.register_method(&proto, "toLowerCase", string_to_lower_case, 0);
    interp.register_method(&proto, "toUpperCase", string_to_upper_case, 0);
    interp.register_method(&proto, "split", string_split, 1);
}

/// Create the String constructor: a coercion when called, a boxing
/// constructor with `new`.
pub fn create_string_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor = interp.create_native_constructor("String", string_call, string_construct, 1);
    interp.register_method(&ctor, "fromCharCode", string_from_char_code, 1);
    let proto = interp.string_prototype.cheap_clone();
    link_constructor(interp, &ctor, &proto);
    ctor
}

pub fn string_call(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from(""),
    };
    Ok(JsValue::String(s))
}

pub fn string_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from(""),
    };
    Ok(JsValue::Object(interp.create_string_object(s)))
}

pub fn string_from_char_code(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let mut units = Vec::with_capacity(args.len());
    for arg in args {
        units.push(interp.to_number_value(arg)? as u16);
    }
    Ok(JsValue::from(String::from_utf16_lossy(&units)))
}

/// The boxed value, for toString/valueOf which require a string receiver.
fn this_string_value(this: &JsValue, method: &str) -> Result<JsString, JsError> {
    match this {
        JsValue::String(s) => Ok(s.cheap_clone()),
        JsValue::Object(obj) => match &obj.borrow().exotic {
            ExoticObject::StringWrapper(s) => Ok(s.cheap_clone()),
            _ => Err(JsError::type_error(format!(
                "String.prototype.{} called on non-string",
                method
            ))),
        },
        _ => Err(JsError::type_error(format!(
            "String.prototype.{} called on non-string",
            method
        ))),
    }
}

/// Generic receiver coercion for the remaining methods, which tolerate any
/// `this`.
fn this_to_string(interp: &mut Interpreter, this: &JsValue) -> Result<JsString, JsError> {
    match this {
        JsValue::String(s) => Ok(s.cheap_clone()),
        JsValue::Object(obj) => {
            if let ExoticObject::StringWrapper(s) = &obj.borrow().exotic {
                return Ok(s.cheap_clone());
            }
            interp.to_string_value(this)
        }
        _ => Ok(this.to_js_string()),
    }
}

pub fn string_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(this_string_value(&this, "toString")?))
}

pub fn string_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::String(this_string_value(&this, "valueOf")?))
}

pub fn string_char_at(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;
    let pos = args.first().map(|v| v.to_integer()).unwrap_or(0.0);
    let units: Vec<u16> = s.as_str().encode_utf16().collect();
    if pos < 0.0 || pos >= units.len() as f64 {
        return Ok(JsValue::from(""));
    }
    Ok(JsValue::from(String::from_utf16_lossy(
        &units[pos as usize..pos as usize + 1],
    )))
}

pub fn string_char_code_at(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;
    let pos = args.first().map(|v| v.to_integer()).unwrap_or(0.0);
    let units: Vec<u16> = s.as_str().encode_utf16().collect();
    if pos < 0.0 || pos >= units.len() as f64 {
        return Ok(JsValue::Number(f64::NAN));
    }
    Ok(JsValue::Number(units[pos as usize] as f64))
}

pub fn string_index_of(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;
    let search = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from("undefined"),
    };
    let from = args.get(1).map(|v| v.to_integer()).unwrap_or(0.0).max(0.0);

    let units: Vec<u16> = s.as_str().encode_utf16().collect();
    let needle: Vec<u16> = search.as_str().encode_utf16().collect();
    let start = (from as usize).min(units.len());

    Ok(JsValue::Number(
        find_units(&units, &needle, start)
            .map(|i| i as f64)
            .unwrap_or(-1.0),
    ))
}

pub fn string_last_index_of(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;
    let search = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from("undefined"),
    };

    let units: Vec<u16> = s.as_str().encode_utf16().collect();
    let needle: Vec<u16> = search.as_str().encode_utf16().collect();

    let from = args.get(1).map(|v| v.to_integer()).unwrap_or(f64::NAN);
    let end = if from.is_nan() {
        units.len()
    } else {
        (from.max(0.0) as usize).min(units.len())
    };

    let mut best: Option<usize> = None;
    let mut start = 0;
    while let Some(i) = find_units(&units, &needle, start) {
        if i > end {
            break;
        }
        best = Some(i);
        start = i + 1;
    }
    Ok(JsValue::Number(best.map(|i| i as f64).unwrap_or(-1.0)))
}

fn find_units(haystack: &[u16], needle: &[u16], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len().saturating_sub(needle.len()))
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}

pub fn string_substring(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;
    let units: Vec<u16> = s.as_str().encode_utf16().collect();
    let len = units.len() as f64;

    let a = args.first().map(|v| v.to_integer()).unwrap_or(0.0);
    let b = match args.get(1) {
        None | Some(JsValue::Undefined) => len,
        Some(v) => v.to_integer(),
    };
    let a = a.max(0.0).min(len) as usize;
    let b = b.max(0.0).min(len) as usize;
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    Ok(JsValue::from(String::from_utf16_lossy(&units[lo..hi])))
}

pub fn string_to_lower_case(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;
    Ok(JsValue::from(s.as_str().to_lowercase()))
}

pub fn string_to_upper_case(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;
    Ok(JsValue::from(s.as_str().to_uppercase()))
}

/// split(separator): no separator yields a single-element array; an empty
/// separator splits between every code unit.
pub fn string_split(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = this_to_string(interp, &this)?;

    let parts: Vec<JsValue> = match args.first() {
        None | Some(JsValue::Undefined) => vec![JsValue::String(s)],
        Some(v) => {
            let sep = interp.to_string_value(v)?;
            if sep.is_empty() {
                s.as_str()
                    .chars()
                    .map(|c| JsValue::from(c.to_string()))
                    .collect()
            } else {
                s.as_str()
                    .split(sep.as_str())
                    .map(JsValue::from)
                    .collect()
            }
        }
    };
    Ok(JsValue::Object(interp.create_array_from(parts)))
}
