//! Number built-in methods

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{format_number, CheapClone, ExoticObject, JsObjectRef, JsValue};

use super::link_constructor;

pub fn init_number_prototype(interp: &mut Interpreter) {
    let proto = interp.number_prototype.cheap_clone();
    interp.register_method(&proto, "toString", number_to_string, 1);
    interp.register_method(&proto, "valueOf", number_value_of, 0);
}

/// Create the Number constructor with its numeric-limit constants.
pub fn create_number_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor = interp.create_native_constructor("Number", number_call, number_construct, 1);
    {
        let mut c = ctor.borrow_mut();
        let key = interp.string_dict.get_or_insert("MAX_VALUE");
        c.insert_hidden(key.into(), JsValue::Number(f64::MAX));
        let key = interp.string_dict.get_or_insert("MIN_VALUE");
        c.insert_hidden(key.into(), JsValue::Number(f64::MIN_POSITIVE));
        let key = interp.string_dict.get_or_insert("NaN");
        c.insert_hidden(key.into(), JsValue::Number(f64::NAN));
        let key = interp.string_dict.get_or_insert("POSITIVE_INFINITY");
        c.insert_hidden(key.into(), JsValue::Number(f64::INFINITY));
        let key = interp.string_dict.get_or_insert("NEGATIVE_INFINITY");
        c.insert_hidden(key.into(), JsValue::Number(f64::NEG_INFINITY));
    }
    let proto = interp.number_prototype.cheap_clone();
    link_constructor(interp, &ctor, &proto);
    ctor
}

pub fn number_call(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = match args.first() {
        Some(v) => interp.to_number_value(v)?,
        None => 0.0,
    };
    Ok(JsValue::Number(n))
}

pub fn number_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = match args.first() {
        Some(v) => interp.to_number_value(v)?,
        None => 0.0,
    };
    Ok(JsValue::Object(interp.create_number_object(n)))
}

fn this_number_value(this: &JsValue, method: &str) -> Result<f64, JsError> {
    match this {
        JsValue::Number(n) => Ok(*n),
        JsValue::Object(obj) => match &obj.borrow().exotic {
            ExoticObject::NumberWrapper(n) => Ok(*n),
            _ => Err(JsError::type_error(format!(
                "Number.prototype.{} called on non-number",
                method
            ))),
        },
        _ => Err(JsError::type_error(format!(
            "Number.prototype.{} called on non-number",
            method
        ))),
    }
}

pub fn number_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let n = this_number_value(&this, "toString")?;
    let radix = match args.first() {
        None | Some(JsValue::Undefined) => 10,
        Some(v) => v.to_int32(),
    };
    if radix == 10 {
        return Ok(JsValue::from(format_number(n)));
    }
    if !(2..=36).contains(&radix) {
        return Err(JsError::range_error("radix must be between 2 and 36"));
    }
    Ok(JsValue::from(format_radix(n, radix as u32)))
}

/// Integer rendering in a non-decimal radix; the fractional part is dropped,
/// non-finite values render as in base 10.
fn format_radix(n: f64, radix: u32) -> String {
    if n.is_nan() || n.is_infinite() {
        return format_number(n);
    }
    let negative = n < 0.0;
    let mut value = n.abs().trunc() as u64;
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = (value % radix as u64) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        value /= radix as u64;
    }
    if negative {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

pub fn number_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(this_number_value(&this, "valueOf")?))
}
