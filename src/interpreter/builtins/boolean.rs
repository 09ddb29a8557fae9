//! Boolean built-in methods

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, ExoticObject, JsObjectRef, JsValue};

use super::link_constructor;

pub fn init_boolean_prototype(interp: &mut Interpreter) {
    let proto = interp.boolean_prototype.cheap_clone();
    interp.register_method(&proto, "toString", boolean_to_string, 0);
    interp.register_method(&proto, "valueOf", boolean_value_of, 0);
}

pub fn create_boolean_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor = interp.create_native_constructor("Boolean", boolean_call, boolean_construct, 1);
    let proto = interp.boolean_prototype.cheap_clone();
    link_constructor(interp, &ctor, &proto);
    ctor
}

pub fn boolean_call(
    _interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let b = args.first().map(|v| v.to_boolean()).unwrap_or(false);
    Ok(JsValue::Boolean(b))
}

pub fn boolean_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let b = args.first().map(|v| v.to_boolean()).unwrap_or(false);
    Ok(JsValue::Object(interp.create_boolean_object(b)))
}

fn this_boolean_value(this: &JsValue, method: &str) -> Result<bool, JsError> {
    match this {
        JsValue::Boolean(b) => Ok(*b),
        JsValue::Object(obj) => match &obj.borrow().exotic {
            ExoticObject::BooleanWrapper(b) => Ok(*b),
            _ => Err(JsError::type_error(format!(
                "Boolean.prototype.{} called on non-boolean",
                method
            ))),
        },
        _ => Err(JsError::type_error(format!(
            "Boolean.prototype.{} called on non-boolean",
            method
        ))),
    }
}

pub fn boolean_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let b = this_boolean_value(&this, "toString")?;
    Ok(JsValue::from(if b { "true" } else { "false" }))
}

pub fn boolean_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(this_boolean_value(&this, "valueOf")?))
}
