//! Object built-in methods

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsObjectRef, JsString, JsValue, PropertyKey};

use super::{link_constructor, to_object};

/// Initialize Object.prototype. This is the root of the default prototype
/// chain, so valueOf/toString here back every object's primitive conversion.
pub fn init_object_prototype(interp: &mut Interpreter) {
    let proto = interp.object_prototype.cheap_clone();
    interp.register_method(&proto, "toString", object_to_string, 0);
    interp.register_method(&proto, "valueOf", object_value_of, 0);
    interp.register_method(&proto, "hasOwnProperty", object_has_own_property, 1);
}

/// Create the Object constructor. Called or constructed, it is ToObject.
pub fn create_object_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor = interp.create_native_constructor("Object", object_construct, object_construct, 1);
    let proto = interp.object_prototype.cheap_clone();
    link_constructor(interp, &ctor, &proto);
    ctor
}

pub fn object_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let arg = args.first().cloned().unwrap_or(JsValue::Undefined);
    Ok(JsValue::Object(to_object(interp, &arg)))
}

/// Object.prototype.toString: "[object <class>]"
pub fn object_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let class = match &this {
        JsValue::Object(obj) => obj.borrow().class.cheap_clone(),
        JsValue::Undefined => JsString::from("Undefined"),
        JsValue::Null => JsString::from("Null"),
        _ => JsString::from("Object"),
    };
    Ok(JsValue::String(JsString::from(format!(
        "[object {}]",
        class
    ))))
}

/// Object.prototype.valueOf returns the receiver unchanged; the conversion
/// protocol rejects it as non-primitive and moves on to toString.
pub fn object_value_of(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(this)
}

pub fn object_has_own_property(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let JsValue::Object(obj) = this else {
        return Err(JsError::type_error(
            "Object.prototype.hasOwnProperty called on non-object",
        ));
    };
    let name = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => JsString::from("undefined"),
    };
    let key = PropertyKey::from(name);
    let has = obj.borrow().has_own_property(&key);
    Ok(JsValue::Boolean(has))
}
