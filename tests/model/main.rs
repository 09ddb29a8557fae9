//! Integration tests for the object model, organized by feature
//!
//! These tests exercise the runtime through the public API, the way the
//! external statement evaluator and host bindings drive it.

mod coercion;
mod dates;
mod objects;

use esrun::{JsObjectRef, JsValue, Runtime};

/// Invoke a method found on the object (usually through its prototype).
pub fn call_method(
    rt: &Runtime,
    obj: &JsObjectRef,
    name: &str,
    args: &[JsValue],
) -> Result<JsValue, esrun::JsError> {
    let func = rt.get_property(obj, name);
    rt.call(func, JsValue::Object(obj.clone()), args)
}

/// Fetch a constructor from the global object.
pub fn global_ctor(rt: &Runtime, name: &str) -> JsValue {
    let global = rt.global();
    rt.get_property(&global, name)
}

/// Narrow a value to its object handle.
pub fn as_object(value: JsValue) -> JsObjectRef {
    match value {
        JsValue::Object(obj) => obj,
        other => panic!("expected an object, got {:?}", other),
    }
}
