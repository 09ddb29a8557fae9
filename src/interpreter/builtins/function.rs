//! Function built-in methods

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsFunction, JsValue};

pub fn init_function_prototype(interp: &mut Interpreter) {
    let proto = interp.function_prototype.cheap_clone();
    interp.register_method(&proto, "toString", function_to_string, 0);
}

pub fn function_to_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let JsValue::Object(obj) = this else {
        return Err(JsError::type_error(
            "Function.prototype.toString called on non-function",
        ));
    };
    let obj_ref = obj.borrow();
    let Some(func) = obj_ref.as_function() else {
        return Err(JsError::type_error(
            "Function.prototype.toString called on non-function",
        ));
    };

    let rendered = match func {
        JsFunction::Native(n) => format!("function {}() {{ [native code] }}", n.name),
        JsFunction::Script(s) => {
            let name = s.name.as_ref().map(|n| n.as_str()).unwrap_or("anonymous");
            let params: Vec<&str> = s.params.iter().map(|p| p.as_str()).collect();
            format!("function {}({}) {{ ... }}", name, params.join(", "))
        }
    };
    Ok(JsValue::from(rendered))
}
