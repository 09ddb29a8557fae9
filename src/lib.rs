//! ECMAScript value and object model runtime for embedding
//!
//! This crate is the value/object core of an ECMAScript-family interpreter:
//! the tagged value representation, prototype-based property resolution, the
//! primitive conversion protocol, and the built-in reference types (Array,
//! Function, the primitive wrappers, Date). The lexer/parser and statement
//! evaluator are external collaborators that drive it through [`Runtime`].
//!
//! # Example
//!
//! ```
//! use esrun::{JsValue, Runtime};
//!
//! let rt = Runtime::new();
//! let arr = rt.new_array(vec![JsValue::Number(1.0), JsValue::Number(2.0)]);
//! rt.put_property(&arr, "2", JsValue::from("x")).unwrap();
//! assert_eq!(rt.get_property(&arr, "length"), JsValue::Number(3.0));
//! ```

pub mod error;
pub mod interpreter;
pub mod string_dict;
pub mod value;

pub use error::JsError;
pub use interpreter::{CallFrame, Completion, Interpreter, PrimitiveHint};
pub use value::{
    CheapClone, ExoticObject, JsFunction, JsObject, JsObjectRef, JsString, JsValue, NativeFn,
    Property, PropertyKey, ScriptBody,
};

use std::rc::Rc;
use std::sync::{Mutex, MutexGuard};

use log::debug;

use interpreter::builtins;

/// The embeddable runtime.
///
/// Owns one [`Interpreter`] behind a single coarse-grained lock: every
/// externally reachable entry point acquires it for its scope and releases it
/// on all exit paths, including errors. There is no finer-grained locking and
/// no cancellation primitive; a runaway script callback blocks its caller.
pub struct Runtime {
    core: Mutex<Interpreter>,
}

impl Runtime {
    /// Create a new runtime instance with the built-in prototypes and global
    /// object bootstrapped.
    pub fn new() -> Self {
        let rt = Self {
            core: Mutex::new(Interpreter::new()),
        };
        debug!("runtime created");
        rt
    }

    /// Scoped acquisition of the runtime lock. A poisoned lock is recovered:
    /// the property store holds no invariants across a panic boundary that it
    /// does not re-establish on the next operation.
    fn lock(&self) -> MutexGuard<'_, Interpreter> {
        self.core
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Run a compound operation under one lock acquisition. The statement
    /// evaluator uses this to keep a whole evaluation inside a single
    /// critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut Interpreter) -> R) -> R {
        f(&mut self.lock())
    }

    /// The global object.
    pub fn global(&self) -> JsObjectRef {
        self.lock().global.cheap_clone()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Property operations
    // ═══════════════════════════════════════════════════════════════════════

    pub fn get_property(&self, obj: &JsObjectRef, name: &str) -> JsValue {
        self.lock().get_property(obj, &PropertyKey::from(name))
    }

    pub fn put_property(
        &self,
        obj: &JsObjectRef,
        name: &str,
        value: JsValue,
    ) -> Result<(), JsError> {
        self.lock().put_property(obj, PropertyKey::from(name), value)
    }

    pub fn has_property(&self, obj: &JsObjectRef, name: &str) -> bool {
        self.lock().has_property(obj, &PropertyKey::from(name))
    }

    pub fn delete_property(&self, obj: &JsObjectRef, name: &str) -> bool {
        self.lock().delete_property(obj, &PropertyKey::from(name))
    }

    /// Own-and-inherited enumerable property names, in for-in order.
    pub fn enumerate(&self, obj: &JsObjectRef) -> Vec<String> {
        self.lock()
            .enumerate(obj)
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Call protocol
    // ═══════════════════════════════════════════════════════════════════════

    /// Invoke a callable value.
    pub fn call(
        &self,
        callee: JsValue,
        this_value: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        self.lock().call_function(callee, this_value, args)
    }

    /// Run the `new`-expression protocol on a constructor.
    pub fn construct(&self, callee: JsValue, args: &[JsValue]) -> Result<JsObjectRef, JsError> {
        self.lock().construct(callee, args)
    }

    /// Call a global function by name with JSON arguments.
    ///
    /// A JSON array is spread as individual arguments; anything else is
    /// passed as a single argument.
    pub fn call_function(
        &self,
        name: &str,
        args: &serde_json::Value,
    ) -> Result<JsValue, JsError> {
        let mut interp = self.lock();
        let func = interp.get_property(&interp.global.cheap_clone(), &PropertyKey::from(name));
        if !func.is_callable() {
            return Err(JsError::reference_error(name));
        }
        let js_args = match args {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| builtins::json_to_js_value(&mut interp, item))
                .collect::<Result<Vec<_>, _>>()?,
            other => vec![builtins::json_to_js_value(&mut interp, other)?],
        };
        interp.call_function(func, JsValue::Undefined, &js_args)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Coercion protocol
    // ═══════════════════════════════════════════════════════════════════════

    pub fn to_boolean(&self, value: &JsValue) -> bool {
        value.to_boolean()
    }

    pub fn to_number(&self, value: &JsValue) -> Result<f64, JsError> {
        self.lock().to_number_value(value)
    }

    pub fn to_string_value(&self, value: &JsValue) -> Result<JsString, JsError> {
        self.lock().to_string_value(value)
    }

    pub fn to_primitive(&self, value: &JsValue, hint: PrimitiveHint) -> Result<JsValue, JsError> {
        self.lock().to_primitive(value, hint)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Construction entry points
    // ═══════════════════════════════════════════════════════════════════════

    pub fn new_object(&self) -> JsObjectRef {
        self.lock().create_object()
    }

    pub fn new_array(&self, elements: Vec<JsValue>) -> JsObjectRef {
        self.lock().create_array_from(elements)
    }

    pub fn new_array_with_length(&self, len: usize) -> JsObjectRef {
        self.lock().create_array_with_length(len)
    }

    pub fn new_string(&self, s: &str) -> JsObjectRef {
        let mut interp = self.lock();
        let s = interp.intern(s);
        interp.create_string_object(s)
    }

    pub fn new_number(&self, n: f64) -> JsObjectRef {
        self.lock().create_number_object(n)
    }

    pub fn new_boolean(&self, b: bool) -> JsObjectRef {
        self.lock().create_boolean_object(b)
    }

    /// A date object from millis since epoch; `None` is the invalid date.
    pub fn new_date(&self, instant: Option<i64>) -> JsObjectRef {
        self.lock().create_date_object(instant)
    }

    pub fn new_native_function(&self, name: &str, func: NativeFn, arity: u32) -> JsObjectRef {
        self.lock().create_native_function(name, func, arity)
    }

    /// A script function from its declared metadata, captured scope chain
    /// and parsed body (the statement evaluator's [`ScriptBody`]).
    pub fn new_script_function(
        &self,
        name: Option<&str>,
        params: &[&str],
        locals: &[&str],
        scope: Vec<JsObjectRef>,
        body: Rc<dyn ScriptBody>,
    ) -> JsObjectRef {
        self.lock()
            .create_script_function(name, params, locals, scope, body)
    }

    /// Wrap an opaque host payload as a script object (the interop bridge's
    /// entry point).
    pub fn wrap_host(&self, class: &str, data: Rc<dyn std::any::Any>) -> JsObjectRef {
        self.lock().wrap_host(class, data)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Host value bridge
    // ═══════════════════════════════════════════════════════════════════════

    pub fn value_from_json(&self, json: &serde_json::Value) -> Result<JsValue, JsError> {
        builtins::json_to_js_value(&mut self.lock(), json)
    }

    pub fn value_to_json(&self, value: &JsValue) -> Result<serde_json::Value, JsError> {
        let _guard = self.lock();
        builtins::js_value_to_json(value)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
