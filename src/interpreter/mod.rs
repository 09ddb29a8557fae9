//! The object-model runtime: prototype registry, property operations,
//! primitive conversion protocol, and the call/construct protocol.
//!
//! The external statement evaluator drives this type: it holds [`JsValue`]s,
//! resolves names through the property operations, and implements
//! [`ScriptBody`](crate::value::ScriptBody) to evaluate parsed function
//! bodies when the call protocol invokes them.

// Builtin prototype implementations (split into separate files)
pub mod builtins;

use std::rc::Rc;

use log::debug;
use rustc_hash::FxHashSet;

use crate::error::JsError;
use crate::string_dict::StringDict;
use crate::value::{
    CheapClone, ExoticObject, JsFunction, JsObject, JsObjectRef, JsString, JsValue, NativeFn,
    NativeFunction, PropertyKey, ScriptBody, ScriptFunction,
};

/// Completion record for control flow.
///
/// Produced by [`ScriptBody::evaluate`]; Break/Continue never escape a
/// function body in well-formed programs but are part of the shared contract
/// with the statement evaluator.
#[derive(Debug)]
pub enum Completion {
    Normal(JsValue),
    Return(JsValue),
    Break(Option<JsString>),
    Continue(Option<JsString>),
}

/// Preferred type for the primitive conversion protocol.
///
/// The hint decides the candidate-method order: `String` tries `toString`
/// before `valueOf`, `Number` (the default) the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveHint {
    Number,
    String,
}

/// One function activation, handed to the statement evaluator.
///
/// The activation object carries the parameter bindings, the declared locals
/// (Undefined until assigned) and the hidden `arguments` property; it sits
/// innermost on the scope chain so that name resolution through property
/// lookup finds it first.
pub struct CallFrame {
    pub this_value: JsValue,
    pub activation: JsObjectRef,
    /// Scope chain for the body, innermost last
    pub scope: Vec<JsObjectRef>,
}

impl CallFrame {
    /// Read the Arguments object of this activation.
    pub fn arguments(&self) -> JsValue {
        self.activation
            .borrow()
            .own_value(&PropertyKey::from("arguments"))
            .unwrap_or(JsValue::Undefined)
    }
}

/// The runtime state: prototype registry, global object, and interner.
///
/// Single-threaded by design; the [`Runtime`](crate::Runtime) facade adds the
/// coarse lock for multi-threaded embedding.
pub struct Interpreter {
    /// String dictionary for deduplicating strings
    pub string_dict: StringDict,
    /// Global object
    pub global: JsObjectRef,
    /// Object.prototype, root of the default prototype chain
    pub object_prototype: JsObjectRef,
    /// Function.prototype
    pub function_prototype: JsObjectRef,
    /// Array.prototype
    pub array_prototype: JsObjectRef,
    /// String.prototype
    pub string_prototype: JsObjectRef,
    /// Number.prototype
    pub number_prototype: JsObjectRef,
    /// Boolean.prototype
    pub boolean_prototype: JsObjectRef,
    /// Date.prototype
    pub date_prototype: JsObjectRef,
}

impl Interpreter {
    pub fn new() -> Self {
        let object_prototype = JsObject::new().into_ref();
        let function_prototype =
            JsObject::with_prototype(object_prototype.cheap_clone()).into_ref();
        let array_prototype = JsObject::with_prototype(object_prototype.cheap_clone()).into_ref();
        let string_prototype = JsObject::with_prototype(object_prototype.cheap_clone()).into_ref();
        let number_prototype = JsObject::with_prototype(object_prototype.cheap_clone()).into_ref();
        let boolean_prototype = JsObject::with_prototype(object_prototype.cheap_clone()).into_ref();
        let date_prototype = JsObject::with_prototype(object_prototype.cheap_clone()).into_ref();
        let global = JsObject::with_prototype(object_prototype.cheap_clone()).into_ref();

        let mut interp = Self {
            string_dict: StringDict::with_common_strings(),
            global,
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            date_prototype,
        };
        builtins::init_runtime(&mut interp);
        debug!("object model bootstrapped");
        interp
    }

    /// Intern a string through the dictionary.
    pub fn intern(&mut self, s: &str) -> JsString {
        self.string_dict.get_or_insert(s)
    }

    /// Interned property key.
    pub fn key(&mut self, s: &str) -> PropertyKey {
        PropertyKey::from(self.intern(s))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Object creation
    // ═══════════════════════════════════════════════════════════════════════

    /// Create a plain object linked to Object.prototype.
    pub fn create_object(&mut self) -> JsObjectRef {
        JsObject::with_prototype(self.object_prototype.cheap_clone()).into_ref()
    }

    /// Create an array object from existing elements (none of them holes).
    pub fn create_array_from(&mut self, elements: Vec<JsValue>) -> JsObjectRef {
        JsObject::with_class(
            Some(self.array_prototype.cheap_clone()),
            "Array",
            ExoticObject::Array {
                elements: elements.into_iter().map(Some).collect(),
            },
        )
        .into_ref()
    }

    /// Create an array of `len` holes.
    pub fn create_array_with_length(&mut self, len: usize) -> JsObjectRef {
        JsObject::with_class(
            Some(self.array_prototype.cheap_clone()),
            "Array",
            ExoticObject::Array {
                elements: vec![None; len],
            },
        )
        .into_ref()
    }

    /// Create a native function object.
    pub fn create_native_function(&mut self, name: &str, func: NativeFn, arity: u32) -> JsObjectRef {
        let name = self.intern(name);
        JsObject::with_class(
            Some(self.function_prototype.cheap_clone()),
            "Function",
            ExoticObject::Function(JsFunction::Native(NativeFunction {
                name,
                func,
                ctor: None,
                arity,
            })),
        )
        .into_ref()
    }

    /// Create a native constructor: `func` is the call behavior, `ctor` the
    /// construct behavior.
    pub fn create_native_constructor(
        &mut self,
        name: &str,
        func: NativeFn,
        ctor: NativeFn,
        arity: u32,
    ) -> JsObjectRef {
        let name = self.intern(name);
        JsObject::with_class(
            Some(self.function_prototype.cheap_clone()),
            "Function",
            ExoticObject::Function(JsFunction::Native(NativeFunction {
                name,
                func,
                ctor: Some(ctor),
                arity,
            })),
        )
        .into_ref()
    }

    /// Create a script function from its declared metadata, captured scope
    /// chain and parsed body. A fresh `prototype` object with a `constructor`
    /// back-link is installed, ready for the construct protocol.
    pub fn create_script_function(
        &mut self,
        name: Option<&str>,
        params: &[&str],
        locals: &[&str],
        scope: Vec<JsObjectRef>,
        body: Rc<dyn ScriptBody>,
    ) -> JsObjectRef {
        let name = name.map(|n| self.intern(n));
        let params: Rc<[JsString]> = params.iter().map(|p| self.intern(p)).collect();
        let locals: Rc<[JsString]> = locals.iter().map(|l| self.intern(l)).collect();

        let func = JsObject::with_class(
            Some(self.function_prototype.cheap_clone()),
            "Function",
            ExoticObject::Function(JsFunction::Script(ScriptFunction {
                name,
                params,
                locals,
                body,
                scope,
                activations: Rc::new(std::cell::RefCell::new(Vec::new())),
            })),
        )
        .into_ref();

        let proto = self.create_object();
        let ctor_key = self.key("constructor");
        proto
            .borrow_mut()
            .insert_hidden(ctor_key, JsValue::Object(func.cheap_clone()));
        let proto_key = self.key("prototype");
        func.borrow_mut()
            .insert_value(proto_key, JsValue::Object(proto));
        func
    }

    /// Box a string primitive.
    pub fn create_string_object(&mut self, s: JsString) -> JsObjectRef {
        JsObject::with_class(
            Some(self.string_prototype.cheap_clone()),
            "String",
            ExoticObject::StringWrapper(s),
        )
        .into_ref()
    }

    /// Box a number primitive.
    pub fn create_number_object(&mut self, n: f64) -> JsObjectRef {
        JsObject::with_class(
            Some(self.number_prototype.cheap_clone()),
            "Number",
            ExoticObject::NumberWrapper(n),
        )
        .into_ref()
    }

    /// Box a boolean primitive.
    pub fn create_boolean_object(&mut self, b: bool) -> JsObjectRef {
        JsObject::with_class(
            Some(self.boolean_prototype.cheap_clone()),
            "Boolean",
            ExoticObject::BooleanWrapper(b),
        )
        .into_ref()
    }

    /// Create a date object from an instant (`None` = invalid date).
    pub fn create_date_object(&mut self, instant: Option<i64>) -> JsObjectRef {
        JsObject::with_class(
            Some(self.date_prototype.cheap_clone()),
            "Date",
            ExoticObject::Date { instant },
        )
        .into_ref()
    }

    /// Wrap an opaque host payload as an ordinary-behaving object; the
    /// interop bridge attaches state here when a host value must appear as a
    /// script value.
    pub fn wrap_host(&mut self, class: &str, data: Rc<dyn std::any::Any>) -> JsObjectRef {
        JsObject::with_class(
            Some(self.object_prototype.cheap_clone()),
            class,
            ExoticObject::Host(data),
        )
        .into_ref()
    }

    /// Register a native method as a hidden property on an object.
    pub fn register_method(&mut self, obj: &JsObjectRef, name: &str, func: NativeFn, arity: u32) {
        let f = self.create_native_function(name, func, arity);
        let key = self.key(name);
        obj.borrow_mut().insert_hidden(key, JsValue::Object(f));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Property operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Read a property through the prototype chain; absent names are
    /// Undefined.
    pub fn get_property(&self, obj: &JsObjectRef, key: &PropertyKey) -> JsValue {
        obj.borrow()
            .get_property(key)
            .unwrap_or(JsValue::Undefined)
    }

    /// Write a property on the receiver.
    pub fn put_property(
        &self,
        obj: &JsObjectRef,
        key: PropertyKey,
        value: JsValue,
    ) -> Result<(), JsError> {
        obj.borrow_mut().set_property(key, value)
    }

    pub fn has_property(&self, obj: &JsObjectRef, key: &PropertyKey) -> bool {
        obj.borrow().has_property(key)
    }

    pub fn delete_property(&self, obj: &JsObjectRef, key: &PropertyKey) -> bool {
        obj.borrow_mut().delete_property(key)
    }

    /// Property names for for-in enumeration.
    ///
    /// Arrays surface the index names of non-hole slots first, ascending;
    /// then own non-hidden names in insertion order; then each prototype's
    /// own non-hidden names not shadowed at a closer level. Hidden names
    /// shadow without being yielded.
    pub fn enumerate(&self, obj: &JsObjectRef) -> Vec<PropertyKey> {
        let mut seen: FxHashSet<PropertyKey> = FxHashSet::default();
        let mut out = Vec::new();
        let mut current = Some(obj.cheap_clone());

        while let Some(o) = current {
            let b = o.borrow();
            if let ExoticObject::Array { elements } = &b.exotic {
                for (i, slot) in elements.iter().enumerate() {
                    if slot.is_some() {
                        let key = PropertyKey::Index(i as u32);
                        if seen.insert(key.clone()) {
                            out.push(key);
                        }
                    }
                }
            }
            for (key, prop) in &b.properties {
                if seen.insert(key.clone()) && !prop.hidden {
                    out.push(key.clone());
                }
            }
            current = b.prototype.as_ref().map(CheapClone::cheap_clone);
        }
        out
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Primitive conversion protocol
    // ═══════════════════════════════════════════════════════════════════════

    /// ToPrimitive: primitives pass through unchanged regardless of hint;
    /// objects go through [`Self::get_default_value`].
    pub fn to_primitive(
        &mut self,
        value: &JsValue,
        hint: PrimitiveHint,
    ) -> Result<JsValue, JsError> {
        match value {
            JsValue::Object(obj) => self.get_default_value(obj, hint),
            _ => Ok(value.clone()),
        }
    }

    /// The object branch of ToPrimitive: try the hint-ordered candidate
    /// methods with `this` bound to the object and no arguments; the first
    /// primitive result wins.
    pub fn get_default_value(
        &mut self,
        obj: &JsObjectRef,
        hint: PrimitiveHint,
    ) -> Result<JsValue, JsError> {
        let candidates: [&str; 2] = match hint {
            PrimitiveHint::String => ["toString", "valueOf"],
            PrimitiveHint::Number => ["valueOf", "toString"],
        };
        for name in candidates {
            let method = obj.borrow().get_property(&PropertyKey::from(name));
            if let Some(method @ JsValue::Object(_)) = method {
                if method.is_callable() {
                    let result =
                        self.call_function(method, JsValue::Object(obj.cheap_clone()), &[])?;
                    if result.is_primitive() {
                        return Ok(result);
                    }
                }
            }
        }
        Err(JsError::type_error("no default value"))
    }

    /// Full ToNumber, including the object path.
    pub fn to_number_value(&mut self, value: &JsValue) -> Result<f64, JsError> {
        match value {
            JsValue::Object(_) => Ok(self.to_primitive(value, PrimitiveHint::Number)?.to_number()),
            _ => Ok(value.to_number()),
        }
    }

    /// Full ToString, including the object path.
    pub fn to_string_value(&mut self, value: &JsValue) -> Result<JsString, JsError> {
        match value {
            JsValue::Object(_) => Ok(self
                .to_primitive(value, PrimitiveHint::String)?
                .to_js_string()),
            _ => Ok(value.to_js_string()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Call protocol
    // ═══════════════════════════════════════════════════════════════════════

    /// Invoke a callable value.
    ///
    /// Script functions get a fresh Arguments object (copied at entry) and a
    /// fresh activation frame pushed onto the captured scope; the body's
    /// Return or Normal completion value is the result, anything else is
    /// Undefined.
    pub fn call_function(
        &mut self,
        callee: JsValue,
        this_value: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let JsValue::Object(obj) = callee else {
            return Err(JsError::type_error("not a function"));
        };

        let func = {
            let obj_ref = obj.borrow();
            match &obj_ref.exotic {
                ExoticObject::Function(f) => f.clone(),
                _ => return Err(JsError::type_error("not a function")),
            }
        };

        match func {
            JsFunction::Native(native) => (native.func)(self, this_value, args),
            JsFunction::Script(script) => {
                let args_obj = self.create_arguments(&obj, &script, args);
                let activation = self.create_activation(&script, args, &args_obj);
                script.activations.borrow_mut().push(args_obj);

                let mut scope = script.scope.clone();
                scope.push(activation.cheap_clone());
                let mut frame = CallFrame {
                    this_value,
                    activation,
                    scope,
                };

                // Pop the activation on all exit paths before propagating
                let result = script.body.evaluate(self, &mut frame);
                script.activations.borrow_mut().pop();

                match result? {
                    Completion::Return(v) | Completion::Normal(v) => Ok(v),
                    _ => Ok(JsValue::Undefined),
                }
            }
        }
    }

    /// The `new`-expression protocol.
    ///
    /// Natives construct through their registered construct behavior. Script
    /// functions get a fresh plain object whose prototype is the callee's
    /// `prototype` property (falling back to Object.prototype), run with
    /// `this` bound to it, and that object is always the result: an object
    /// explicitly returned from the body is deliberately not substituted.
    pub fn construct(&mut self, callee: JsValue, args: &[JsValue]) -> Result<JsObjectRef, JsError> {
        let JsValue::Object(ctor) = callee else {
            return Err(JsError::type_error("not a constructor"));
        };

        let func = {
            let ctor_ref = ctor.borrow();
            match &ctor_ref.exotic {
                ExoticObject::Function(f) => f.clone(),
                _ => return Err(JsError::type_error("not a constructor")),
            }
        };

        match func {
            JsFunction::Native(native) => {
                let Some(construct) = native.ctor else {
                    return Err(JsError::type_error(format!(
                        "{} is not a constructor",
                        native.name
                    )));
                };
                match construct(self, JsValue::Undefined, args)? {
                    JsValue::Object(obj) => Ok(obj),
                    _ => Err(JsError::type_error("constructor did not produce an object")),
                }
            }
            JsFunction::Script(_) => {
                let proto_key = self.key("prototype");
                let proto = match ctor.borrow().get_property(&proto_key) {
                    Some(JsValue::Object(p)) => p,
                    _ => self.object_prototype.cheap_clone(),
                };
                let new_obj = JsObject::with_prototype(proto).into_ref();
                self.call_function(
                    JsValue::Object(ctor),
                    JsValue::Object(new_obj.cheap_clone()),
                    args,
                )?;
                Ok(new_obj)
            }
        }
    }

    /// Materialize the Arguments object for one activation: hidden `callee`
    /// and `length`, the parameter names bound to the call's positional
    /// values, surplus positionals under index names. Indices below the
    /// parameter count read through the named slots (same store); the copy
    /// happens once, at entry.
    fn create_arguments(
        &mut self,
        func_obj: &JsObjectRef,
        script: &ScriptFunction,
        args: &[JsValue],
    ) -> JsObjectRef {
        let args_obj = JsObject::with_class(
            Some(self.object_prototype.cheap_clone()),
            "Arguments",
            ExoticObject::Arguments {
                params: script.params.cheap_clone(),
            },
        )
        .into_ref();

        {
            let mut a = args_obj.borrow_mut();
            let callee_key = self.key("callee");
            a.insert_hidden(callee_key, JsValue::Object(func_obj.cheap_clone()));
            let length_key = self.key("length");
            a.insert_hidden(length_key, JsValue::Number(args.len() as f64));

            for (i, name) in script.params.iter().enumerate() {
                let value = args.get(i).cloned().unwrap_or(JsValue::Undefined);
                a.insert_hidden(PropertyKey::String(name.cheap_clone()), value);
            }
            for (i, value) in args.iter().enumerate().skip(script.params.len()) {
                a.insert_hidden(PropertyKey::Index(i as u32), value.clone());
            }
        }
        args_obj
    }

    /// Build the activation object: parameter bindings (a separate copy, not
    /// aliased with the Arguments object after entry), declared locals bound
    /// to Undefined, and the hidden `arguments` reference.
    fn create_activation(
        &mut self,
        script: &ScriptFunction,
        args: &[JsValue],
        args_obj: &JsObjectRef,
    ) -> JsObjectRef {
        let activation = JsObject::with_class(None, "Activation", ExoticObject::Ordinary).into_ref();
        {
            let mut a = activation.borrow_mut();
            for (i, name) in script.params.iter().enumerate() {
                let value = args.get(i).cloned().unwrap_or(JsValue::Undefined);
                a.insert_value(PropertyKey::String(name.cheap_clone()), value);
            }
            for name in script.locals.iter() {
                a.insert_value(PropertyKey::String(name.cheap_clone()), JsValue::Undefined);
            }
            let args_key = self.key("arguments");
            a.insert_hidden(args_key, JsValue::Object(args_obj.cheap_clone()));
        }
        activation
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
