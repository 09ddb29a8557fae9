//! Runtime value representation
//!
//! The core JsValue type and the object model: property slots, the
//! prototype-linked JsObject, and the closed set of built-in object kinds.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::error::JsError;
use crate::interpreter::{CallFrame, Completion, Interpreter};

/// Trait for types that have cheap (O(1), reference-counted) clones.
///
/// Makes it explicit when a clone only bumps a reference count. Types
/// implementing this trait should have O(1) clone operations.
pub trait CheapClone: Clone {
    /// Create a cheap (reference-counted) clone of this value.
    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: ?Sized> CheapClone for Rc<T> {}

/// A script value
#[derive(Clone, Default)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
    Object(JsObjectRef),
}

impl JsValue {
    /// Check if this value is null or undefined
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, JsValue::Null | JsValue::Undefined)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, JsValue::Object(_))
    }

    /// Check if this value is callable (a function)
    pub fn is_callable(&self) -> bool {
        match self {
            JsValue::Object(obj) => obj.borrow().is_callable(),
            _ => false,
        }
    }

    /// Get the typeof result for this value
    pub fn type_of(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null => "object", // Historical quirk
            JsValue::Boolean(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
            JsValue::Object(obj) => {
                if obj.borrow().is_callable() {
                    "function"
                } else {
                    "object"
                }
            }
        }
    }

    /// Convert to boolean (ToBoolean). Total.
    ///
    /// Objects are always truthy, including a Boolean wrapper holding `false`.
    pub fn to_boolean(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Boolean(b) => *b,
            JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
            JsValue::String(s) => !s.is_empty(),
            JsValue::Object(_) => true,
        }
    }

    /// Convert to number (ToNumber). Total.
    ///
    /// Strings parse permissively: surrounding whitespace is tolerated, the
    /// empty string is 0, and anything `f64`-parseable (including "Infinity")
    /// is accepted; everything else is NaN. Objects need the primitive
    /// conversion protocol and yield NaN here; use
    /// [`Interpreter::to_number_value`] for the full path.
    pub fn to_number(&self) -> f64 {
        match self {
            JsValue::Undefined => f64::NAN,
            JsValue::Null => 0.0,
            JsValue::Boolean(true) => 1.0,
            JsValue::Boolean(false) => 0.0,
            JsValue::Number(n) => *n,
            JsValue::String(s) => {
                let trimmed = s.as_str().trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            JsValue::Object(_) => f64::NAN,
        }
    }

    /// Convert to string (ToString). Total.
    ///
    /// Objects need the primitive conversion protocol and render as
    /// "[object Object]" here; use [`Interpreter::to_string_value`] for the
    /// full path.
    pub fn to_js_string(&self) -> JsString {
        match self {
            JsValue::Undefined => JsString::from("undefined"),
            JsValue::Null => JsString::from("null"),
            JsValue::Boolean(true) => JsString::from("true"),
            JsValue::Boolean(false) => JsString::from("false"),
            JsValue::Number(n) => JsString::from(format_number(*n)),
            JsValue::String(s) => s.clone(),
            JsValue::Object(_) => JsString::from("[object Object]"),
        }
    }

    /// ToInteger: NaN becomes 0, infinities pass through, everything else
    /// truncates toward zero.
    pub fn to_integer(&self) -> f64 {
        let n = self.to_number();
        if n.is_nan() {
            0.0
        } else if n.is_infinite() {
            n
        } else {
            n.trunc()
        }
    }

    /// ToInt32: NaN becomes 0; infinities and out-of-range values saturate
    /// at the type bounds (best-effort sign behavior).
    pub fn to_int32(&self) -> i32 {
        self.to_number() as i32
    }

    /// ToUInt32, with the same truncating-cast caveats as [`Self::to_int32`].
    pub fn to_uint32(&self) -> u32 {
        self.to_number() as u32
    }

    /// ToUInt16, with the same truncating-cast caveats as [`Self::to_int32`].
    pub fn to_uint16(&self) -> u16 {
        self.to_number() as u16
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Null, JsValue::Null) => true,
            (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
            (JsValue::Number(a), JsValue::Number(b)) => {
                // NaN !== NaN
                if a.is_nan() || b.is_nan() {
                    false
                } else {
                    a == b
                }
            }
            (JsValue::String(a), JsValue::String(b)) => a == b,
            (JsValue::Object(a), JsValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Number-to-string rule: doubles that equal some i64 exactly render as an
/// integer literal (no decimal point); everything else goes through the
/// standard f64 formatter.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n == n.trunc() && n.abs() <= i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Debug for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "undefined"),
            JsValue::Null => write!(f, "null"),
            JsValue::Boolean(b) => write!(f, "{}", b),
            JsValue::Number(n) => write!(f, "{}", n),
            JsValue::String(s) => write!(f, "\"{}\"", s.as_str()),
            JsValue::Object(obj) => {
                let obj = obj.borrow();
                match &obj.exotic {
                    ExoticObject::Ordinary | ExoticObject::Host(_) => {
                        write!(f, "[object {}]", obj.class)
                    }
                    ExoticObject::Array { elements } => write!(f, "[...{}]", elements.len()),
                    ExoticObject::Function(func) => {
                        write!(f, "[Function: {}]", func.name().unwrap_or("anonymous"))
                    }
                    ExoticObject::Arguments { .. } => write!(f, "[object Arguments]"),
                    ExoticObject::StringWrapper(s) => write!(f, "[String: \"{}\"]", s),
                    ExoticObject::NumberWrapper(n) => write!(f, "[Number: {}]", n),
                    ExoticObject::BooleanWrapper(b) => write!(f, "[Boolean: {}]", b),
                    ExoticObject::Date { instant } => match instant {
                        Some(ms) => write!(f, "Date({})", ms),
                        None => write!(f, "Date(invalid)"),
                    },
                }
            }
        }
    }
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

// Conversions from Rust types

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Boolean(b)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        JsValue::Number(n)
    }
}

impl From<i32> for JsValue {
    fn from(n: i32) -> Self {
        JsValue::Number(n as f64)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(JsString::from(s))
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::String(JsString::from(s))
    }
}

impl From<JsString> for JsValue {
    fn from(s: JsString) -> Self {
        JsValue::String(s)
    }
}

impl From<JsObjectRef> for JsValue {
    fn from(obj: JsObjectRef) -> Self {
        JsValue::Object(obj)
    }
}

/// Reference-counted string for efficient string handling
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct JsString(Rc<str>);

// JsString wraps Rc<str>, so clone is a reference count increment
impl CheapClone for JsString {}

impl JsString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Byte length of the UTF-8 text
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Length in UTF-16 code units, the unit scripts count strings in
    pub fn char_length(&self) -> usize {
        self.0.encode_utf16().count()
    }

    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.0.parse()
    }
}

impl AsRef<str> for JsString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for JsString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JsString {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for JsString {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString(s.into())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString(s.into())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a heap-allocated object.
///
/// Shared ownership: closures, property stores and scope frames may all hold
/// references to the same object, and cycles (prototype chains, captured
/// scopes, `callee` back-references) are legal. Cyclic graphs are never
/// reclaimed; see DESIGN.md.
pub type JsObjectRef = Rc<RefCell<JsObject>>;

/// Property key (string or canonical array index)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(JsString),
    Index(u32),
}

impl PropertyKey {
    /// Check if this key equals a string literal (avoids allocation)
    #[inline]
    pub fn eq_str(&self, s: &str) -> bool {
        match self {
            PropertyKey::String(js_str) => js_str.as_str() == s,
            PropertyKey::Index(_) => false,
        }
    }

    pub fn as_index(&self) -> Option<u32> {
        match self {
            PropertyKey::Index(i) => Some(*i),
            PropertyKey::String(_) => None,
        }
    }
}

impl From<&str> for PropertyKey {
    #[inline]
    fn from(s: &str) -> Self {
        // Fast path: check first char is a digit before parsing
        if let Some(first) = s.bytes().next() {
            if first.is_ascii_digit() {
                if let Ok(idx) = s.parse::<u32>() {
                    // Only canonical spellings (no leading zeros except "0")
                    if idx.to_string() == s {
                        return PropertyKey::Index(idx);
                    }
                }
            }
        }
        PropertyKey::String(JsString::from(s))
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::from(s.as_str())
    }
}

impl From<JsString> for PropertyKey {
    #[inline]
    fn from(s: JsString) -> Self {
        if let Some(first) = s.as_str().bytes().next() {
            if first.is_ascii_digit() {
                if let Ok(idx) = s.parse::<u32>() {
                    if idx.to_string() == s.as_str() {
                        return PropertyKey::Index(idx);
                    }
                }
            }
        }
        PropertyKey::String(s)
    }
}

impl From<u32> for PropertyKey {
    fn from(idx: u32) -> Self {
        PropertyKey::Index(idx)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{}", s),
            PropertyKey::Index(i) => write!(f, "{}", i),
        }
    }
}

/// One property slot.
///
/// `hidden` marks the property non-enumerable (built-in methods and internal
/// bookkeeping); it never affects readability or writability.
#[derive(Debug, Clone)]
pub struct Property {
    pub value: JsValue,
    pub hidden: bool,
}

impl Property {
    pub fn new(value: JsValue) -> Self {
        Self {
            value,
            hidden: false,
        }
    }

    pub fn hidden(value: JsValue) -> Self {
        Self {
            value,
            hidden: true,
        }
    }
}

/// Insertion-ordered, hash-indexed property store
pub type PropertyMap = IndexMap<PropertyKey, Property, FxBuildHasher>;

/// A script object: a prototype link, an owned property store, a class-name
/// tag, and the kind-specific state that built-ins dispatch on.
#[derive(Debug)]
pub struct JsObject {
    /// Prototype link (shared, not owned). A cyclic chain makes lookup
    /// non-terminating; well-formed programs never build one.
    pub prototype: Option<JsObjectRef>,
    /// Object properties, insertion-ordered
    pub properties: PropertyMap,
    /// Class-name tag ("Object", "Array", "Function", ...)
    pub class: JsString,
    /// Kind-specific behavior
    pub exotic: ExoticObject,
}

impl JsObject {
    /// Create a new ordinary object with no prototype
    pub fn new() -> Self {
        Self {
            prototype: None,
            properties: PropertyMap::default(),
            class: JsString::from("Object"),
            exotic: ExoticObject::Ordinary,
        }
    }

    /// Create a new ordinary object with a prototype
    pub fn with_prototype(prototype: JsObjectRef) -> Self {
        Self {
            prototype: Some(prototype),
            ..Self::new()
        }
    }

    pub fn with_class(prototype: Option<JsObjectRef>, class: &str, exotic: ExoticObject) -> Self {
        Self {
            prototype,
            properties: PropertyMap::default(),
            class: JsString::from(class),
            exotic,
        }
    }

    /// Wrap into a shared handle
    pub fn into_ref(self) -> JsObjectRef {
        Rc::new(RefCell::new(self))
    }

    /// Check if this object is callable
    pub fn is_callable(&self) -> bool {
        matches!(self.exotic, ExoticObject::Function(_))
    }

    pub fn as_array(&self) -> Option<&Vec<Option<JsValue>>> {
        match &self.exotic {
            ExoticObject::Array { elements } => Some(elements),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Option<JsValue>>> {
        match &mut self.exotic {
            ExoticObject::Array { elements } => Some(elements),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&JsFunction> {
        match &self.exotic {
            ExoticObject::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Get an own property slot from the store (no exotic behavior)
    pub fn own_property(&self, key: &PropertyKey) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Read an own property, applying kind-specific computed properties
    /// before the store. Returns None when the name is absent here and the
    /// lookup should continue on the prototype.
    pub fn own_value(&self, key: &PropertyKey) -> Option<JsValue> {
        match &self.exotic {
            ExoticObject::Array { elements } => {
                // Index reads resolve on the array itself: in-range holes and
                // out-of-range indices are Undefined, never prototype lookups.
                if let PropertyKey::Index(i) = key {
                    let v = elements
                        .get(*i as usize)
                        .and_then(|slot| slot.clone())
                        .unwrap_or(JsValue::Undefined);
                    return Some(v);
                }
                if key.eq_str("length") {
                    return Some(JsValue::Number(elements.len() as f64));
                }
            }
            ExoticObject::Arguments { params } => {
                // An index below the parameter count reads the named slot of
                // this same store.
                if let PropertyKey::Index(i) = key {
                    if let Some(name) = params.get(*i as usize) {
                        return self
                            .properties
                            .get(&PropertyKey::String(name.cheap_clone()))
                            .map(|p| p.value.clone());
                    }
                }
            }
            ExoticObject::StringWrapper(s) => {
                if key.eq_str("length") {
                    return Some(JsValue::Number(s.char_length() as f64));
                }
            }
            ExoticObject::Function(f) => {
                if key.eq_str("length") {
                    return Some(JsValue::Number(f.arity() as f64));
                }
                if key.eq_str("arguments") {
                    return Some(f.current_arguments());
                }
            }
            _ => {}
        }
        self.properties.get(key).map(|p| p.value.clone())
    }

    /// Get a property, searching the prototype chain
    pub fn get_property(&self, key: &PropertyKey) -> Option<JsValue> {
        if let Some(v) = self.own_value(key) {
            return Some(v);
        }
        if let Some(ref proto) = self.prototype {
            return proto.borrow().get_property(key);
        }
        None
    }

    /// Write a property. Always lands on the receiver, never on the
    /// prototype. Kind-specific overrides: array index/length coupling, and
    /// read-only computed names whose writes are silently ignored.
    pub fn set_property(&mut self, key: PropertyKey, value: JsValue) -> Result<(), JsError> {
        match &mut self.exotic {
            ExoticObject::Array { elements } => {
                if let PropertyKey::Index(i) = key {
                    array_set_index(elements, i, value);
                    return Ok(());
                }
                if key.eq_str("length") {
                    let len = value.to_number();
                    if len.is_nan() || len < 0.0 || len.trunc() != len || len.is_infinite() {
                        return Err(JsError::range_error("invalid array length"));
                    }
                    array_set_length(elements, len as usize);
                    return Ok(());
                }
            }
            ExoticObject::Function(_) => {
                if key.eq_str("length") || key.eq_str("arguments") {
                    return Ok(());
                }
            }
            ExoticObject::StringWrapper(_) => {
                if key.eq_str("length") {
                    return Ok(());
                }
            }
            _ => {}
        }
        self.properties.insert(key, Property::new(value));
        Ok(())
    }

    /// Install a non-enumerable property (built-ins, internal bookkeeping)
    pub fn insert_hidden(&mut self, key: PropertyKey, value: JsValue) {
        self.properties.insert(key, Property::hidden(value));
    }

    /// Install an enumerable property without the exotic write overrides
    pub fn insert_value(&mut self, key: PropertyKey, value: JsValue) {
        self.properties.insert(key, Property::new(value));
    }

    /// Check for an own property (computed ones included)
    pub fn has_own_property(&self, key: &PropertyKey) -> bool {
        match &self.exotic {
            ExoticObject::Array { elements } => {
                if let PropertyKey::Index(i) = key {
                    return elements
                        .get(*i as usize)
                        .map(|slot| slot.is_some())
                        .unwrap_or(false);
                }
                if key.eq_str("length") {
                    return true;
                }
            }
            ExoticObject::StringWrapper(_) => {
                if key.eq_str("length") {
                    return true;
                }
            }
            ExoticObject::Function(_) => {
                if key.eq_str("length") || key.eq_str("arguments") {
                    return true;
                }
            }
            _ => {}
        }
        self.properties.contains_key(key)
    }

    /// Check for a property anywhere on the prototype chain
    pub fn has_property(&self, key: &PropertyKey) -> bool {
        if self.has_own_property(key) {
            return true;
        }
        if let Some(ref proto) = self.prototype {
            return proto.borrow().has_property(key);
        }
        false
    }

    /// Delete an own property. Only ever touches the receiver; deleting an
    /// absent name is success. An in-range array index re-holes the slot.
    pub fn delete_property(&mut self, key: &PropertyKey) -> bool {
        if let ExoticObject::Array { elements } = &mut self.exotic {
            if let PropertyKey::Index(i) = key {
                if let Some(slot) = elements.get_mut(*i as usize) {
                    *slot = None;
                }
                return true;
            }
        }
        self.properties.shift_remove(key);
        true
    }
}

impl Default for JsObject {
    fn default() -> Self {
        Self::new()
    }
}

/// Store at index `i`, growing with holes when writing past the end.
/// `length == elements.len()` holds afterwards; the written slot is never a
/// hole.
pub(crate) fn array_set_index(elements: &mut Vec<Option<JsValue>>, i: u32, value: JsValue) {
    let i = i as usize;
    if i >= elements.len() {
        elements.resize(i + 1, None);
    }
    elements[i] = Some(value);
}

/// Truncate or extend-with-holes to exactly `new_len`.
pub(crate) fn array_set_length(elements: &mut Vec<Option<JsValue>>, new_len: usize) {
    elements.resize(new_len, None);
}

/// Kind-specific object behavior: the closed set of built-in object kinds,
/// dispatched explicitly instead of through subclassing.
pub enum ExoticObject {
    /// Ordinary object
    Ordinary,
    /// Array: a dense sequence where `None` is a hole (implicitly created by
    /// growth and never explicitly written; distinct from stored Undefined)
    Array { elements: Vec<Option<JsValue>> },
    /// Function object (native or script)
    Function(JsFunction),
    /// Arguments pseudo-object: indices below the parameter count alias the
    /// named slots of its own store (a one-time copy at call entry)
    Arguments { params: Rc<[JsString]> },
    /// String wrapper boxing one string primitive
    StringWrapper(JsString),
    /// Number wrapper boxing one number primitive
    NumberWrapper(f64),
    /// Boolean wrapper boxing one boolean primitive
    BooleanWrapper(bool),
    /// Date: millis since epoch, or None for an invalid date (sticky until
    /// setTime)
    Date { instant: Option<i64> },
    /// Opaque host-bridge payload; property behavior stays ordinary
    Host(Rc<dyn std::any::Any>),
}

impl fmt::Debug for ExoticObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExoticObject::Ordinary => write!(f, "Ordinary"),
            ExoticObject::Array { elements } => write!(f, "Array[{}]", elements.len()),
            ExoticObject::Function(func) => write!(f, "{:?}", func),
            ExoticObject::Arguments { params } => write!(f, "Arguments[{}]", params.len()),
            ExoticObject::StringWrapper(s) => write!(f, "StringWrapper({:?})", s),
            ExoticObject::NumberWrapper(n) => write!(f, "NumberWrapper({})", n),
            ExoticObject::BooleanWrapper(b) => write!(f, "BooleanWrapper({})", b),
            ExoticObject::Date { instant } => write!(f, "Date({:?})", instant),
            ExoticObject::Host(_) => write!(f, "Host(..)"),
        }
    }
}

/// Function representation
#[derive(Clone)]
pub enum JsFunction {
    /// Host-implemented function
    Native(NativeFunction),
    /// Script-defined closure; the body is evaluated by the external
    /// statement evaluator through the ScriptBody callback
    Script(ScriptFunction),
}

impl JsFunction {
    pub fn name(&self) -> Option<&str> {
        match self {
            JsFunction::Native(f) => Some(f.name.as_str()),
            JsFunction::Script(f) => f.name.as_ref().map(|s| s.as_str()),
        }
    }

    /// Declared-parameter count (script) or fixed arity (native); exposed as
    /// the read-only `length` property.
    pub fn arity(&self) -> u32 {
        match self {
            JsFunction::Native(f) => f.arity,
            JsFunction::Script(f) => f.params.len() as u32,
        }
    }

    /// The innermost in-flight activation's Arguments object, or Null when
    /// the function is not executing.
    pub fn current_arguments(&self) -> JsValue {
        match self {
            JsFunction::Native(_) => JsValue::Null,
            JsFunction::Script(f) => f
                .activations
                .borrow()
                .last()
                .map(|a| JsValue::Object(a.cheap_clone()))
                .unwrap_or(JsValue::Null),
        }
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsFunction::Native(n) => write!(f, "JsFunction::Native({:?}, {})", n.name, n.arity),
            JsFunction::Script(s) => write!(f, "JsFunction::Script({:?})", s.name),
        }
    }
}

/// Native function signature
pub type NativeFn = fn(&mut Interpreter, JsValue, &[JsValue]) -> Result<JsValue, JsError>;

/// Native function wrapper.
///
/// `ctor` is the construct behavior for built-ins whose `new` semantics
/// differ from a plain call (Array, Date, the primitive wrappers).
#[derive(Clone)]
pub struct NativeFunction {
    pub name: JsString,
    pub func: NativeFn,
    pub ctor: Option<NativeFn>,
    pub arity: u32,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// The contract the external statement evaluator implements: evaluate a
/// parsed function body inside a prepared call frame.
pub trait ScriptBody {
    fn evaluate(
        &self,
        interp: &mut Interpreter,
        frame: &mut CallFrame,
    ) -> Result<Completion, JsError>;
}

impl<F> ScriptBody for F
where
    F: Fn(&mut Interpreter, &mut CallFrame) -> Result<Completion, JsError>,
{
    fn evaluate(
        &self,
        interp: &mut Interpreter,
        frame: &mut CallFrame,
    ) -> Result<Completion, JsError> {
        self(interp, frame)
    }
}

/// Script-defined function: parameter and local names, the shared parsed
/// body, and the captured scope chain.
#[derive(Clone)]
pub struct ScriptFunction {
    pub name: Option<JsString>,
    /// Declared parameter names
    pub params: Rc<[JsString]>,
    /// Declared local-variable names, bound to Undefined at call entry
    pub locals: Rc<[JsString]>,
    /// Non-owning view of the shared parsed body
    pub body: Rc<dyn ScriptBody>,
    /// Captured scope chain, innermost last
    pub scope: Vec<JsObjectRef>,
    /// Arguments objects of in-flight activations, innermost last. One per
    /// call; recursion pushes a fresh one.
    pub activations: Rc<RefCell<Vec<JsObjectRef>>>,
}
