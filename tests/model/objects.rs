//! Object model and prototype chain tests

use esrun::{JsValue, Runtime};

use super::{call_method, global_ctor};

#[test]
fn test_put_then_get() {
    let rt = Runtime::new();
    let obj = rt.new_object();
    rt.put_property(&obj, "x", JsValue::Number(1.0)).unwrap();
    assert_eq!(rt.get_property(&obj, "x"), JsValue::Number(1.0));
}

#[test]
fn test_absent_property_is_undefined() {
    let rt = Runtime::new();
    let obj = rt.new_object();
    assert_eq!(rt.get_property(&obj, "nothing"), JsValue::Undefined);
}

#[test]
fn test_prototype_delegation_through_constructed_objects() {
    let rt = Runtime::new();

    // Methods on Object.prototype are visible on every plain object
    let obj = rt.new_object();
    assert!(rt.get_property(&obj, "toString").is_callable());
    assert!(rt.get_property(&obj, "hasOwnProperty").is_callable());

    // ...but are not own properties
    let result = call_method(&rt, &obj, "hasOwnProperty", &[JsValue::from("toString")]).unwrap();
    assert_eq!(result, JsValue::Boolean(false));
}

#[test]
fn test_writes_never_touch_the_prototype() {
    let rt = Runtime::new();
    let proto = rt.new_object();
    rt.put_property(&proto, "kind", JsValue::from("base")).unwrap();

    let obj = rt.new_object();
    obj.borrow_mut().prototype = Some(proto.clone());

    assert_eq!(rt.get_property(&obj, "kind"), JsValue::from("base"));
    rt.put_property(&obj, "kind", JsValue::from("derived")).unwrap();
    assert_eq!(rt.get_property(&obj, "kind"), JsValue::from("derived"));
    // prototype unchanged
    assert_eq!(rt.get_property(&proto, "kind"), JsValue::from("base"));

    // deleting the shadow re-exposes the prototype value
    assert!(rt.delete_property(&obj, "kind"));
    assert_eq!(rt.get_property(&obj, "kind"), JsValue::from("base"));
}

#[test]
fn test_delete_only_touches_receiver() {
    let rt = Runtime::new();
    let proto = rt.new_object();
    rt.put_property(&proto, "p", JsValue::Number(1.0)).unwrap();
    let obj = rt.new_object();
    obj.borrow_mut().prototype = Some(proto.clone());

    // deleting an inherited name succeeds without touching the prototype
    assert!(rt.delete_property(&obj, "p"));
    assert_eq!(rt.get_property(&proto, "p"), JsValue::Number(1.0));
    assert!(rt.has_property(&obj, "p"));
}

#[test]
fn test_enumerate_insertion_order_and_shadowing() {
    let rt = Runtime::new();
    let proto = rt.new_object();
    rt.put_property(&proto, "a", JsValue::Number(1.0)).unwrap();
    rt.put_property(&proto, "c", JsValue::Number(3.0)).unwrap();

    let obj = rt.new_object();
    obj.borrow_mut().prototype = Some(proto);
    rt.put_property(&obj, "b", JsValue::Number(2.0)).unwrap();
    rt.put_property(&obj, "a", JsValue::Number(9.0)).unwrap();

    // own names first in insertion order, then unshadowed prototype names
    assert_eq!(rt.enumerate(&obj), vec!["b", "a", "c"]);
}

#[test]
fn test_object_to_string_uses_class_tag() {
    let rt = Runtime::new();
    let obj = rt.new_object();
    let s = call_method(&rt, &obj, "toString", &[]).unwrap();
    assert_eq!(s, JsValue::from("[object Object]"));

    let arr = rt.new_array(vec![]);
    let to_string = {
        let ctor = super::as_object(global_ctor(&rt, "Object"));
        let proto = super::as_object(rt.get_property(&ctor, "prototype"));
        rt.get_property(&proto, "toString")
    };
    let s = rt.call(to_string, JsValue::Object(arr), &[]).unwrap();
    assert_eq!(s, JsValue::from("[object Array]"));
}

#[test]
fn test_object_constructor_wraps_primitives() {
    let rt = Runtime::new();
    let object_ctor = global_ctor(&rt, "Object");
    let wrapped = rt.construct(object_ctor, &[JsValue::from("abc")]).unwrap();
    // a String wrapper: length is the code-unit count, read-only
    assert_eq!(rt.get_property(&wrapped, "length"), JsValue::Number(3.0));
    rt.put_property(&wrapped, "length", JsValue::Number(0.0)).unwrap();
    assert_eq!(rt.get_property(&wrapped, "length"), JsValue::Number(3.0));
}

#[test]
fn test_constructor_back_links() {
    let rt = Runtime::new();
    let array_ctor = global_ctor(&rt, "Array");
    let ctor = super::as_object(array_ctor.clone());
    let proto = super::as_object(rt.get_property(&ctor, "prototype"));
    let back = rt.get_property(&proto, "constructor");
    assert!(back.strict_equals(&array_ctor));
}

#[test]
fn test_global_constants() {
    let rt = Runtime::new();
    let global = rt.global();
    assert!(matches!(rt.get_property(&global, "NaN"), JsValue::Number(n) if n.is_nan()));
    assert_eq!(
        rt.get_property(&global, "Infinity"),
        JsValue::Number(f64::INFINITY)
    );
    assert_eq!(rt.get_property(&global, "undefined"), JsValue::Undefined);
    // built-ins are installed hidden: the global enumerates as empty
    assert!(rt.enumerate(&global).is_empty());
}
