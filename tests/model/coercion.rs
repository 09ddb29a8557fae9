//! Conversion protocol tests: ToPrimitive ordering, the total conversions,
//! and the wrapper objects

use esrun::{Interpreter, JsError, JsString, JsValue, PrimitiveHint, Runtime};

use super::{as_object, call_method, global_ctor};

#[test]
fn test_to_boolean_table() {
    let rt = Runtime::new();
    assert!(!rt.to_boolean(&JsValue::Undefined));
    assert!(!rt.to_boolean(&JsValue::Null));
    assert!(!rt.to_boolean(&JsValue::Number(0.0)));
    assert!(!rt.to_boolean(&JsValue::Number(f64::NAN)));
    assert!(!rt.to_boolean(&JsValue::from("")));
    assert!(rt.to_boolean(&JsValue::Number(-1.0)));
    assert!(rt.to_boolean(&JsValue::from("0")));
    // every object is truthy, including a Boolean wrapper holding false
    let wrapper = rt.new_boolean(false);
    assert!(rt.to_boolean(&JsValue::Object(wrapper)));
}

#[test]
fn test_number_string_round_trip() {
    let rt = Runtime::new();
    for n in [0.0, 1.0, -7.0, 0.5, 1e15, -123456.789, 3.1] {
        let s = rt.to_string_value(&JsValue::Number(n)).unwrap();
        let back = rt.to_number(&JsValue::String(s)).unwrap();
        assert_eq!(back, n);
    }
}

#[test]
fn test_integral_doubles_render_without_decimal_point() {
    let rt = Runtime::new();
    let s = rt.to_string_value(&JsValue::Number(3.0)).unwrap();
    assert_eq!(s.as_str(), "3");
    let s = rt.to_string_value(&JsValue::Number(-41.0)).unwrap();
    assert_eq!(s.as_str(), "-41");
    let s = rt.to_string_value(&JsValue::Number(2.5)).unwrap();
    assert_eq!(s.as_str(), "2.5");
}

#[test]
fn test_string_to_number_whitespace_and_infinity() {
    let rt = Runtime::new();
    assert_eq!(rt.to_number(&JsValue::from("  42 ")).unwrap(), 42.0);
    assert_eq!(rt.to_number(&JsValue::from("")).unwrap(), 0.0);
    assert_eq!(
        rt.to_number(&JsValue::from("Infinity")).unwrap(),
        f64::INFINITY
    );
    assert!(rt.to_number(&JsValue::from("12abc")).unwrap().is_nan());
}

fn value_of_seven(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(7.0))
}

fn to_string_marker(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::from("marker"))
}

#[test]
fn test_to_primitive_hint_ordering() {
    let rt = Runtime::new();
    let obj = rt.new_object();
    let value_of = rt.new_native_function("valueOf", value_of_seven, 0);
    let to_string = rt.new_native_function("toString", to_string_marker, 0);
    rt.put_property(&obj, "valueOf", JsValue::Object(value_of)).unwrap();
    rt.put_property(&obj, "toString", JsValue::Object(to_string)).unwrap();

    // Number hint (the default) tries valueOf first
    let prim = rt
        .to_primitive(&JsValue::Object(obj.clone()), PrimitiveHint::Number)
        .unwrap();
    assert_eq!(prim, JsValue::Number(7.0));

    // String hint tries toString first
    let prim = rt
        .to_primitive(&JsValue::Object(obj), PrimitiveHint::String)
        .unwrap();
    assert_eq!(prim, JsValue::from("marker"));
}

fn returns_an_object(
    interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Object(interp.create_object()))
}

#[test]
fn test_to_primitive_skips_non_primitive_results() {
    let rt = Runtime::new();
    let obj = rt.new_object();
    let value_of = rt.new_native_function("valueOf", returns_an_object, 0);
    rt.put_property(&obj, "valueOf", JsValue::Object(value_of)).unwrap();
    // valueOf yields an object, so the default Object.prototype.toString wins
    let prim = rt
        .to_primitive(&JsValue::Object(obj), PrimitiveHint::Number)
        .unwrap();
    assert_eq!(prim, JsValue::from("[object Object]"));
}

#[test]
fn test_no_default_value_is_type_error() {
    let rt = Runtime::new();
    let bare = esrun::JsObject::new().into_ref();
    let err = rt
        .to_primitive(&JsValue::Object(bare), PrimitiveHint::Number)
        .unwrap_err();
    assert!(matches!(err, JsError::TypeError { .. }));
}

#[test]
fn test_number_wrapper_coerces_through_value_of() {
    let rt = Runtime::new();
    let wrapper = rt.new_number(6.5);
    assert_eq!(rt.to_number(&JsValue::Object(wrapper)).unwrap(), 6.5);

    let wrapper = rt.new_string("12");
    assert_eq!(rt.to_number(&JsValue::Object(wrapper)).unwrap(), 12.0);
}

#[test]
fn test_wrapper_constructors_coerce_when_called() {
    let rt = Runtime::new();
    let string_ctor = global_ctor(&rt, "String");
    let result = rt
        .call(string_ctor, JsValue::Undefined, &[JsValue::Number(5.0)])
        .unwrap();
    assert_eq!(result, JsValue::from("5"));

    let number_ctor = global_ctor(&rt, "Number");
    let result = rt
        .call(number_ctor, JsValue::Undefined, &[JsValue::from("1e2")])
        .unwrap();
    assert_eq!(result, JsValue::Number(100.0));

    let boolean_ctor = global_ctor(&rt, "Boolean");
    let result = rt
        .call(boolean_ctor, JsValue::Undefined, &[JsValue::from("x")])
        .unwrap();
    assert_eq!(result, JsValue::Boolean(true));
}

#[test]
fn test_wrapper_constructors_box_when_constructed() {
    let rt = Runtime::new();
    let number_ctor = global_ctor(&rt, "Number");
    let wrapper = rt.construct(number_ctor, &[JsValue::from("8")]).unwrap();
    let value_of = call_method(&rt, &wrapper, "valueOf", &[]).unwrap();
    assert_eq!(value_of, JsValue::Number(8.0));
}

#[test]
fn test_string_methods() {
    let rt = Runtime::new();
    let s = rt.new_string("Hello World");

    assert_eq!(
        call_method(&rt, &s, "charAt", &[JsValue::Number(1.0)]).unwrap(),
        JsValue::from("e")
    );
    assert_eq!(
        call_method(&rt, &s, "charCodeAt", &[JsValue::Number(0.0)]).unwrap(),
        JsValue::Number(72.0)
    );
    assert!(matches!(
        call_method(&rt, &s, "charCodeAt", &[JsValue::Number(99.0)]).unwrap(),
        JsValue::Number(n) if n.is_nan()
    ));
    assert_eq!(
        call_method(&rt, &s, "indexOf", &[JsValue::from("o")]).unwrap(),
        JsValue::Number(4.0)
    );
    assert_eq!(
        call_method(&rt, &s, "lastIndexOf", &[JsValue::from("o")]).unwrap(),
        JsValue::Number(7.0)
    );
    assert_eq!(
        call_method(
            &rt,
            &s,
            "substring",
            &[JsValue::Number(6.0), JsValue::Number(11.0)]
        )
        .unwrap(),
        JsValue::from("World")
    );
    // substring swaps reversed bounds
    assert_eq!(
        call_method(
            &rt,
            &s,
            "substring",
            &[JsValue::Number(11.0), JsValue::Number(6.0)]
        )
        .unwrap(),
        JsValue::from("World")
    );
    assert_eq!(
        call_method(&rt, &s, "toUpperCase", &[]).unwrap(),
        JsValue::from("HELLO WORLD")
    );
}

#[test]
fn test_string_split() {
    let rt = Runtime::new();
    let s = rt.new_string("a,b,c");
    let parts = as_object(call_method(&rt, &s, "split", &[JsValue::from(",")]).unwrap());
    assert_eq!(rt.get_property(&parts, "length"), JsValue::Number(3.0));
    assert_eq!(rt.get_property(&parts, "2"), JsValue::from("c"));

    // no separator: the whole string as a single element
    let parts = as_object(call_method(&rt, &s, "split", &[]).unwrap());
    assert_eq!(rt.get_property(&parts, "length"), JsValue::Number(1.0));
}

#[test]
fn test_global_parse_functions() {
    let rt = Runtime::new();
    let result = rt
        .call_function("parseFloat", &serde_json::json!(["3.5abc"]))
        .unwrap();
    assert_eq!(result, JsValue::Number(3.5));

    let result = rt
        .call_function("isNaN", &serde_json::json!(["not a number"]))
        .unwrap();
    assert_eq!(result, JsValue::Boolean(true));

    let result = rt
        .call_function("isFinite", &serde_json::json!([1.0]))
        .unwrap();
    assert_eq!(result, JsValue::Boolean(true));
}

#[test]
fn test_escape_and_unescape() {
    let rt = Runtime::new();
    let result = rt
        .call_function("escape", &serde_json::json!(["a b&c"]))
        .unwrap();
    assert_eq!(result, JsValue::from("a%20b%26c"));

    let result = rt
        .call_function("unescape", &serde_json::json!(["a%20b%26c"]))
        .unwrap();
    assert_eq!(result, JsValue::from("a b&c"));

    // non-Latin-1 code units round-trip through the %uXXXX form
    let result = rt
        .call_function("escape", &serde_json::json!(["\u{263a}"]))
        .unwrap();
    assert_eq!(result, JsValue::from("%u263A"));
    let result = rt
        .call_function("unescape", &serde_json::json!(["%u263A"]))
        .unwrap();
    assert_eq!(result, JsValue::from("\u{263a}"));
}

#[test]
fn test_fixed_width_conversions_are_total() {
    assert_eq!(JsValue::from("12.9").to_int32(), 12);
    assert_eq!(JsValue::Undefined.to_int32(), 0);
    assert_eq!(JsValue::Number(f64::NAN).to_uint32(), 0);
    assert_eq!(JsValue::from("257").to_uint16(), 257);
    let s = JsString::from("257");
    assert_eq!(JsValue::String(s).to_uint32(), 257);
}
