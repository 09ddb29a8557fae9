//! Date wrapper tests: instant boxing, calendar accessors, NaN stickiness

use esrun::{JsError, JsValue, Runtime};

use super::{as_object, call_method, global_ctor};

// 2000-03-15T12:30:45.250Z, a Wednesday
const SAMPLE_MS: i64 = 953123445250;

#[test]
fn test_get_time_and_value_of() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(SAMPLE_MS));
    assert_eq!(
        call_method(&rt, &date, "getTime", &[]).unwrap(),
        JsValue::Number(SAMPLE_MS as f64)
    );
    assert_eq!(
        call_method(&rt, &date, "valueOf", &[]).unwrap(),
        JsValue::Number(SAMPLE_MS as f64)
    );
}

#[test]
fn test_utc_getters() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(SAMPLE_MS));
    assert_eq!(
        call_method(&rt, &date, "getUTCFullYear", &[]).unwrap(),
        JsValue::Number(2000.0)
    );
    // months are 0-based
    assert_eq!(
        call_method(&rt, &date, "getUTCMonth", &[]).unwrap(),
        JsValue::Number(2.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getUTCDate", &[]).unwrap(),
        JsValue::Number(15.0)
    );
    // days renumber to 0-based Sunday; 2000-03-15 was a Wednesday
    assert_eq!(
        call_method(&rt, &date, "getUTCDay", &[]).unwrap(),
        JsValue::Number(3.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getUTCHours", &[]).unwrap(),
        JsValue::Number(12.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getUTCMinutes", &[]).unwrap(),
        JsValue::Number(30.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getUTCSeconds", &[]).unwrap(),
        JsValue::Number(45.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getUTCMilliseconds", &[]).unwrap(),
        JsValue::Number(250.0)
    );
}

#[test]
fn test_local_getters_are_self_consistent() {
    let rt = Runtime::new();
    // construct from local components, read back local components; this is
    // independent of the host's zone
    let date_ctor = global_ctor(&rt, "Date");
    let date = rt
        .construct(
            date_ctor,
            &[
                JsValue::Number(1999.0),
                JsValue::Number(11.0),
                JsValue::Number(31.0),
                JsValue::Number(23.0),
                JsValue::Number(59.0),
            ],
        )
        .unwrap();
    assert_eq!(
        call_method(&rt, &date, "getFullYear", &[]).unwrap(),
        JsValue::Number(1999.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getMonth", &[]).unwrap(),
        JsValue::Number(11.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getDate", &[]).unwrap(),
        JsValue::Number(31.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getHours", &[]).unwrap(),
        JsValue::Number(23.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getMinutes", &[]).unwrap(),
        JsValue::Number(59.0)
    );
    // getYear is the legacy 1900-based getter
    assert_eq!(
        call_method(&rt, &date, "getYear", &[]).unwrap(),
        JsValue::Number(99.0)
    );
}

#[test]
fn test_date_utc_static() {
    let rt = Runtime::new();
    let date_ctor = as_object(global_ctor(&rt, "Date"));
    let utc = rt.get_property(&date_ctor, "UTC");
    let ms = rt
        .call(
            utc,
            JsValue::Undefined,
            &[JsValue::Number(2000.0), JsValue::Number(0.0), JsValue::Number(1.0)],
        )
        .unwrap();
    assert_eq!(ms, JsValue::Number(946684800000.0));
}

#[test]
fn test_date_parse_static() {
    let rt = Runtime::new();
    let date_ctor = as_object(global_ctor(&rt, "Date"));
    let parse = rt.get_property(&date_ctor, "parse");
    let ms = rt
        .call(parse, JsValue::Undefined, &[JsValue::from("1970-01-01")])
        .unwrap();
    assert_eq!(ms, JsValue::Number(0.0));

    let parse = rt.get_property(&date_ctor, "parse");
    let ms = rt
        .call(
            parse,
            JsValue::Undefined,
            &[JsValue::from("2000-01-01T00:00:00Z")],
        )
        .unwrap();
    assert_eq!(ms, JsValue::Number(946684800000.0));

    let parse = rt.get_property(&date_ctor, "parse");
    let ms = rt
        .call(parse, JsValue::Undefined, &[JsValue::from("garbage")])
        .unwrap();
    assert!(matches!(ms, JsValue::Number(n) if n.is_nan()));
}

#[test]
fn test_constructor_from_millis_and_string() {
    let rt = Runtime::new();
    let date_ctor = global_ctor(&rt, "Date");
    let date = rt
        .construct(date_ctor.clone(), &[JsValue::Number(0.0)])
        .unwrap();
    assert_eq!(
        call_method(&rt, &date, "getUTCFullYear", &[]).unwrap(),
        JsValue::Number(1970.0)
    );

    let date = rt
        .construct(date_ctor, &[JsValue::from("2000-01-01T00:00:00Z")])
        .unwrap();
    assert_eq!(
        call_method(&rt, &date, "getTime", &[]).unwrap(),
        JsValue::Number(946684800000.0)
    );
}

#[test]
fn test_utc_setters() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(0));
    call_method(&rt, &date, "setUTCFullYear", &[JsValue::Number(2000.0)]).unwrap();
    assert_eq!(
        call_method(&rt, &date, "getUTCFullYear", &[]).unwrap(),
        JsValue::Number(2000.0)
    );
    // the other fields were preserved
    assert_eq!(
        call_method(&rt, &date, "getUTCMonth", &[]).unwrap(),
        JsValue::Number(0.0)
    );

    call_method(
        &rt,
        &date,
        "setUTCHours",
        &[JsValue::Number(6.0), JsValue::Number(30.0)],
    )
    .unwrap();
    assert_eq!(
        call_method(&rt, &date, "getUTCHours", &[]).unwrap(),
        JsValue::Number(6.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getUTCMinutes", &[]).unwrap(),
        JsValue::Number(30.0)
    );
}

#[test]
fn test_setter_month_overflow_rolls_over() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(0)); // 1970-01-01T00:00:00Z
    // month 12 is January of the following year
    call_method(&rt, &date, "setUTCMonth", &[JsValue::Number(12.0)]).unwrap();
    assert_eq!(
        call_method(&rt, &date, "getUTCFullYear", &[]).unwrap(),
        JsValue::Number(1971.0)
    );
    assert_eq!(
        call_method(&rt, &date, "getUTCMonth", &[]).unwrap(),
        JsValue::Number(0.0)
    );
}

#[test]
fn test_nan_component_invalidates_whole_date() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(SAMPLE_MS));

    let result = call_method(&rt, &date, "setMonth", &[JsValue::Number(f64::NAN)]).unwrap();
    assert!(matches!(result, JsValue::Number(n) if n.is_nan()));

    // every accessor now reports NaN - no partial application happened
    for getter in ["getTime", "getUTCFullYear", "getMonth", "getUTCHours"] {
        let v = call_method(&rt, &date, getter, &[]).unwrap();
        assert!(matches!(v, JsValue::Number(n) if n.is_nan()), "{}", getter);
    }

    // further setters keep it invalid
    call_method(&rt, &date, "setUTCDate", &[JsValue::Number(5.0)]).unwrap();
    let v = call_method(&rt, &date, "getTime", &[]).unwrap();
    assert!(matches!(v, JsValue::Number(n) if n.is_nan()));

    // only setTime with a finite number revives it
    call_method(&rt, &date, "setTime", &[JsValue::Number(1000.0)]).unwrap();
    assert_eq!(
        call_method(&rt, &date, "getTime", &[]).unwrap(),
        JsValue::Number(1000.0)
    );
}

#[test]
fn test_set_year_two_digit_mapping() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(0));
    call_method(&rt, &date, "setYear", &[JsValue::Number(99.0)]).unwrap();
    assert_eq!(
        call_method(&rt, &date, "getFullYear", &[]).unwrap(),
        JsValue::Number(1999.0)
    );

    call_method(&rt, &date, "setYear", &[JsValue::Number(2024.0)]).unwrap();
    assert_eq!(
        call_method(&rt, &date, "getFullYear", &[]).unwrap(),
        JsValue::Number(2024.0)
    );
}

#[test]
fn test_invalid_date_rendering() {
    let rt = Runtime::new();
    let date = rt.new_date(None);
    assert_eq!(
        call_method(&rt, &date, "toString", &[]).unwrap(),
        JsValue::from("Invalid Date")
    );
    // toISOString refuses instead of rendering a placeholder
    let err = call_method(&rt, &date, "toISOString", &[]).unwrap_err();
    assert!(matches!(err, JsError::RangeError { .. }));
}

#[test]
fn test_iso_string_formatting() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(SAMPLE_MS));
    assert_eq!(
        call_method(&rt, &date, "toISOString", &[]).unwrap(),
        JsValue::from("2000-03-15T12:30:45.250Z")
    );
}

#[test]
fn test_utc_string_formatting() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(946684800000));
    assert_eq!(
        call_method(&rt, &date, "toUTCString", &[]).unwrap(),
        JsValue::from("Sat, 01 Jan 2000 00:00:00 GMT")
    );
}

#[test]
fn test_date_coerces_through_value_of() {
    let rt = Runtime::new();
    let date = rt.new_date(Some(1234));
    // the conversion protocol reaches valueOf on Date.prototype
    assert_eq!(rt.to_number(&JsValue::Object(date)).unwrap(), 1234.0);
}

#[test]
fn test_locale_formatters_render_local_fields() {
    let rt = Runtime::new();
    let date_ctor = global_ctor(&rt, "Date");
    // construct from local components so the rendering is zone-independent
    let date = rt
        .construct(
            date_ctor,
            &[
                JsValue::Number(2001.0),
                JsValue::Number(5.0),
                JsValue::Number(9.0),
                JsValue::Number(7.0),
                JsValue::Number(8.0),
                JsValue::Number(9.0),
            ],
        )
        .unwrap();
    assert_eq!(
        call_method(&rt, &date, "toLocaleDateString", &[]).unwrap(),
        JsValue::from("06/09/2001")
    );
    assert_eq!(
        call_method(&rt, &date, "toLocaleTimeString", &[]).unwrap(),
        JsValue::from("07:08:09")
    );
}

#[test]
fn test_timezone_offset_of_invalid_date() {
    let rt = Runtime::new();
    let date = rt.new_date(None);
    let v = call_method(&rt, &date, "getTimezoneOffset", &[]).unwrap();
    assert!(matches!(v, JsValue::Number(n) if n.is_nan()));
}
