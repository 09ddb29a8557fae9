//! Date built-in methods
//!
//! A date object boxes `Option<i64>` millis since epoch; `None` is the
//! invalid date, sticky until setTime. "Local" accessors go through the
//! host's default time zone, "UTC" ones through the fixed UTC calendar.

use chrono::{DateTime, Datelike, Local, LocalResult, TimeZone, Timelike, Utc};

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, ExoticObject, JsObjectRef, JsValue};

use super::link_constructor;

pub fn init_date_prototype(interp: &mut Interpreter) {
    let proto = interp.date_prototype.cheap_clone();

    interp.register_method(&proto, "getTime", date_get_time, 0);
    interp.register_method(&proto, "valueOf", date_get_time, 0); // valueOf = getTime

    // Local getters
    interp.register_method(&proto, "getFullYear", date_get_full_year, 0);
    interp.register_method(&proto, "getYear", date_get_year, 0);
    interp.register_method(&proto, "getMonth", date_get_month, 0);
    interp.register_method(&proto, "getDate", date_get_date, 0);
    interp.register_method(&proto, "getDay", date_get_day, 0);
    interp.register_method(&proto, "getHours", date_get_hours, 0);
    interp.register_method(&proto, "getMinutes", date_get_minutes, 0);
    interp.register_method(&proto, "getSeconds", date_get_seconds, 0);
    interp.register_method(&proto, "getMilliseconds", date_get_milliseconds, 0);
    interp.register_method(&proto, "getTimezoneOffset", date_get_timezone_offset, 0);

    // UTC getters
    interp.register_method(&proto, "getUTCFullYear", date_get_utc_full_year, 0);
    interp.register_method(&proto, "getUTCMonth", date_get_utc_month, 0);
    interp.register_method(&proto, "getUTCDate", date_get_utc_date, 0);
    interp.register_method(&proto, "getUTCDay", date_get_utc_day, 0);
    interp.register_method(&proto, "getUTCHours", date_get_utc_hours, 0);
    interp.register_method(&proto, "getUTCMinutes", date_get_utc_minutes, 0);
    interp.register_method(&proto, "getUTCSeconds", date_get_utc_seconds, 0);
    interp.register_method(&proto, "getUTCMilliseconds", date_get_utc_milliseconds, 0);

    // Setters
    interp.register_method(&proto, "setTime", date_set_time, 1);
    interp.register_method(&proto, "setMilliseconds", date_set_milliseconds, 1);
    interp.register_method(&proto, "setSeconds", date_set_seconds, 2);
    interp.register_method(&proto, "setMinutes", date_set_minutes, 3);
    interp.register_method(&proto, "setHours", date_set_hours, 4);
    interp.register_method(&proto, "setDate", date_set_date, 1);
    interp.register_method(&proto, "setMonth", date_set_month, 2);
    interp.register_method(&proto, "setFullYear", date_set_full_year, 3);
    interp.register_method(&proto, "setYear", date_set_year, 1);

    // UTC setters
    interp.register_method(&proto, "setUTCMilliseconds", date_set_utc_milliseconds, 1);
    interp.register_method(&proto, "setUTCSeconds", date_set_utc_seconds, 2);
    interp.register_method(&proto, "setUTCMinutes", date_set_utc_minutes, 3);
    interp.register_method(&proto, "setUTCHours", date_set_utc_hours, 4);
    interp.register_method(&proto, "setUTCDate", date_set_utc_date, 1);
    interp.register_method(&proto, "setUTCMonth", date_set_utc_month, 2);
    interp.register_method(&proto, "setUTCFullYear", date_set_utc_full_year, 3);

    // Conversion methods
    interp.register_method(&proto, "toString", date_to_string, 0);
    interp.register_method(&proto, "toDateString", date_to_date_string, 0);
    interp.register_method(&proto, "toTimeString", date_to_time_string, 0);
    interp.register_method(&proto, "toUTCString", date_to_utc_string, 0);
    interp.register_method(&proto, "toISOString", date_to_iso_string, 0);
    interp.register_method(&proto, "toLocaleString", date_to_locale_string, 0);
    interp.register_method(&proto, "toLocaleDateString", date_to_locale_date_string, 0);
    interp.register_method(&proto, "toLocaleTimeString", date_to_locale_time_string, 0);
}

/// Create the Date constructor with its static methods (now, UTC, parse).
pub fn create_date_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor = interp.create_native_constructor("Date", date_call, date_construct, 7);
    interp.register_method(&ctor, "now", date_now, 0);
    interp.register_method(&ctor, "UTC", date_utc, 7);
    interp.register_method(&ctor, "parse", date_parse, 1);
    let proto = interp.date_prototype.cheap_clone();
    link_constructor(interp, &ctor, &proto);
    ctor
}

// ═══════════════════════════════════════════════════════════════════════════
// Calendar plumbing
// ═══════════════════════════════════════════════════════════════════════════

/// Calendar fields of one instant, month 0-based.
struct DateParts {
    year: i32,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    milli: i64,
}

impl DateParts {
    fn set_field(&mut self, field: usize, v: f64) {
        let v = v.trunc();
        match field {
            0 => self.year = v as i32,
            1 => self.month = v as i64,
            2 => self.day = v as i64,
            3 => self.hour = v as i64,
            4 => self.minute = v as i64,
            5 => self.second = v as i64,
            _ => self.milli = v as i64,
        }
    }
}

fn utc_dt(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
}

fn local_dt(ms: i64) -> DateTime<Local> {
    utc_dt(ms).with_timezone(&Local)
}

fn parts_of<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateParts {
    DateParts {
        year: dt.year(),
        month: dt.month0() as i64,
        day: dt.day() as i64,
        hour: dt.hour() as i64,
        minute: dt.minute() as i64,
        second: dt.second() as i64,
        milli: dt.timestamp_subsec_millis() as i64,
    }
}

/// Rebuild an instant from calendar fields in the given zone, normalizing
/// month overflow (month 12 is January of the next year) and letting the
/// remaining fields carry over as plain milliseconds.
fn instant_from_parts<Tz: TimeZone>(tz: &Tz, parts: &DateParts) -> Option<i64> {
    let total_months = (parts.year as i64).checked_mul(12)?.checked_add(parts.month)?;
    let year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let month = (total_months.rem_euclid(12) + 1) as u32;

    let base = match tz.with_ymd_and_hms(year, month, 1, 0, 0, 0) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => return None,
    };
    // Checked arithmetic: absurd field values give the invalid date rather
    // than wrapping
    let offset = (parts.day - 1)
        .checked_mul(86_400_000)?
        .checked_add(parts.hour.checked_mul(3_600_000)?)?
        .checked_add(parts.minute.checked_mul(60_000)?)?
        .checked_add(parts.second.checked_mul(1_000)?)?
        .checked_add(parts.milli)?;
    base.timestamp_millis().checked_add(offset)
}

/// Parse a date string in the formats scripts commonly produce, returning
/// millis or NaN.
fn parse_date_string(s: &str) -> f64 {
    // RFC3339 with timezone, e.g. "2024-12-25T10:30:00Z"
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis() as f64;
    }
    // ISO 8601 without timezone - treated as UTC
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return dt.and_utc().timestamp_millis() as f64;
    }
    // ISO 8601 with fractional seconds but no timezone
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.and_utc().timestamp_millis() as f64;
    }
    // Date only - midnight UTC
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis() as f64)
            .unwrap_or(f64::NAN);
    }
    f64::NAN
}

fn this_date_instant(this: &JsValue) -> Result<Option<i64>, JsError> {
    let JsValue::Object(obj) = this else {
        return Err(JsError::type_error("this is not a Date"));
    };
    let obj_ref = obj.borrow();
    if let ExoticObject::Date { instant } = obj_ref.exotic {
        Ok(instant)
    } else {
        Err(JsError::type_error("this is not a Date"))
    }
}

fn write_instant(this: &JsValue, new_instant: Option<i64>) -> Result<(), JsError> {
    let JsValue::Object(obj) = this else {
        return Err(JsError::type_error("this is not a Date"));
    };
    let mut obj_ref = obj.borrow_mut();
    if let ExoticObject::Date { ref mut instant } = obj_ref.exotic {
        *instant = new_instant;
        Ok(())
    } else {
        Err(JsError::type_error("this is not a Date"))
    }
}

fn instant_to_number(instant: Option<i64>) -> JsValue {
    JsValue::Number(instant.map(|ms| ms as f64).unwrap_or(f64::NAN))
}

/// Two-digit years select the 1900s.
fn adjust_year(year: f64) -> f64 {
    if (0.0..100.0).contains(&year) {
        year + 1900.0
    } else {
        year
    }
}

/// Instant from constructor-style component arguments (year, month, day?,
/// hours?, minutes?, seconds?, ms?). Any NaN component gives the invalid
/// date.
fn components_instant<Tz: TimeZone>(
    interp: &mut Interpreter,
    args: &[JsValue],
    tz: &Tz,
) -> Result<Option<i64>, JsError> {
    let mut fields: [f64; 7] = [f64::NAN, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
    for (i, slot) in fields.iter_mut().enumerate() {
        if let Some(arg) = args.get(i) {
            *slot = interp.to_number_value(arg)?;
        }
    }
    if fields.iter().any(|f| f.is_nan() || f.is_infinite()) {
        return Ok(None);
    }
    fields[0] = adjust_year(fields[0].trunc());

    let mut parts = DateParts {
        year: 0,
        month: 0,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        milli: 0,
    };
    for (i, f) in fields.iter().enumerate() {
        parts.set_field(i, *f);
    }
    Ok(instant_from_parts(tz, &parts))
}

// ═══════════════════════════════════════════════════════════════════════════
// Constructor and statics
// ═══════════════════════════════════════════════════════════════════════════

/// Date called as a function renders the current time as a string.
pub fn date_call(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let now = Local::now();
    Ok(JsValue::from(
        now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
    ))
}

pub fn date_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let instant: Option<i64> = if args.is_empty() {
        Some(Utc::now().timestamp_millis())
    } else if args.len() == 1 {
        let ms = match args.first() {
            Some(JsValue::String(s)) => parse_date_string(s.as_str()),
            Some(v) => interp.to_number_value(v)?,
            None => f64::NAN,
        };
        if ms.is_finite() {
            Some(ms as i64)
        } else {
            None
        }
    } else {
        // Multi-argument form is interpreted in the host's local zone
        components_instant(interp, args, &Local)?
    };
    Ok(JsValue::Object(interp.create_date_object(instant)))
}

pub fn date_now(
    _interp: &mut Interpreter,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(Utc::now().timestamp_millis() as f64))
}

pub fn date_utc(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let instant = components_instant(interp, args, &Utc)?;
    Ok(instant_to_number(instant))
}

pub fn date_parse(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let s = match args.first() {
        Some(v) => interp.to_string_value(v)?,
        None => return Ok(JsValue::Number(f64::NAN)),
    };
    Ok(JsValue::Number(parse_date_string(s.as_str())))
}

// ═══════════════════════════════════════════════════════════════════════════
// Getters
// ═══════════════════════════════════════════════════════════════════════════

pub fn date_get_time(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(instant_to_number(this_date_instant(&this)?))
}

macro_rules! date_getter {
    ($name:ident, $zone:ident, $extract:expr) => {
        pub fn $name(
            _interp: &mut Interpreter,
            this: JsValue,
            _args: &[JsValue],
        ) -> Result<JsValue, JsError> {
            let Some(ms) = this_date_instant(&this)? else {
                return Ok(JsValue::Number(f64::NAN));
            };
            let dt = $zone(ms);
            let extract = $extract;
            Ok(JsValue::Number(extract(&dt)))
        }
    };
}

date_getter!(date_get_full_year, local_dt, |dt: &DateTime<Local>| dt.year() as f64);
date_getter!(date_get_year, local_dt, |dt: &DateTime<Local>| (dt.year() - 1900) as f64);
date_getter!(date_get_month, local_dt, |dt: &DateTime<Local>| dt.month0() as f64);
date_getter!(date_get_date, local_dt, |dt: &DateTime<Local>| dt.day() as f64);
// chrono numbers Sunday 1-based through weekday(); renumber to 0-based
date_getter!(date_get_day, local_dt, |dt: &DateTime<Local>| dt
    .weekday()
    .num_days_from_sunday() as f64);
date_getter!(date_get_hours, local_dt, |dt: &DateTime<Local>| dt.hour() as f64);
date_getter!(date_get_minutes, local_dt, |dt: &DateTime<Local>| dt.minute() as f64);
date_getter!(date_get_seconds, local_dt, |dt: &DateTime<Local>| dt.second() as f64);
date_getter!(date_get_milliseconds, local_dt, |dt: &DateTime<Local>| dt
    .timestamp_subsec_millis() as f64);

date_getter!(date_get_utc_full_year, utc_dt, |dt: &DateTime<Utc>| dt.year() as f64);
date_getter!(date_get_utc_month, utc_dt, |dt: &DateTime<Utc>| dt.month0() as f64);
date_getter!(date_get_utc_date, utc_dt, |dt: &DateTime<Utc>| dt.day() as f64);
date_getter!(date_get_utc_day, utc_dt, |dt: &DateTime<Utc>| dt
    .weekday()
    .num_days_from_sunday() as f64);
date_getter!(date_get_utc_hours, utc_dt, |dt: &DateTime<Utc>| dt.hour() as f64);
date_getter!(date_get_utc_minutes, utc_dt, |dt: &DateTime<Utc>| dt.minute() as f64);
date_getter!(date_get_utc_seconds, utc_dt, |dt: &DateTime<Utc>| dt.second() as f64);
date_getter!(date_get_utc_milliseconds, utc_dt, |dt: &DateTime<Utc>| dt
    .timestamp_subsec_millis() as f64);

/// Minutes between UTC and local time, positive west of Greenwich.
pub fn date_get_timezone_offset(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let Some(ms) = this_date_instant(&this)? else {
        return Ok(JsValue::Number(f64::NAN));
    };
    let offset_seconds = local_dt(ms).offset().local_minus_utc();
    Ok(JsValue::Number(-(offset_seconds as f64) / 60.0))
}

// ═══════════════════════════════════════════════════════════════════════════
// Setters
// ═══════════════════════════════════════════════════════════════════════════

pub fn date_set_time(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let ms = match args.first() {
        Some(v) => interp.to_number_value(v)?,
        None => f64::NAN,
    };
    let instant = if ms.is_finite() { Some(ms as i64) } else { None };
    write_instant(&this, instant)?;
    Ok(instant_to_number(instant))
}

/// Shared setter body: overwrite calendar fields `start..start+count` from
/// the arguments, in the local or UTC calendar. A NaN (or non-finite)
/// component invalidates the whole date; no partial application. An already
/// invalid date stays invalid until setTime.
fn date_set_fields(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
    start: usize,
    count: usize,
    utc: bool,
) -> Result<JsValue, JsError> {
    let Some(ms) = this_date_instant(&this)? else {
        return Ok(JsValue::Number(f64::NAN));
    };

    let mut parts = if utc {
        parts_of(&utc_dt(ms))
    } else {
        parts_of(&local_dt(ms))
    };

    let mut invalid = false;
    for (i, field) in (start..start + count).enumerate() {
        if let Some(arg) = args.get(i) {
            let n = interp.to_number_value(arg)?;
            if n.is_nan() || n.is_infinite() {
                invalid = true;
            } else {
                parts.set_field(field, n);
            }
        }
    }

    let instant = if invalid {
        None
    } else if utc {
        instant_from_parts(&Utc, &parts)
    } else {
        instant_from_parts(&Local, &parts)
    };
    write_instant(&this, instant)?;
    Ok(instant_to_number(instant))
}

macro_rules! date_setter {
    ($name:ident, $start:expr, $count:expr, $utc:expr) => {
        pub fn $name(
            interp: &mut Interpreter,
            this: JsValue,
            args: &[JsValue],
        ) -> Result<JsValue, JsError> {
            date_set_fields(interp, this, args, $start, $count, $utc)
        }
    };
}

date_setter!(date_set_full_year, 0, 3, false);
date_setter!(date_set_month, 1, 2, false);
date_setter!(date_set_date, 2, 1, false);
date_setter!(date_set_hours, 3, 4, false);
date_setter!(date_set_minutes, 4, 3, false);
date_setter!(date_set_seconds, 5, 2, false);
date_setter!(date_set_milliseconds, 6, 1, false);

date_setter!(date_set_utc_full_year, 0, 3, true);
date_setter!(date_set_utc_month, 1, 2, true);
date_setter!(date_set_utc_date, 2, 1, true);
date_setter!(date_set_utc_hours, 3, 4, true);
date_setter!(date_set_utc_minutes, 4, 3, true);
date_setter!(date_set_utc_seconds, 5, 2, true);
date_setter!(date_set_utc_milliseconds, 6, 1, true);

/// Legacy setter: years 0..=99 select the 1900s.
pub fn date_set_year(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let year = match args.first() {
        Some(v) => interp.to_number_value(v)?,
        None => f64::NAN,
    };
    if year.is_nan() || year.is_infinite() {
        write_instant(&this, None)?;
        return Ok(JsValue::Number(f64::NAN));
    }
    let adjusted = adjust_year(year.trunc());
    date_set_fields(interp, this, &[JsValue::Number(adjusted)], 0, 1, false)
}

// ═══════════════════════════════════════════════════════════════════════════
// Conversion methods
// ═══════════════════════════════════════════════════════════════════════════

macro_rules! date_formatter {
    ($name:ident, $zone:ident, $fmt:expr) => {
        pub fn $name(
            _interp: &mut Interpreter,
            this: JsValue,
            _args: &[JsValue],
        ) -> Result<JsValue, JsError> {
            let Some(ms) = this_date_instant(&this)? else {
                return Ok(JsValue::from("Invalid Date"));
            };
            Ok(JsValue::from($zone(ms).format($fmt).to_string()))
        }
    };
}

date_formatter!(date_to_string, local_dt, "%a %b %d %Y %H:%M:%S GMT%z");
date_formatter!(date_to_date_string, local_dt, "%a %b %d %Y");
date_formatter!(date_to_time_string, local_dt, "%H:%M:%S GMT%z");
date_formatter!(date_to_utc_string, utc_dt, "%a, %d %b %Y %H:%M:%S GMT");
date_formatter!(date_to_locale_string, local_dt, "%m/%d/%Y, %H:%M:%S");
date_formatter!(date_to_locale_date_string, local_dt, "%m/%d/%Y");
date_formatter!(date_to_locale_time_string, local_dt, "%H:%M:%S");

/// toISOString fails on an invalid date instead of rendering a placeholder.
pub fn date_to_iso_string(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let Some(ms) = this_date_instant(&this)? else {
        return Err(JsError::range_error("Invalid Date"));
    };
    Ok(JsValue::from(
        utc_dt(ms).format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    ))
}
