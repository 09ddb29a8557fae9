//! Array built-in methods

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::value::{CheapClone, JsObjectRef, JsString, JsValue};

use super::link_constructor;

/// Initialize Array.prototype.
pub fn init_array_prototype(interp: &mut Interpreter) {
    let proto = interp.array_prototype.cheap_clone();
    interp.register_method(&proto, "toString", array_to_string, 0);
    interp.register_method(&proto, "join", array_join, 1);
    interp.register_method(&proto, "reverse", array_reverse, 0);
    interp.register_method(&proto, "sort", array_sort, 1);
}

/// Create the Array constructor. `Array(...)` and `new Array(...)` behave
/// identically.
pub fn create_array_constructor(interp: &mut Interpreter) -> JsObjectRef {
    let ctor = interp.create_native_constructor("Array", array_construct, array_construct, 1);
    let proto = interp.array_prototype.cheap_clone();
    link_constructor(interp, &ctor, &proto);
    ctor
}

pub fn array_construct(
    interp: &mut Interpreter,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    if args.len() == 1 {
        if let Some(JsValue::Number(n)) = args.first() {
            if n.is_nan() || *n < 0.0 || n.trunc() != *n || n.is_infinite() {
                return Err(JsError::range_error("invalid array length"));
            }
            let arr = interp.create_array_with_length(*n as usize);
            return Ok(JsValue::Object(arr));
        }
    }
    let arr = interp.create_array_from(args.to_vec());
    Ok(JsValue::Object(arr))
}

/// Narrow `this` to an array object.
fn this_array(this: &JsValue, method: &str) -> Result<JsObjectRef, JsError> {
    let JsValue::Object(obj) = this else {
        return Err(JsError::type_error(format!(
            "Array.prototype.{} called on non-array",
            method
        )));
    };
    if obj.borrow().as_array().is_none() {
        return Err(JsError::type_error(format!(
            "Array.prototype.{} called on non-array",
            method
        )));
    }
    Ok(obj.cheap_clone())
}

pub fn array_to_string(
    interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    array_join(interp, this, &[])
}

/// join(separator): "," by default; Undefined, Null and holes render empty.
pub fn array_join(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let arr = this_array(&this, "join")?;

    let separator = match args.first() {
        None | Some(JsValue::Undefined) => JsString::from(","),
        Some(v) => interp.to_string_value(v)?,
    };

    // Snapshot first: element coercion may run script that mutates the array
    let elements = arr.borrow().as_array().map(|e| e.to_vec()).unwrap_or_default();

    let mut out = String::new();
    for (i, slot) in elements.iter().enumerate() {
        if i > 0 {
            out.push_str(separator.as_str());
        }
        match slot {
            None | Some(JsValue::Undefined) | Some(JsValue::Null) => {}
            Some(v) => out.push_str(interp.to_string_value(v)?.as_str()),
        }
    }
    Ok(JsValue::from(out))
}

/// reverse(): in place, holes move positionally, returns the same array.
pub fn array_reverse(
    _interp: &mut Interpreter,
    this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    let arr = this_array(&this, "reverse")?;
    if let Some(elements) = arr.borrow_mut().as_array_mut() {
        elements.reverse();
    }
    Ok(JsValue::Object(arr))
}

/// sort(compareFn?): in-place quicksort; not stable. Undefined (and holes)
/// sort after every defined element regardless of the comparator.
pub fn array_sort(
    interp: &mut Interpreter,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let arr = this_array(&this, "sort")?;

    let compare_fn = match args.first() {
        Some(v @ JsValue::Object(_)) if v.is_callable() => Some(v.clone()),
        _ => None,
    };

    // Sort a snapshot: the comparator is arbitrary script and may touch the
    // array while we hold it
    let mut elements = arr.borrow().as_array().map(|e| e.to_vec()).unwrap_or_default();

    if elements.len() > 1 {
        let hi = elements.len() - 1;
        quicksort(interp, &mut elements, 0, hi as isize, &compare_fn)?;
    }

    if let Some(slots) = arr.borrow_mut().as_array_mut() {
        // Replace the sequence wholesale; length was unchanged by the sort
        slots.clear();
        slots.extend(elements);
    }
    Ok(JsValue::Object(arr))
}

/// Middle-element pivot, two scanning pointers converging, swap-and-narrow,
/// recurse on both partitions.
fn quicksort(
    interp: &mut Interpreter,
    elements: &mut [Option<JsValue>],
    lo: isize,
    hi: isize,
    compare_fn: &Option<JsValue>,
) -> Result<(), JsError> {
    if lo >= hi {
        return Ok(());
    }
    let pivot = elements[((lo + hi) / 2) as usize].clone();
    let mut i = lo;
    let mut j = hi;
    while i <= j {
        while i <= hi && sort_compare(interp, &elements[i as usize], &pivot, compare_fn)? < 0 {
            i += 1;
        }
        while j >= lo && sort_compare(interp, &elements[j as usize], &pivot, compare_fn)? > 0 {
            j -= 1;
        }
        if i <= j {
            elements.swap(i as usize, j as usize);
            i += 1;
            j -= 1;
        }
    }
    quicksort(interp, elements, lo, j, compare_fn)?;
    quicksort(interp, elements, i, hi, compare_fn)
}

/// Comparator contract: Undefined > anything, two Undefineds tie; otherwise
/// the user comparator's sign, or lexicographic order of the string
/// conversions.
fn sort_compare(
    interp: &mut Interpreter,
    a: &Option<JsValue>,
    b: &Option<JsValue>,
    compare_fn: &Option<JsValue>,
) -> Result<i32, JsError> {
    let a_undefined = matches!(a, None | Some(JsValue::Undefined));
    let b_undefined = matches!(b, None | Some(JsValue::Undefined));
    match (a_undefined, b_undefined) {
        (true, true) => return Ok(0),
        (true, false) => return Ok(1),
        (false, true) => return Ok(-1),
        (false, false) => {}
    }
    let a = a.clone().unwrap_or(JsValue::Undefined);
    let b = b.clone().unwrap_or(JsValue::Undefined);

    if let Some(cmp) = compare_fn {
        let result = interp.call_function(cmp.clone(), JsValue::Undefined, &[a, b])?;
        let n = interp.to_number_value(&result)?;
        return Ok(if n > 0.0 {
            1
        } else if n < 0.0 {
            -1
        } else {
            0
        });
    }

    let sa = interp.to_string_value(&a)?;
    let sb = interp.to_string_value(&b)?;
    Ok(match sa.as_str().cmp(sb.as_str()) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    })
}
