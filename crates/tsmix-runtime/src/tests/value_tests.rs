use super::*;
use crate::object::ObjectRef;

#[test]
fn test_non_string_keys_are_rejected_before_lookup() {
    let obj = Value::Object(ObjectRef::new());
    for key in [Value::Number(1.0), Value::Null, Value::Undefined, Value::Bool(true)] {
        let err = obj.get_value(&key).unwrap_err();
        assert!(matches!(err, RuntimeError::MalformedKey { .. }), "{key:?}: {err}");
    }
    assert!(matches!(
        obj.set_value(&Value::Object(ObjectRef::new()), Value::Null),
        Err(RuntimeError::MalformedKey { found: "object" })
    ));
    assert!(obj.has_value(&Value::Number(0.0)).is_err());
}

#[test]
fn test_string_and_symbol_keys_are_accepted() {
    let obj = Value::Object(ObjectRef::new());
    obj.set_value(&Value::from("name"), Value::from("tsmix")).unwrap();
    assert_eq!(obj.get("name").unwrap(), "tsmix");

    let tag = Symbol::new("tag");
    obj.set_value(&Value::Symbol(tag.clone()), Value::from(7)).unwrap();
    assert_eq!(obj.get_value(&Value::Symbol(tag)).unwrap(), 7.0);
}

#[test]
fn test_symbols_with_same_description_are_distinct() {
    let a = Symbol::new("id");
    let b = Symbol::new("id");
    assert_ne!(a, b);
    assert_eq!(a.description(), b.description());
    assert_ne!(PropertyKey::from(&a), PropertyKey::from(&b));
    assert_eq!(a.to_string(), "Symbol(id)");
}

#[test]
fn test_objects_compare_by_identity() {
    let a = ObjectRef::new();
    let b = ObjectRef::new();
    assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
    assert_ne!(Value::Object(a), Value::Object(b));
    assert_eq!(Value::from("x"), Value::string("x"));
    assert_ne!(Value::Null, Value::Undefined);
    assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
}

#[test]
fn test_display() {
    assert_eq!(Value::from(3).to_string(), "3");
    assert_eq!(Value::from(2.5).to_string(), "2.5");
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::Object(ObjectRef::new()).to_string(), "[object Object]");
}

#[test]
fn test_calling_a_non_function_is_an_error() {
    let err = Value::from(1).call(&Value::Undefined, &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::NotCallable { .. }));

    let obj = Value::Object(ObjectRef::new());
    let err = obj.invoke("missing", &[]).unwrap_err();
    assert_eq!(err.to_string(), "missing is not a function");
}

#[test]
fn test_property_access_on_primitives_is_not_an_object_error() {
    let err = Value::from("text").get("length").unwrap_err();
    assert!(matches!(err, RuntimeError::NotAnObject { found: "string" }));
}
