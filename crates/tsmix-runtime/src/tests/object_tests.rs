use super::*;
use std::cell::Cell;

fn key(name: &str) -> PropertyKey {
    PropertyKey::from(name)
}

fn getter(name: &str, f: impl Fn(&Value) -> RuntimeResult<Value> + 'static) -> FunctionRef {
    FunctionRef::native(name, move |this, _| f(this))
}

#[test]
fn test_get_walks_the_prototype_chain() {
    let base = ObjectRef::new();
    base.define_own("greeting", Property::data("hello"));
    let derived = ObjectRef::with_prototype(Some(base.clone()));
    let receiver = Value::Object(derived.clone());

    assert_eq!(derived.get(&key("greeting"), &receiver).unwrap(), "hello");
    assert!(derived.get(&key("missing"), &receiver).unwrap().is_undefined());
    assert!(derived.has_property(&key("greeting")).unwrap());
    assert!(!derived.has_own(&key("greeting")));
}

#[test]
fn test_set_shadows_inherited_data_without_touching_the_prototype() {
    let base = ObjectRef::new();
    base.define_own("count", Property::data(1));
    let derived = ObjectRef::with_prototype(Some(base.clone()));
    let receiver = Value::Object(derived.clone());

    derived.set(&key("count"), Value::from(5), &receiver).unwrap();

    assert_eq!(derived.get(&key("count"), &receiver).unwrap(), 5.0);
    let base_value = base.get(&key("count"), &Value::Object(base.clone())).unwrap();
    assert_eq!(base_value, 1.0);
}

#[test]
fn test_inherited_setter_runs_against_the_receiver() {
    let base = ObjectRef::new();
    let set = FunctionRef::native("set celsius", |this, args| {
        let c = args[0].as_number().unwrap_or_default();
        this.expect_object()?
            .define_own("fahrenheit", Property::data(c * 9.0 / 5.0 + 32.0));
        Ok(Value::Undefined)
    });
    base.define_own("celsius", Property::accessor(None, Some(set)));
    let derived = ObjectRef::with_prototype(Some(base.clone()));
    let receiver = Value::Object(derived.clone());

    derived.set(&key("celsius"), Value::from(100), &receiver).unwrap();

    assert_eq!(receiver.get("fahrenheit").unwrap(), 212.0);
    assert!(!base.has_own(&key("fahrenheit")));
}

#[test]
fn test_getter_without_setter_rejects_writes() {
    let obj = ObjectRef::new();
    obj.define_own(
        "id",
        Property::accessor(Some(getter("get id", |_| Ok(Value::from(42)))), None),
    );
    let receiver = Value::Object(obj.clone());
    assert_eq!(receiver.get("id").unwrap(), 42.0);
    assert!(matches!(
        receiver.set("id", 1),
        Err(RuntimeError::NoSetter { .. })
    ));
}

#[test]
fn test_readonly_data_rejects_writes() {
    let obj = ObjectRef::new();
    obj.define_own("version", Property::readonly(1));
    let receiver = Value::Object(obj);
    assert!(matches!(
        receiver.set("version", 2),
        Err(RuntimeError::ReadOnly { .. })
    ));
    assert_eq!(receiver.get("version").unwrap(), 1.0);
}

#[test]
fn test_own_keys_keep_insertion_order_across_deletes() {
    let obj = ObjectRef::new();
    let receiver = Value::Object(obj.clone());
    for name in ["c", "a", "b"] {
        receiver.set(name, 0).unwrap();
    }
    assert!(obj.delete(&key("a")));
    assert!(!obj.delete(&key("a")));
    receiver.set("a", 1).unwrap();

    let keys: Vec<String> = obj.own_keys().iter().map(ToString::to_string).collect();
    assert_eq!(keys, ["c", "b", "a"]);
}

#[test]
fn test_set_prototype_rejects_cycles() {
    let a = ObjectRef::new();
    let b = ObjectRef::with_prototype(Some(a.clone()));
    let c = ObjectRef::with_prototype(Some(b.clone()));

    assert!(matches!(
        a.set_prototype(Some(c.clone())),
        Err(RuntimeError::PrototypeCycle { .. })
    ));
    assert!(matches!(
        a.set_prototype(Some(a.clone())),
        Err(RuntimeError::PrototypeCycle { .. })
    ));
    assert!(a.prototype().is_none());

    let d = ObjectRef::new();
    c.set_prototype(Some(d.clone())).unwrap();
    assert!(c.prototype().unwrap().ptr_eq(&d));
}

#[test]
fn test_getter_may_mutate_its_own_object() {
    let obj = ObjectRef::new();
    let reads = std::rc::Rc::new(Cell::new(0));
    let counter = reads.clone();
    obj.define_own(
        "next",
        Property::accessor(
            Some(getter("get next", move |this| {
                counter.set(counter.get() + 1);
                this.set("last", counter.get())?;
                Ok(Value::from(counter.get()))
            })),
            None,
        ),
    );
    let receiver = Value::Object(obj);

    assert_eq!(receiver.get("next").unwrap(), 1.0);
    assert_eq!(receiver.get("next").unwrap(), 2.0);
    assert_eq!(receiver.get("last").unwrap(), 2.0);
    assert_eq!(reads.get(), 2);
}

#[test]
fn test_bound_functions_keep_the_innermost_receiver() {
    let who = FunctionRef::native("who", |this, _| this.get("name"));
    let first = ObjectRef::new();
    first.define_own("name", Property::data("first"));
    let second = ObjectRef::new();
    second.define_own("name", Property::data("second"));

    let bound = who.bind(Value::Object(first.clone()));
    let rebound = bound.bind(Value::Object(second));

    assert_eq!(rebound.call(&Value::Undefined, &[]).unwrap(), "first");
    assert_eq!(rebound.bound_this(), Some(&Value::Object(first)));
    assert!(rebound.unbound().ptr_eq(&who));
}
