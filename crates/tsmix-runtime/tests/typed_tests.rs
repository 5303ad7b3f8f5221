use tsmix_runtime::typed::{self, TypedClass};
use tsmix_runtime::*;

fn point() -> TypedClass<(f64, f64)> {
    TypedClass::new(
        ClassBuilder::new("Point")
            .init(|this, args| {
                this.set("x", args.get(0))?;
                this.set("y", args.get(1))
            })
            .build(),
    )
}

fn label() -> TypedClass<(&'static str,)> {
    TypedClass::new(
        ClassBuilder::new("Label")
            .init(|this, args| this.set("text", args.get(0)))
            .method("shout", |this, _| {
                Ok(Value::from(this.get("text")?.to_string().to_uppercase()))
            })
            .build(),
    )
}

fn flag() -> TypedClass<()> {
    TypedClass::new(
        ClassBuilder::new("Flag")
            .init(|this, _| this.set("enabled", true))
            .build(),
    )
}

#[test]
fn test_typed_composite_takes_one_tuple_per_component() {
    let labelled = typed::mix((point(), label())).unwrap();
    let value = labelled.construct(((1.0, 2.0), ("origin",))).unwrap();

    assert_eq!(value.get("x").unwrap(), 1.0);
    assert_eq!(value.get("y").unwrap(), 2.0);
    assert_eq!(value.invoke("shout", &[]).unwrap(), "ORIGIN");
}

#[test]
fn test_typed_composites_nest() {
    let labelled = typed::mix((point(), label())).unwrap();
    let flagged = typed::mix((labelled.clone(), flag())).unwrap();
    assert_eq!(
        flagged.class().name().to_string(),
        "Composite(Composite(Point, Label), Flag)"
    );

    let value = flagged.construct((((3.0, 4.0), ("p",)), ())).unwrap();
    assert_eq!(value.get("x").unwrap(), 3.0);
    assert_eq!(value.get("text").unwrap(), "p");
    assert_eq!(value.get("enabled").unwrap(), Value::Bool(true));
    assert!(has_mixin(&value, labelled.class()));
}

#[test]
fn test_typed_mix_with_options() {
    let options = ComposeOptions {
        unresolved_write: WritePolicy::Reject,
        ..ComposeOptions::default()
    };
    let strict = typed::mix_with((flag(),), options).unwrap();
    let value = strict.construct(((),)).unwrap();
    assert!(value.set("other", 1).is_err());
    value.set("enabled", false).unwrap();
    assert_eq!(value.get("enabled").unwrap(), Value::Bool(false));
}

#[test]
fn test_typed_class_constructs_alone() {
    let p = point().construct((5.0, 6.0)).unwrap();
    assert_eq!(p.get("y").unwrap(), 6.0);
}
