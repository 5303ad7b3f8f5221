use super::*;
use crate::class::ClassBuilder;

#[test]
fn test_tuples_lower_to_positional_args() {
    assert_eq!(().into_args(), Args::none());
    assert_eq!(
        (1, "two", true).into_args(),
        Args::Positional(vec![Value::from(1), Value::from("two"), Value::from(true)])
    );
}

#[test]
fn test_component_lists_lower_to_one_list_per_component() {
    type List = (TypedClass<(i32,)>, TypedClass<()>, TypedClass<(&'static str, f64)>);
    let lowered = <List as ComponentList>::lower(((1,), (), ("a", 2.5)));
    assert_eq!(
        lowered,
        Args::PerComponent(vec![
            Args::Positional(vec![Value::from(1)]),
            Args::none(),
            Args::Positional(vec![Value::from("a"), Value::from(2.5)]),
        ])
    );
}

#[test]
fn test_typed_mix_names_composite_after_components() {
    let a: TypedClass<()> = TypedClass::new(ClassBuilder::new("A").build());
    let b: TypedClass<(i32,)> = TypedClass::new(ClassBuilder::new("B").build());
    let ab = mix((a, b)).unwrap();
    assert_eq!(ab.class().name().to_string(), "Composite(A, B)");
    assert_eq!(ab.class().components().len(), 2);
}
