use super::*;
use crate::intern::TypeInterner;

#[test]
fn test_format_intrinsics() {
    let db = TypeInterner::new();
    let fmt = TypeFormatter::new(&db);
    assert_eq!(fmt.format(TypeId::NUMBER), "number");
    assert_eq!(fmt.format(TypeId::UNDEFINED), "undefined");
    assert_eq!(fmt.format(TypeId(TypeId::FIRST_USER + 7)), "error");
}

#[test]
fn test_format_object_with_method() {
    let db = TypeInterner::new();
    let greet_ty = db.function(CallSignature::new(Vec::new(), TypeId::STRING));
    let ty = db.object(vec![
        PropertyInfo::new(db.intern_string("name"), TypeId::STRING),
        PropertyInfo::method(db.intern_string("greet"), greet_ty),
        PropertyInfo::opt(db.intern_string("age"), TypeId::NUMBER),
    ]);

    assert_eq!(
        TypeFormatter::new(&db).format(ty),
        "{ age?: number; greet(): string; name: string }"
    );
}

#[test]
fn test_format_nested_tuples() {
    let db = TypeInterner::new();
    let inner_a = db.tuple(vec![TupleElement::named(db.intern_string("x"), TypeId::NUMBER)]);
    let inner_b = db.tuple(Vec::new());
    let outer = db.tuple(vec![TupleElement::new(inner_a), TupleElement::new(inner_b)]);

    assert_eq!(TypeFormatter::new(&db).format(outer), "[[x: number], []]");
}

#[test]
fn test_format_function_and_constructor() {
    let db = TypeInterner::new();
    let f = db.function(CallSignature::new(
        vec![ParamInfo::required(db.intern_string("n"), TypeId::NUMBER)],
        TypeId::BOOLEAN,
    ));
    assert_eq!(TypeFormatter::new(&db).format(f), "(n: number) => boolean");

    let ctor = db.callable(CallableShape {
        construct_signatures: vec![CallSignature::new(vec![ParamInfo::unnamed(TypeId::STRING)], TypeId::VOID)],
        ..Default::default()
    });
    assert_eq!(TypeFormatter::new(&db).format(ctor), "{ new (arg0: string): void }");
}
