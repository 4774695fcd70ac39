//! Binding strategies exercised through real calls

use funcext_core::prelude::*;
use funcext_core::{binder, classify, MethodBinding};
use proptest::prelude::*;

fn receiver_report() -> Callable {
    Callable::new("report", |args: Arguments| {
        Ok(match args.receiver() {
            Some(Receiver::Type(class)) => json!(["type", class.name()]),
            Some(Receiver::Instance(obj)) => json!(["instance", obj.class().name()]),
            None => json!(null),
        })
    })
}

#[test]
fn class_method_call_always_passes_owner() {
    let class = TypeHandle::new("TestClass");
    let obj = class.instantiate();

    let method = MethodBinder::class_method(&receiver_report(), Some(&obj), &class);
    assert_eq!(method.call(Arguments::new()).unwrap(), json!(["type", "TestClass"]));
}

#[test]
fn instance_method_call_passes_instance() {
    let class = TypeHandle::new("TestClass");
    let obj = class.instantiate();

    let method = MethodBinder::instance_method(&receiver_report(), Some(&obj), &class);
    assert!(method.is_bound());
    assert_eq!(method.call(Arguments::new()).unwrap(), json!(["instance", "TestClass"]));
}

#[test]
fn instance_method_without_instance_is_plain() {
    let class = TypeHandle::new("TestClass");
    let f = receiver_report();
    let method = MethodBinder::instance_method(&f, None, &class);
    assert_eq!(method, f);
    assert_eq!(method.call(Arguments::new()).unwrap(), json!(null));
}

#[test]
fn binding_table_matches_strategies() {
    let class = TypeHandle::new("TestClass");
    let obj = class.instantiate();
    let f = receiver_report();

    for kind in MethodKind::ALL {
        let via_table = binder::bind(kind, &f, Some(&obj), &class);
        let via_binding = MethodBinding::for_kind(Some(kind)).apply(&f, Some(&obj), &class);
        assert_eq!(via_table, via_binding);
    }
}

#[test]
fn unknown_kind_name_is_invalid_argument() {
    for bad in ["hello", "42", "4.2", "lambda"] {
        let err = bad.parse::<MethodKind>().unwrap_err();
        assert!(matches!(err, FuncextError::InvalidArgument { .. }));
    }
}

proptest! {
    /// Property: static binding is the identity for any access shape
    #[test]
    fn static_binding_is_identity(with_instance in any::<bool>(), type_name in "[A-Z][a-z]{0,8}") {
        let class = TypeHandle::new(type_name);
        let obj = class.instantiate();
        let f = receiver_report();
        let instance = with_instance.then_some(&obj);
        prop_assert_eq!(MethodBinder::static_method(&f, instance, &class), f);
    }

    /// Property: classification of an unbound callable honours the explicit kind
    #[test]
    fn unbound_classification_follows_explicit_kind(index in 0usize..4) {
        let explicit = MethodKind::ALL.get(index).copied();
        let classification = classify(&receiver_report(), explicit);
        prop_assert_eq!(classification.call_kind, CallKind::Function);
        prop_assert_eq!(classification.method_kind, explicit.unwrap_or(MethodKind::Instance));
    }
}
