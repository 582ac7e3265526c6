//! 单例注册与获取集成测试

use std::sync::Arc;

use factory_abstractions::Container;
use factory_common::{Arguments, Instance, TypeDescriptor, TypeKey, TypeModel, Value};
use factory_impl::Factory;

#[test]
fn registered_singleton_is_returned_by_identity() {
    let model = Arc::new(TypeModel::new());
    model.define(TypeDescriptor::class("Singleton"));
    let factory = Factory::new(model);

    let instance = Instance::new(TypeKey::new("Singleton"));
    factory
        .set_singleton(Value::Object(instance.clone()), None)
        .unwrap();

    let first = factory.get_instance("Singleton", Arguments::new()).unwrap();
    let second = factory.get_instance("Singleton", Arguments::new()).unwrap();
    assert!(Arc::ptr_eq(first.as_object().unwrap(), second.as_object().unwrap()));
    assert!(Arc::ptr_eq(first.as_object().unwrap(), &instance));
}

#[test]
fn singleton_ignores_explicit_arguments() {
    let factory = Factory::new(Arc::new(TypeModel::new()));
    let instance = Instance::new(TypeKey::new("Fixed"));
    instance.set("arg", Value::from("Special Argument"));
    factory.set_singleton(Value::Object(instance), None).unwrap();

    let value = factory
        .get_instance("Fixed", Arguments::new().with_named("arg", "ignored"))
        .unwrap();
    assert_eq!(
        value.as_object().unwrap().get("arg"),
        Some(Value::from("Special Argument"))
    );
}

#[test]
fn get_singleton_requires_a_prior_registration() {
    let factory = Factory::new(Arc::new(TypeModel::new()));
    let error = factory.get_singleton("NonExistingSingleton").unwrap_err();
    assert!(error
        .to_string()
        .contains("No singleton registered for [nonexistingsingleton]."));
}

#[test]
fn get_singleton_returns_the_registered_instance() {
    let factory = Factory::new(Arc::new(TypeModel::new()));
    let instance = Instance::new(TypeKey::new("SomeSingleton"));
    factory
        .set_singleton(Value::Object(instance.clone()), Some("SomeSingleton"))
        .unwrap();

    let value = factory.get_singleton("SomeSingleton").unwrap();
    assert!(Arc::ptr_eq(value.as_object().unwrap(), &instance));
}

#[test]
fn singleton_key_defaults_to_the_runtime_type() {
    let factory = Factory::new(Arc::new(TypeModel::new()));
    let instance = Instance::new(TypeKey::new("app.Session"));
    let key = factory
        .set_singleton(Value::Object(instance), None)
        .unwrap();
    assert_eq!(key, TypeKey::new("app.Session"));
    assert!(factory.get_singleton("app.Session").is_ok());
}

#[test]
fn explicit_key_overrides_the_runtime_type() {
    let factory = Factory::new(Arc::new(TypeModel::new()));
    let instance = Instance::new(TypeKey::new("concrete.Impl"));
    factory
        .set_singleton(Value::Object(instance.clone()), Some("app.Contract"))
        .unwrap();

    let value = factory.get_instance("app.Contract", Arguments::new()).unwrap();
    assert!(Arc::ptr_eq(value.as_object().unwrap(), &instance));
    assert!(factory.get_singleton("concrete.Impl").is_err());
}

#[test]
fn non_object_singleton_needs_an_explicit_type() {
    let factory = Factory::new(Arc::new(TypeModel::new()));
    assert!(factory.set_singleton(Value::from(42_i64), None).is_err());
    factory
        .set_singleton(Value::from(42_i64), Some("app.AnswerValue"))
        .unwrap();
    assert_eq!(factory.get_singleton("app.AnswerValue").unwrap(), Value::Int(42));
}

#[test]
fn singleton_composes_with_hierarchy_lookup() {
    let model = Arc::new(TypeModel::new());
    model.define(TypeDescriptor::class("Base"));
    model.define(TypeDescriptor::class("Sub").with_parent("Base"));
    let factory = Factory::new(model);

    let instance = Instance::new(TypeKey::new("Base"));
    factory
        .set_singleton(Value::Object(instance.clone()), Some("Base"))
        .unwrap();

    // 单例即 provider，与层级查找统一：子类请求命中基类的单例注册
    let value = factory.get_instance("Sub", Arguments::new()).unwrap();
    assert!(Arc::ptr_eq(value.as_object().unwrap(), &instance));
}

#[test]
fn fresh_instances_are_not_cached_without_a_singleton() {
    let model = Arc::new(TypeModel::new());
    model.define(TypeDescriptor::class("Transient"));
    let factory = Factory::new(model);

    let first = factory.get_instance("Transient", Arguments::new()).unwrap();
    let second = factory.get_instance("Transient", Arguments::new()).unwrap();
    assert!(!Arc::ptr_eq(
        first.as_object().unwrap(),
        second.as_object().unwrap()
    ));
}
