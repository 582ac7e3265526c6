//! 跨 crate 端到端集成测试

use std::sync::Arc;

use factory_abstractions::{Container, Filter};
use factory_common::{
    Arguments, ConstructorDescriptor, FactoryError, FieldDescriptor, Instance, MethodDescriptor,
    ParameterDescriptor, PropertyAnnotation, TypeDescriptor, TypeKey, TypeModel, Value,
};
use factory_impl::{
    AliasFactory, CallbackProvider, Factory, FactoryConfig, FilterRegistry,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn cascading_failures_read_as_a_single_causal_chain() {
    init_tracing();
    let model = Arc::new(TypeModel::new());
    model.define(
        TypeDescriptor::class("CascadingAnnotationInjection")
            .with_annotation(PropertyAnnotation::new("baz", "NotExisting").injectable()),
    );
    model.define(
        TypeDescriptor::class("CascadingConstructorInjection").with_constructor(
            ConstructorDescriptor::new().with_param(
                ParameterDescriptor::new("bar")
                    .with_declared_type("CascadingAnnotationInjection")
                    .injectable(),
            ),
        ),
    );
    model.define(
        TypeDescriptor::class("CascadingPropertyInjection").with_field(
            FieldDescriptor::new("foo")
                .with_annotated_type("CascadingConstructorInjection")
                .injectable(),
        ),
    );
    let factory = Factory::new(model);

    let error = factory
        .get_instance("CascadingPropertyInjection", Arguments::new())
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "Error while injecting dependency [foo] of [CascadingPropertyInjection]: \
         Error while injecting constructor of [CascadingConstructorInjection]: \
         Cannot inject method [CascadingConstructorInjection::new]: \
         Cannot fill parameter [bar] of [CascadingConstructorInjection::new]: \
         Error while injecting dependency [baz] of [CascadingAnnotationInjection]: \
         Could not find [NotExisting]."
    );
}

#[test]
fn dependency_cycles_are_reported_instead_of_overflowing() {
    init_tracing();
    let model = Arc::new(TypeModel::new());
    model.define(
        TypeDescriptor::class("CycleA").with_constructor(
            ConstructorDescriptor::new()
                .with_param(ParameterDescriptor::new("b").with_declared_type("CycleB")),
        ),
    );
    model.define(
        TypeDescriptor::class("CycleB").with_constructor(
            ConstructorDescriptor::new()
                .with_param(ParameterDescriptor::new("a").with_declared_type("CycleA")),
        ),
    );
    let factory = Factory::new(model);

    let error = factory.get_instance("CycleA", Arguments::new()).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("Circular dependency detected"));
    assert!(message.contains("cyclea -> cycleb -> cyclea"));
}

#[test]
fn depth_limit_backstops_when_cycle_detection_is_off() {
    init_tracing();
    let model = Arc::new(TypeModel::new());
    model.define(
        TypeDescriptor::class("LoopA").with_constructor(
            ConstructorDescriptor::new()
                .with_param(ParameterDescriptor::new("b").with_declared_type("LoopB")),
        ),
    );
    model.define(
        TypeDescriptor::class("LoopB").with_constructor(
            ConstructorDescriptor::new()
                .with_param(ParameterDescriptor::new("a").with_declared_type("LoopA")),
        ),
    );
    let factory = Factory::with_config(
        model,
        FactoryConfig {
            detect_cycles: false,
            max_resolution_depth: 8,
        },
    );

    let error = factory.get_instance("LoopA", Arguments::new()).unwrap_err();
    assert!(error.to_string().contains("Resolution depth limit of 8 exceeded"));
}

#[test]
fn alias_factory_routes_aliases_to_their_canonical_names() {
    init_tracing();
    let model = Arc::new(TypeModel::new());
    model.define(TypeDescriptor::class("app.entities.User"));
    let factory = AliasFactory::new(model);
    factory.register_alias("app.entities.User", Some("User"));

    let value = factory.get_instance("User", Arguments::new()).unwrap();
    assert_eq!(
        value.as_object().unwrap().class(),
        &TypeKey::new("app.entities.User")
    );
}

#[test]
fn alias_factory_registers_singletons_with_aliases() {
    init_tracing();
    let factory = AliasFactory::new(Arc::new(TypeModel::new()));
    let session = Instance::new(TypeKey::new("app.Session"));
    factory
        .set_singleton_with_alias(Value::Object(session.clone()), None, Some("Session"))
        .unwrap();

    let via_alias = factory.get_instance("Session", Arguments::new()).unwrap();
    let via_name = factory.get_singleton("app.Session").unwrap();
    assert!(Arc::ptr_eq(via_alias.as_object().unwrap(), &session));
    assert!(Arc::ptr_eq(via_name.as_object().unwrap(), &session));
}

#[test]
fn alias_factory_can_substitute_an_extension_type() {
    init_tracing();
    let model = Arc::new(TypeModel::new());
    model.define(TypeDescriptor::class("framework.Application"));
    model.define(TypeDescriptor::class("my.Application").with_parent("framework.Application"));
    let factory = AliasFactory::new(model);
    // 框架类型名指向自己的扩展实现
    factory.register_alias("my.Application", Some("framework.Application"));

    let value = factory
        .get_instance("framework.Application", Arguments::new())
        .unwrap();
    assert_eq!(
        value.as_object().unwrap().class(),
        &TypeKey::new("my.Application")
    );
}

#[test]
fn replacing_the_universal_fallback_takes_over_unknown_types() {
    init_tracing();
    let factory = Factory::new(Arc::new(TypeModel::new()));
    factory.set_provider(
        "object",
        Arc::new(CallbackProvider::new(|class, _args, _container| {
            let instance = Instance::new(class.clone());
            instance.set("fallback", Value::from(true));
            Ok(Value::Object(instance))
        })),
    );

    let value = factory.get_instance("totally.Unknown", Arguments::new()).unwrap();
    assert_eq!(
        value.as_object().unwrap().get("fallback"),
        Some(Value::Bool(true))
    );
}

#[test]
fn filters_coerce_scalar_values_by_type_name() {
    init_tracing();
    let registry = FilterRegistry::with_defaults(Arc::new(TypeModel::new()));

    let coerced = registry
        .filter_for("int")
        .unwrap()
        .filter(Value::from("42"))
        .unwrap();
    assert_eq!(coerced, Value::Int(42));

    let coerced = registry
        .filter_for("Boolean")
        .unwrap()
        .filter(Value::from("false"))
        .unwrap();
    assert_eq!(coerced, Value::Bool(false));

    let missing = registry.filter_for("no.such.Type").unwrap_err();
    assert!(matches!(missing, FactoryError::FilterNotFound { .. }));
}

#[test]
fn full_wiring_combines_all_injection_passes() {
    init_tracing();
    let model = Arc::new(TypeModel::new());
    model.define(TypeDescriptor::class("infra.Clock"));
    model.define(TypeDescriptor::class("infra.Bus"));
    model.define(
        TypeDescriptor::class("infra.Logger").with_constructor(
            ConstructorDescriptor::new()
                .with_param(ParameterDescriptor::new("level").with_default("info")),
        ),
    );
    model.define(
        TypeDescriptor::class("app.Service")
            .with_constructor(
                ConstructorDescriptor::new()
                    .with_param(ParameterDescriptor::new("logger").with_declared_type("infra.Logger"))
                    .with_param(ParameterDescriptor::new("name")),
            )
            .with_method(
                MethodDescriptor::new("inject", |instance, filled| {
                    instance.set("bus", filled.get("bus").unwrap().clone());
                    Ok(Value::Null)
                })
                .with_param(ParameterDescriptor::new("bus").with_declared_type("infra.Bus")),
            )
            .with_field(
                FieldDescriptor::new("clock")
                    .with_annotated_type("infra.Clock")
                    .injectable(),
            )
            .with_annotation(PropertyAnnotation::new("peer", "infra.Bus").injectable()),
    );
    let factory = Factory::new(model);

    let value = factory
        .get_instance("app.Service", Arguments::new().with_named("name", "orders"))
        .unwrap();
    let service = value.as_object().unwrap();

    assert_eq!(service.get("name"), Some(Value::from("orders")));
    let logger = service.get("logger").unwrap();
    assert_eq!(
        logger.as_object().unwrap().get("level"),
        Some(Value::from("info"))
    );
    assert!(service.get("bus").unwrap().as_object().is_some());
    assert!(service.get("clock").unwrap().as_object().is_some());
    assert!(service.get("peer").unwrap().as_object().is_some());
}
