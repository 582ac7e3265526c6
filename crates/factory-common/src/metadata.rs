//! 结构化类型元数据
//!
//! 宿主环境没有运行时反射，注入所需的三类事实（类型提示、注入标记、默认值）
//! 由应用通过描述符显式声明，builder 风格逐项补充。

use std::fmt;
use std::sync::Arc;

use crate::arguments::ParameterValues;
use crate::errors::FactoryError;
use crate::key::{self, TypeKey, SEPARATOR};
use crate::value::{ObjectRef, Value};

/// 方法体回调
pub type MethodBody =
    Arc<dyn Fn(&ObjectRef, &ParameterValues) -> Result<Value, FactoryError> + Send + Sync>;

/// 构造体回调
pub type ConstructorBody =
    Arc<dyn Fn(&ObjectRef, &ParameterValues) -> Result<(), FactoryError> + Send + Sync>;

/// 类型的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// 可实例化的类
    Class,
    /// 抽象类
    AbstractClass,
    /// 接口
    Interface,
}

/// 构造器/方法参数描述符
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// 参数名
    pub name: String,
    /// 声明位置，从 0 起
    pub position: usize,
    /// 默认值
    pub default: Option<Value>,
    /// 声明类型，视为绝对引用
    pub declared_type: Option<String>,
    /// 注解类型，相对/别名引用，经解析器按声明上下文解析
    pub annotated_type: Option<String>,
    /// 注入标记
    pub inject: bool,
}

impl ParameterDescriptor {
    /// 创建参数描述符，位置由所属方法按声明顺序指定
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            default: None,
            declared_type: None,
            annotated_type: None,
            inject: false,
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// 以 JSON 书写默认值
    pub fn with_json_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(Value::from_json(value));
        self
    }

    /// 设置声明类型
    pub fn with_declared_type(mut self, type_ref: impl Into<String>) -> Self {
        self.declared_type = Some(type_ref.into());
        self
    }

    /// 设置注解类型
    pub fn with_annotated_type(mut self, type_ref: impl Into<String>) -> Self {
        self.annotated_type = Some(type_ref.into());
        self
    }

    /// 打上注入标记
    pub fn injectable(mut self) -> Self {
        self.inject = true;
        self
    }
}

/// 字段描述符
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// 字段名
    pub name: String,
    /// 类型注解
    pub annotated_type: Option<String>,
    /// 注入标记
    pub inject: bool,
    /// 初始值，实例创建时写入
    pub initial: Option<Value>,
}

impl FieldDescriptor {
    /// 创建字段描述符
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotated_type: None,
            inject: false,
            initial: None,
        }
    }

    /// 设置类型注解
    pub fn with_annotated_type(mut self, type_ref: impl Into<String>) -> Self {
        self.annotated_type = Some(type_ref.into());
        self
    }

    /// 打上注入标记
    pub fn injectable(mut self) -> Self {
        self.inject = true;
        self
    }

    /// 设置初始值
    pub fn with_initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }
}

/// 类级属性注解（"虚拟属性"）
#[derive(Debug, Clone)]
pub struct PropertyAnnotation {
    /// 属性名
    pub name: String,
    /// 类型引用，按声明该注解的类的上下文解析
    pub type_ref: String,
    /// 注入标记
    pub inject: bool,
}

impl PropertyAnnotation {
    /// 创建属性注解
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            inject: false,
        }
    }

    /// 打上注入标记
    pub fn injectable(mut self) -> Self {
        self.inject = true;
        self
    }
}

/// 方法描述符
#[derive(Clone)]
pub struct MethodDescriptor {
    /// 方法名
    pub name: String,
    /// 参数表，声明顺序
    pub params: Vec<ParameterDescriptor>,
    /// 方法体
    pub body: MethodBody,
}

impl MethodDescriptor {
    /// 创建方法描述符
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&ObjectRef, &ParameterValues) -> Result<Value, FactoryError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            body: Arc::new(body),
        }
    }

    /// 追加参数，位置按声明顺序自动编号
    pub fn with_param(mut self, mut param: ParameterDescriptor) -> Self {
        param.position = self.params.len();
        self.params.push(param);
        self
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &"<body>")
            .finish()
    }
}

/// 构造器描述符
#[derive(Clone, Default)]
pub struct ConstructorDescriptor {
    /// 参数表，声明顺序
    pub params: Vec<ParameterDescriptor>,
    /// 构造体；缺省时把每个已填充参数存为同名属性
    pub body: Option<ConstructorBody>,
}

impl ConstructorDescriptor {
    /// 创建构造器描述符
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加参数，位置按声明顺序自动编号
    pub fn with_param(mut self, mut param: ParameterDescriptor) -> Self {
        param.position = self.params.len();
        self.params.push(param);
        self
    }

    /// 设置构造体
    pub fn with_body(
        mut self,
        body: impl Fn(&ObjectRef, &ParameterValues) -> Result<(), FactoryError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.body = Some(Arc::new(body));
        self
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .field("body", &self.body.as_ref().map(|_| "<body>"))
            .finish()
    }
}

/// 类型描述符
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// 完全限定名，保留声明时的大小写
    pub name: String,
    /// 类型种类
    pub kind: TypeKind,
    /// 父类（完全限定名）
    pub parent: Option<String>,
    /// 实现的接口，声明顺序
    pub interfaces: Vec<String>,
    /// 构造器
    pub constructor: Option<ConstructorDescriptor>,
    /// 方法，声明顺序
    pub methods: Vec<MethodDescriptor>,
    /// 字段，声明顺序
    pub fields: Vec<FieldDescriptor>,
    /// 类级属性注解，声明顺序可观测
    pub annotations: Vec<PropertyAnnotation>,
    /// 声明源文本，import 别名解析用
    pub source: Option<String>,
}

impl TypeDescriptor {
    /// 声明一个类
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    /// 声明一个抽象类
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::AbstractClass)
    }

    /// 声明一个接口
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        Self {
            name: name.trim().trim_start_matches(SEPARATOR).to_string(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            constructor: None,
            methods: Vec::new(),
            fields: Vec::new(),
            annotations: Vec::new(),
            source: None,
        }
    }

    /// 设置父类
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// 追加实现的接口
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 设置构造器
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// 追加方法
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 追加字段
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// 追加类级属性注解
    pub fn with_annotation(mut self, annotation: PropertyAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// 设置声明源文本
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 规范化键
    pub fn key(&self) -> TypeKey {
        TypeKey::new(&self.name)
    }

    /// 短名（限定名末段）
    pub fn short_name(&self) -> &str {
        key::short_name(&self.name)
    }

    /// 所在命名空间
    pub fn namespace(&self) -> &str {
        key::namespace_of(&self.name)
    }

    /// 查找自身声明的方法
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// 是否可实例化
    pub fn is_instantiable(&self) -> bool {
        matches!(self.kind, TypeKind::Class)
    }
}
