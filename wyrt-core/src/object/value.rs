//! 装箱值（Object 层）
//!
//! 每个运行时值都是一个带类型标签、引用计数的盒子。
//! 引用计数直接使用 `Rc`：
//! - 构造函数返回计数为 1 的新盒子
//! - `retain` 即 `Rc::clone`
//! - 释放即丢弃句柄，计数归零时盒子连同载荷一起回收
//!
//! 恒等比较使用构造时分配的 `BoxId`，不依赖内存地址。

use super::error::RuntimeError;
use super::tag::TypeTag;
use crate::runtime::list::List;
use crate::runtime::map::Map;
use crate::runtime::set::Set;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// 盒子的稳定标识，按构造顺序单调递增
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(pub u64);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_BOX_ID: AtomicU64 = AtomicU64::new(1);

fn next_box_id() -> BoxId {
    BoxId(NEXT_BOX_ID.fetch_add(1, Ordering::Relaxed))
}

/// 按类型区分的载荷
pub enum Payload {
    None,
    Any,
    String(String),
    Int(i64),
    /// 保留扩展点，没有内容
    WideInt,
    List(RefCell<List>),
    Set(RefCell<Set>),
    Map(RefCell<Map>),
    Record,
    Fields,
}

impl Payload {
    pub fn tag(&self) -> TypeTag {
        match self {
            Payload::None => TypeTag::None,
            Payload::Any => TypeTag::Any,
            Payload::String(_) => TypeTag::String,
            Payload::Int(_) => TypeTag::Int,
            Payload::WideInt => TypeTag::WideInt,
            Payload::List(_) => TypeTag::List,
            Payload::Set(_) => TypeTag::Set,
            Payload::Map(_) => TypeTag::Map,
            Payload::Record => TypeTag::Record,
            Payload::Fields => TypeTag::Fields,
        }
    }
}

/// 盒子本体
pub struct ObjBox {
    id: BoxId,
    payload: Payload,
}

/// 装箱值句柄
///
/// 克隆句柄就是增加引用计数。句柄不是 `Send`，运行时是单线程的。
#[derive(Clone)]
pub struct Value(Rc<ObjBox>);

impl Value {
    // ==================== 构造 ====================

    pub(crate) fn new(payload: Payload) -> Self {
        Value(Rc::new(ObjBox {
            id: next_box_id(),
            payload,
        }))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(Payload::String(text.into()))
    }

    pub fn int(n: i64) -> Self {
        Self::new(Payload::Int(n))
    }

    /// 创建没有内容的盒子（None、Any、WideInt、Record、Fields）
    pub fn empty(tag: TypeTag) -> Result<Self, RuntimeError> {
        let payload = match tag {
            TypeTag::None => Payload::None,
            TypeTag::Any => Payload::Any,
            TypeTag::WideInt => Payload::WideInt,
            TypeTag::Record => Payload::Record,
            TypeTag::Fields => Payload::Fields,
            TypeTag::String | TypeTag::Int | TypeTag::List | TypeTag::Set | TypeTag::Map => {
                return Err(RuntimeError::MissingPayload(tag))
            }
        };
        Ok(Self::new(payload))
    }

    // ==================== 引用计数 ====================

    /// 增加引用计数，返回指向同一个盒子的新句柄
    #[inline]
    pub fn retain(&self) -> Value {
        Value(Rc::clone(&self.0))
    }

    /// 当前存活的拥有者数量
    #[inline]
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// 不占引用计数的观察句柄，用于确认盒子是否已被回收
    pub fn downgrade(&self) -> WeakValue {
        WeakValue(Rc::downgrade(&self.0))
    }

    // ==================== 访问 ====================

    #[inline]
    pub fn id(&self) -> BoxId {
        self.0.id
    }

    #[inline]
    pub fn tag(&self) -> TypeTag {
        self.0.payload.tag()
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.0.payload
    }

    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.0.payload {
            Payload::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.0.payload {
            Payload::Int(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn as_list(&self) -> Option<&RefCell<List>> {
        match &self.0.payload {
            Payload::List(list) => Some(list),
            _ => None,
        }
    }

    pub(crate) fn as_set(&self) -> Option<&RefCell<Set>> {
        match &self.0.payload {
            Payload::Set(set) => Some(set),
            _ => None,
        }
    }

    pub(crate) fn as_map(&self) -> Option<&RefCell<Map>> {
        match &self.0.payload {
            Payload::Map(map) => Some(map),
            _ => None,
        }
    }
}

// 容器可能成环，Debug 不递归进入载荷
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.payload {
            Payload::String(s) => write!(f, "{}:string({s:?})", self.id()),
            Payload::Int(n) => write!(f, "{}:int({n})", self.id()),
            other => write!(f, "{}:{}", self.id(), other.tag()),
        }
    }
}

/// 弱句柄
#[derive(Clone)]
pub struct WeakValue(Weak<ObjBox>);

impl WeakValue {
    /// 盒子是否还有拥有者
    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub fn upgrade(&self) -> Option<Value> {
        self.0.upgrade().map(Value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_start_at_one() {
        let s = Value::string("hello");
        let n = Value::int(-7);
        assert_eq!(s.refcount(), 1);
        assert_eq!(n.refcount(), 1);
        assert_eq!(s.tag(), TypeTag::String);
        assert_eq!(s.as_str(), Some("hello"));
        assert_eq!(n.as_int(), Some(-7));
        assert_eq!(n.as_str(), None);
    }

    #[test]
    fn test_ids_increase() {
        let a = Value::int(1);
        let b = Value::int(1);
        assert!(a.id() < b.id());
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_retain_and_drop() {
        let v = Value::string("x");
        let weak = v.downgrade();
        let copy = v.retain();
        assert_eq!(v.refcount(), 2);
        assert!(copy.ptr_eq(&v));
        assert_eq!(copy.id(), v.id());

        drop(copy);
        assert_eq!(v.refcount(), 1);
        assert!(weak.is_live());

        drop(v);
        assert!(!weak.is_live());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_empty_boxes() {
        assert_eq!(Value::empty(TypeTag::Record).unwrap().tag(), TypeTag::Record);
        assert_eq!(Value::empty(TypeTag::Any).unwrap().tag(), TypeTag::Any);
        assert_eq!(
            Value::empty(TypeTag::String).unwrap_err(),
            RuntimeError::MissingPayload(TypeTag::String)
        );
    }

    #[test]
    fn test_debug_format() {
        let v = Value::int(42);
        assert_eq!(format!("{v:?}"), format!("#{}:int(42)", v.id().0));
    }
}
