//! 比较器注册表
//!
//! 按类型标签返回三路比较函数。注册表是对标签枚举的穷尽匹配，
//! 新增标签时编译器会强制在这里做出选择。

use crate::object::{RuntimeError, TypeTag, Value};
use std::cmp::Ordering;

/// 三路比较函数
pub type Comparator = fn(&Value, &Value) -> Result<Ordering, RuntimeError>;

/// 获取某个类型的比较器
///
/// | 标签 | 比较方式 |
/// |------|----------|
/// | String | 字节字典序 |
/// | Int | 有符号数值 |
/// | Any / WideInt / List / Set | 盒子标识 |
/// | 其它 | 未注册 |
pub fn comparator(tag: TypeTag) -> Result<Comparator, RuntimeError> {
    match tag {
        TypeTag::String => Ok(compare_strings),
        TypeTag::Int => Ok(compare_ints),
        TypeTag::Any | TypeTag::WideInt | TypeTag::List | TypeTag::Set => Ok(compare_identity),
        TypeTag::None | TypeTag::Map | TypeTag::Record | TypeTag::Fields => {
            Err(RuntimeError::UnregisteredComparator(tag))
        }
    }
}

fn operand_mismatch(comparator: TypeTag, found: TypeTag) -> RuntimeError {
    RuntimeError::ComparatorOperand { comparator, found }
}

fn compare_strings(lhs: &Value, rhs: &Value) -> Result<Ordering, RuntimeError> {
    let l = lhs
        .as_str()
        .ok_or_else(|| operand_mismatch(TypeTag::String, lhs.tag()))?;
    let r = rhs
        .as_str()
        .ok_or_else(|| operand_mismatch(TypeTag::String, rhs.tag()))?;
    Ok(l.as_bytes().cmp(r.as_bytes()))
}

fn compare_ints(lhs: &Value, rhs: &Value) -> Result<Ordering, RuntimeError> {
    let l = lhs
        .as_int()
        .ok_or_else(|| operand_mismatch(TypeTag::Int, lhs.tag()))?;
    let r = rhs
        .as_int()
        .ok_or_else(|| operand_mismatch(TypeTag::Int, rhs.tag()))?;
    Ok(l.cmp(&r))
}

/// 没有值语义顺序的类型按盒子标识排序：全序，但不表示语义相等
fn compare_identity(lhs: &Value, rhs: &Value) -> Result<Ordering, RuntimeError> {
    if lhs.tag() != rhs.tag() {
        return Err(operand_mismatch(lhs.tag(), rhs.tag()));
    }
    Ok(lhs.id().cmp(&rhs.id()))
}
