//! Event Values - 디스패치 인자와 런타임 타입 디스크립터
//!
//! 리스너 시그니처 검증은 리플렉션 대신 저장된 [`TypeDesc`] 비교로 수행합니다.

use crate::{Error, Result};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ============================================================================
// TypeDesc
// ============================================================================

/// 런타임 타입 디스크립터
///
/// 동등성은 `TypeId`로만 판단하고, 이름은 로그와 에러 메시지용입니다.
#[derive(Clone, Copy)]
pub struct TypeDesc {
    id: TypeId,
    name: &'static str,
}

impl TypeDesc {
    /// 타입 `T`의 디스크립터
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 타입 `T`와 같은지 확인
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDesc({})", self.name)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Arg
// ============================================================================

/// 디스패치 인자
///
/// 값은 `Arc`로 공유되므로 같은 인자를 여러 리스너에 넘겨도 복사 비용이 없습니다.
#[derive(Clone)]
pub struct Arg {
    ty: TypeDesc,
    value: Arc<dyn Any + Send + Sync>,
}

impl Arg {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            ty: TypeDesc::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// 인자의 타입 디스크립터
    pub fn type_desc(&self) -> TypeDesc {
        self.ty
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.ty.is::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arg({})", self.ty.name)
    }
}

/// 인자 목록 생성 매크로
///
/// ```ignore
/// registry.emit("log", &args!["INFO".to_string(), 1, 2, 3])?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::new($value)),+]
    };
}

/// 동적 리스너의 반환값
pub type DynValue = Box<dyn Any + Send>;

// ============================================================================
// CallArgs
// ============================================================================

/// 시그니처에 바인딩된 호출 인자
///
/// `fixed`는 고정 파라미터에 위치별로, `rest`는 가변 꼬리에 순서대로 바인딩됩니다.
#[derive(Debug, Clone)]
pub struct CallArgs {
    event: Arc<str>,
    fixed: Vec<Arg>,
    rest: Vec<Arg>,
}

impl CallArgs {
    pub(crate) fn new(event: Arc<str>, fixed: Vec<Arg>, rest: Vec<Arg>) -> Self {
        Self { event, fixed, rest }
    }

    /// 디스패치 중인 이벤트 이름
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn fixed(&self) -> &[Arg] {
        &self.fixed
    }

    pub fn rest(&self) -> &[Arg] {
        &self.rest
    }

    /// 고정 인자 개수
    pub fn len(&self) -> usize {
        self.fixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    /// `index` 위치의 고정 인자를 `T`로 꺼내기
    pub fn get<T: Clone + 'static>(&self, index: usize) -> Result<T> {
        let arg = self.fixed.get(index).ok_or_else(|| Error::ArityMismatch {
            event: self.event.to_string(),
            expected: format!("more than {}", index),
            supplied: self.fixed.len(),
        })?;
        self.extract(arg, index)
    }

    /// 가변 꼬리 전체를 `Vec<T>`로 꺼내기
    pub fn rest_as<T: Clone + 'static>(&self) -> Result<Vec<T>> {
        let offset = self.fixed.len();
        self.rest
            .iter()
            .enumerate()
            .map(|(i, arg)| self.extract(arg, offset + i))
            .collect()
    }

    fn extract<T: Clone + 'static>(&self, arg: &Arg, position: usize) -> Result<T> {
        arg.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| Error::TypeMismatch {
                event: self.event.to_string(),
                position,
                expected: std::any::type_name::<T>(),
                found: arg.type_desc().name(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_desc_equality() {
        assert_eq!(TypeDesc::of::<i32>(), TypeDesc::of::<i32>());
        assert_ne!(TypeDesc::of::<i32>(), TypeDesc::of::<i64>());
        assert_ne!(TypeDesc::of::<String>(), TypeDesc::of::<&'static str>());
        assert!(TypeDesc::of::<u8>().is::<u8>());
    }

    #[test]
    fn test_args_macro() {
        let empty = args![];
        assert!(empty.is_empty());

        let list = args!["INFO".to_string(), 1, 2u8];
        assert_eq!(list.len(), 3);
        assert!(list[0].is::<String>());
        assert!(list[1].is::<i32>());
        assert_eq!(list[2].downcast_ref::<u8>(), Some(&2));
    }

    #[test]
    fn test_call_args_extract() {
        let call = CallArgs::new(
            Arc::from("log"),
            args!["INFO".to_string()],
            args![1, 2, 3],
        );

        assert_eq!(call.event(), "log");
        assert_eq!(call.get::<String>(0).unwrap(), "INFO");
        assert_eq!(call.rest_as::<i32>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_call_args_wrong_type() {
        let call = CallArgs::new(Arc::from("log"), args![1u64], args![1, "two"]);

        match call.get::<i32>(0) {
            Err(Error::TypeMismatch { position, .. }) => assert_eq!(position, 0),
            other => panic!("unexpected: {:?}", other),
        }
        match call.rest_as::<i32>() {
            Err(Error::TypeMismatch { position, .. }) => assert_eq!(position, 2),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(call.get::<u64>(5), Err(Error::ArityMismatch { .. })));
    }
}
