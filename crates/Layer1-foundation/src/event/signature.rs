//! Listener Signature - 파라미터 디스크립터와 인자 바인딩

use super::listener::Outcome;
use super::value::{Arg, CallArgs, TypeDesc};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// 리스너 호출 시그니처
///
/// `variadic`이 설정되면 `params`의 마지막 항목은 가변 꼬리의 원소 타입입니다.
/// 선언된 반환 타입은 등록 시 반환 형태 검증에만 쓰이고, 시그니처 동등성에는
/// 포함되지 않습니다.
#[derive(Debug, Clone)]
pub struct Signature {
    params: Vec<TypeDesc>,
    variadic: bool,
    returns: Vec<TypeDesc>,
}

impl Signature {
    /// 고정 인자 시그니처 (반환: `Outcome`)
    pub fn new(params: Vec<TypeDesc>) -> Self {
        Self {
            params,
            variadic: false,
            returns: vec![TypeDesc::of::<Outcome>()],
        }
    }

    /// 가변 인자 시그니처 (반환: `Outcome`)
    pub fn variadic(fixed: Vec<TypeDesc>, element: TypeDesc) -> Self {
        let mut params = fixed;
        params.push(element);
        Self {
            params,
            variadic: true,
            returns: vec![TypeDesc::of::<Outcome>()],
        }
    }

    /// 선언된 반환 타입 교체
    pub fn with_returns(mut self, returns: Vec<TypeDesc>) -> Self {
        self.returns = returns;
        self
    }

    pub fn params(&self) -> &[TypeDesc] {
        &self.params
    }

    pub fn returns(&self) -> &[TypeDesc] {
        &self.returns
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// 위치 바인딩되는 고정 파라미터 수
    pub fn fixed_count(&self) -> usize {
        if self.variadic {
            self.params.len() - 1
        } else {
            self.params.len()
        }
    }

    /// 가변 꼬리 원소 타입
    pub fn element(&self) -> Option<TypeDesc> {
        if self.variadic {
            self.params.last().copied()
        } else {
            None
        }
    }

    /// 파라미터 개수, 위치별 타입, 가변 여부가 모두 같은지 확인
    pub fn same_params(&self, other: &Signature) -> bool {
        self.variadic == other.variadic && self.params == other.params
    }

    /// 반환 형태가 정확히 `Outcome` 하나인지 검증
    pub(crate) fn check_returns(&self, event: &str) -> Result<()> {
        match self.returns.as_slice() {
            [ret] if ret.is::<Outcome>() => Ok(()),
            [ret] => Err(Error::bad_return_shape(
                event,
                format!(
                    "return type must be {}, found {}",
                    std::any::type_name::<Outcome>(),
                    ret
                ),
            )),
            rets => Err(Error::bad_return_shape(
                event,
                format!("listener must declare exactly one return value, found {}", rets.len()),
            )),
        }
    }

    /// 디스패치 인자를 시그니처에 바인딩
    ///
    /// 개수가 맞지 않으면 `ArityMismatch`, 타입이 맞지 않으면 `TypeMismatch`.
    pub(crate) fn bind(&self, event: &Arc<str>, args: &[Arg]) -> Result<CallArgs> {
        let fixed = self.fixed_count();

        if self.variadic && args.len() < fixed {
            return Err(Error::ArityMismatch {
                event: event.to_string(),
                expected: format!("at least {}", fixed),
                supplied: args.len(),
            });
        }
        if !self.variadic && args.len() != fixed {
            return Err(Error::ArityMismatch {
                event: event.to_string(),
                expected: fixed.to_string(),
                supplied: args.len(),
            });
        }

        let (head, tail) = args.split_at(fixed);

        for (position, (arg, expected)) in head.iter().zip(&self.params).enumerate() {
            check_type(event, position, arg, *expected)?;
        }

        if let Some(element) = self.element() {
            for (i, arg) in tail.iter().enumerate() {
                check_type(event, fixed + i, arg, element)?;
            }
        }

        Ok(CallArgs::new(Arc::clone(event), head.to_vec(), tail.to_vec()))
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.same_params(other)
    }
}

impl Eq for Signature {}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.variadic && i == last {
                f.write_str("...")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}

fn check_type(event: &Arc<str>, position: usize, arg: &Arg, expected: TypeDesc) -> Result<()> {
    if arg.type_desc() == expected {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            event: event.to_string(),
            position,
            expected: expected.name(),
            found: arg.type_desc().name(),
        })
    }
}
