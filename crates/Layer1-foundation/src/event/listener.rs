//! Event Listener - 리스너 정의와 호출 어댑터
//!
//! 리스너는 세 가지 형태 중 하나입니다:
//! - 고정 인자 클로저: `Fn(A1, .., An) -> Result<(), E>` ([`Listener::new`])
//! - 가변 인자 클로저: `Fn(A1, .., Ak, Vec<T>) -> Result<(), E>` ([`Listener::variadic`])
//! - 동적 어댑터: 명시적 [`Signature`] + `Fn(&CallArgs) -> Vec<DynValue>` ([`Listener::dynamic`])
//!
//! 모든 형태는 등록 시점에 [`Signature`]로 정규화되어 같은 규칙으로 검증됩니다.

use super::signature::Signature;
use super::value::{CallArgs, DynValue, TypeDesc};
use crate::{Error, Result};
use std::fmt;

// ============================================================================
// Outcome
// ============================================================================

/// 리스너가 반환하는 에러
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// 리스너 실패 지시자 (`Ok(())` = 실패 없음)
pub type Outcome = std::result::Result<(), ListenerError>;

/// 리스너 반환값을 [`Outcome`]으로 변환
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl<E> IntoOutcome for std::result::Result<(), E>
where
    E: Into<ListenerError>,
{
    fn into_outcome(self) -> Outcome {
        self.map_err(Into::into)
    }
}

/// 동적 리스너가 반환할 값으로 감싸기
pub fn dyn_outcome(outcome: Outcome) -> DynValue {
    Box::new(outcome)
}

// ============================================================================
// Typed Handlers
// ============================================================================

/// 고정 인자 클로저 어댑터
///
/// `Marker`는 인자 튜플로, 아리티별 구현을 구분합니다.
pub trait FixedHandler<Marker>: Send + Sync + 'static {
    fn signature() -> Signature;

    fn call(&self, args: &CallArgs) -> Result<Outcome>;
}

/// 가변 인자 클로저 어댑터 (마지막 `Vec<T>` 파라미터가 가변 꼬리)
pub trait VariadicHandler<Marker>: Send + Sync + 'static {
    fn signature() -> Signature;

    fn call(&self, args: &CallArgs) -> Result<Outcome>;
}

macro_rules! impl_fixed_handler {
    ($($ty:ident : $idx:tt),*) => {
        impl<F, R, $($ty,)*> FixedHandler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: IntoOutcome,
            $($ty: Clone + Send + Sync + 'static,)*
        {
            fn signature() -> Signature {
                Signature::new(vec![$(TypeDesc::of::<$ty>()),*])
            }

            #[allow(unused_variables)]
            fn call(&self, args: &CallArgs) -> Result<Outcome> {
                Ok((self)($(args.get::<$ty>($idx)?),*).into_outcome())
            }
        }
    };
}

macro_rules! impl_variadic_handler {
    ($($ty:ident : $idx:tt),*) => {
        impl<F, R, T, $($ty,)*> VariadicHandler<($($ty,)* Vec<T>,)> for F
        where
            F: Fn($($ty,)* Vec<T>) -> R + Send + Sync + 'static,
            R: IntoOutcome,
            T: Clone + Send + Sync + 'static,
            $($ty: Clone + Send + Sync + 'static,)*
        {
            fn signature() -> Signature {
                Signature::variadic(vec![$(TypeDesc::of::<$ty>()),*], TypeDesc::of::<T>())
            }

            fn call(&self, args: &CallArgs) -> Result<Outcome> {
                Ok((self)($(args.get::<$ty>($idx)?,)* args.rest_as::<T>()?).into_outcome())
            }
        }
    };
}

impl_fixed_handler!();
impl_fixed_handler!(A1: 0);
impl_fixed_handler!(A1: 0, A2: 1);
impl_fixed_handler!(A1: 0, A2: 1, A3: 2);
impl_fixed_handler!(A1: 0, A2: 1, A3: 2, A4: 3);
impl_fixed_handler!(A1: 0, A2: 1, A3: 2, A4: 3, A5: 4);
impl_fixed_handler!(A1: 0, A2: 1, A3: 2, A4: 3, A5: 4, A6: 5);
impl_fixed_handler!(A1: 0, A2: 1, A3: 2, A4: 3, A5: 4, A6: 5, A7: 6);
impl_fixed_handler!(A1: 0, A2: 1, A3: 2, A4: 3, A5: 4, A6: 5, A7: 6, A8: 7);

impl_variadic_handler!();
impl_variadic_handler!(A1: 0);
impl_variadic_handler!(A1: 0, A2: 1);
impl_variadic_handler!(A1: 0, A2: 1, A3: 2);
impl_variadic_handler!(A1: 0, A2: 1, A3: 2, A4: 3);
impl_variadic_handler!(A1: 0, A2: 1, A3: 2, A4: 3, A5: 4);
impl_variadic_handler!(A1: 0, A2: 1, A3: 2, A4: 3, A5: 4, A6: 5);
impl_variadic_handler!(A1: 0, A2: 1, A3: 2, A4: 3, A5: 4, A6: 5, A7: 6);

// ============================================================================
// Listener
// ============================================================================

type TypedFn = dyn Fn(&CallArgs) -> Result<Outcome> + Send + Sync;
type DynamicFn = dyn Fn(&CallArgs) -> Vec<DynValue> + Send + Sync;

/// 호출 형태
enum Invoker {
    Typed(Box<TypedFn>),
    Dynamic(Box<DynamicFn>),
}

/// 등록 가능한 리스너
pub struct Listener {
    /// 리스너 이름 (디버깅용)
    name: Option<String>,
    signature: Signature,
    invoker: Invoker,
}

impl Listener {
    /// 고정 인자 클로저로 리스너 생성
    ///
    /// ```ignore
    /// let listener = Listener::new(|a: i32, b: i32| -> anyhow::Result<()> {
    ///     println!("{}", a + b);
    ///     Ok(())
    /// });
    /// ```
    pub fn new<M, F>(handler: F) -> Self
    where
        F: FixedHandler<M>,
    {
        Self {
            name: None,
            signature: F::signature(),
            invoker: Invoker::Typed(Box::new(move |args: &CallArgs| handler.call(args))),
        }
    }

    /// 가변 인자 클로저로 리스너 생성
    ///
    /// 마지막 `Vec<T>` 파라미터가 남은 인자 전부를 받습니다.
    pub fn variadic<M, F>(handler: F) -> Self
    where
        F: VariadicHandler<M>,
    {
        Self {
            name: None,
            signature: F::signature(),
            invoker: Invoker::Typed(Box::new(move |args: &CallArgs| handler.call(args))),
        }
    }

    /// 동적 어댑터로 리스너 생성
    ///
    /// 선언된 반환 형태는 등록 시 검증되고, 실제 반환값은 디스패치 시
    /// `Outcome` 하나인지 다시 확인됩니다.
    pub fn dynamic<F>(signature: Signature, handler: F) -> Self
    where
        F: Fn(&CallArgs) -> Vec<DynValue> + Send + Sync + 'static,
    {
        Self {
            name: None,
            signature,
            invoker: Invoker::Dynamic(Box::new(handler)),
        }
    }

    /// 이름 지정 (로그용)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// 등록 가능 여부 검증
    pub(crate) fn validate(&self, event: &str) -> Result<()> {
        self.signature.check_returns(event)
    }

    /// 바인딩된 인자로 호출
    ///
    /// 바깥 `Result`는 호출 자체의 오류, 안쪽 `Outcome`은 리스너가 보고한 실패.
    pub(crate) fn invoke(&self, args: &CallArgs) -> Result<Outcome> {
        match &self.invoker {
            Invoker::Typed(call) => call(args),
            Invoker::Dynamic(call) => {
                let mut values = call(args);
                if values.len() != 1 {
                    return Err(Error::bad_return_shape(
                        args.event(),
                        format!("dynamic listener returned {} values", values.len()),
                    ));
                }
                match values.pop().map(|value| value.downcast::<Outcome>()) {
                    Some(Ok(outcome)) => Ok(*outcome),
                    _ => Err(Error::bad_return_shape(
                        args.event(),
                        "dynamic listener returned a non-Outcome value",
                    )),
                }
            }
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name())
            .field("signature", &self.signature.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn bind(listener: &Listener, args: &[crate::Arg]) -> Result<CallArgs> {
        listener.signature().bind(&Arc::from("test.event"), args)
    }

    #[test]
    fn test_fixed_signature() {
        let listener = Listener::new(|_a: i32, _b: String| -> anyhow::Result<()> { Ok(()) });
        let sig = listener.signature();

        assert!(!sig.is_variadic());
        assert_eq!(sig.params(), &[TypeDesc::of::<i32>(), TypeDesc::of::<String>()]);
        assert!(listener.validate("test.event").is_ok());
    }

    #[test]
    fn test_zero_arity() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let listener = Listener::new(move || -> anyhow::Result<()> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let call = bind(&listener, &args![]).unwrap();
        assert!(listener.invoke(&call).unwrap().is_ok());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_variadic_invoke() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let listener = Listener::variadic(
            move |prefix: String, nums: Vec<i32>| -> anyhow::Result<()> {
                *sink.lock().unwrap() = Some((prefix, nums));
                Ok(())
            },
        );

        assert!(listener.signature().is_variadic());
        assert_eq!(listener.signature().fixed_count(), 1);

        let call = bind(&listener, &args!["INFO".to_string(), 1, 2, 3]).unwrap();
        listener.invoke(&call).unwrap().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            Some(("INFO".to_string(), vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_listener_failure_outcome() {
        let listener = Listener::new(|| -> std::result::Result<(), String> {
            Err("some error".to_string())
        });

        let call = bind(&listener, &args![]).unwrap();
        let outcome = listener.invoke(&call).unwrap();
        assert_eq!(outcome.unwrap_err().to_string(), "some error");
    }

    #[test]
    fn test_dynamic_listener() {
        let sig = Signature::new(vec![TypeDesc::of::<i32>()]);
        let listener = Listener::dynamic(sig, |args| {
            let n: i32 = args.fixed()[0].downcast_ref::<i32>().copied().unwrap_or_default();
            let outcome: Outcome = if n > 0 { Ok(()) } else { Err("non-positive".into()) };
            vec![dyn_outcome(outcome)]
        })
        .with_name("positive");

        assert_eq!(listener.name(), "positive");
        assert!(listener.validate("test.event").is_ok());

        let ok = bind(&listener, &args![3]).unwrap();
        assert!(listener.invoke(&ok).unwrap().is_ok());

        let bad = bind(&listener, &args![0]).unwrap();
        assert!(listener.invoke(&bad).unwrap().is_err());
    }

    #[test]
    fn test_dynamic_bad_return_shape() {
        let declared_none = Listener::dynamic(Signature::new(vec![]).with_returns(vec![]), |_| {
            Vec::new()
        });
        assert!(matches!(
            declared_none.validate("test.event"),
            Err(Error::BadReturnShape { .. })
        ));

        // 선언과 달리 잘못된 값을 반환하는 경우
        let liar = Listener::dynamic(Signature::new(vec![]), |_| vec![Box::new(42i32) as DynValue]);
        assert!(liar.validate("test.event").is_ok());

        let call = bind(&liar, &args![]).unwrap();
        assert!(matches!(liar.invoke(&call), Err(Error::BadReturnShape { .. })));
    }
}
