/// Unwraps the `Err` side of a result, panicking with the `Ok` value
/// otherwise. An optional format string is appended to the panic message.
#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(e) => e,
            Ok(actual) => {
                #[allow(unused_mut)]
                let mut msg = format!("expected `Err`; actual=Ok({:?})", actual);

                $(
                    msg.push_str(", ");
                    msg.push_str(&format!($($t)*));
                )?

                panic!("{}", msg);
            }
        }
    };
}

#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(err) => panic!("expected `Ok`; actual=Err({:?})", err),
        }
    };
}

/// Asserts the expression fails and that the error satisfies the given
/// predicate method, e.g. `assert_err_kind!(res, is_validation)`.
#[macro_export]
macro_rules! assert_err_kind {
    ($e:expr, $pred:ident) => {{
        let err = $crate::assert_err!($e);
        assert!(
            err.$pred(),
            "expected error matching `{}`; actual={}",
            stringify!($pred),
            err
        );
        err
    }};
}
