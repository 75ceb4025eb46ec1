// Assertions on invariants that only a bug in this crate can break. Protocol violations by
// clients are never reported this way: those are logged and dropped.

#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}", file!(), line!(), format!($($arg)*))
    };
}

// Like `assert!`, but the message always carries the location, and the default message names
// the failed condition.
#[macro_export]
macro_rules! ensure_invariant {
    ($cond:expr $(,)?) => {
        if !($cond) {
            panic!("{}", $crate::internal_error_message!("`{}` does not hold", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            panic!("{}", $crate::internal_error_message!($($arg)+));
        }
    };
}
