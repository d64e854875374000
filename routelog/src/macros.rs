//! Call-site macros.
//!
//! Every macro accepts optional leading `logger: <&Logger>,` and `scope: <Scope>,`
//! arguments (in that order), then a `format!`-style message. Without
//! `logger:` the process-wide logger returned by [`global`](crate::global) is used.
//! Calls below the scope's or the crate's static minimum level are removed at
//! compile time: their arguments are not even evaluated.

/// Logs at an explicit, possibly runtime, level.
///
/// ```rust
/// use routelog::{Level, Logger, ConsoleParams};
///
/// let logger = Logger::new();
/// logger.init(ConsoleParams::stderr().with_min_level(Level::Info)).unwrap();
/// let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Trace };
/// assert!(routelog::log_at!(logger: &logger, level, "filtered at runtime").is_filtered());
/// ```
#[macro_export]
macro_rules! log_at {
    (logger: $logger:expr, scope: $scope:expr, $level:expr, $($arg:tt)+) => {
        $crate::__emit!(@runtime $logger, $scope, $level, $($arg)+)
    };
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::__emit!(@runtime $logger, $crate::Scope::DEFAULT, $level, $($arg)+)
    };
    (scope: $scope:expr, $level:expr, $($arg:tt)+) => {
        $crate::__emit!(@runtime $crate::global(), $scope, $level, $($arg)+)
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::__emit!(@runtime $crate::global(), $crate::Scope::DEFAULT, $level, $($arg)+)
    };
}

/// Logs at [`Level::Trace`](crate::Level::Trace).
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__log_at!(@fixed $crate::Level::Trace; $($arg)+) };
}

/// Logs at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__log_at!(@fixed $crate::Level::Debug; $($arg)+) };
}

/// Logs at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__log_at!(@fixed $crate::Level::Info; $($arg)+) };
}

/// Logs at [`Level::Warn`](crate::Level::Warn).
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__log_at!(@fixed $crate::Level::Warn; $($arg)+) };
}

/// Logs at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__log_at!(@fixed $crate::Level::Error; $($arg)+) };
}

/// Logs at [`Level::Fatal`](crate::Level::Fatal).
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => { $crate::__log_at!(@fixed $crate::Level::Fatal; $($arg)+) };
}

/// Logs entry into the enclosing function as `{ <name>`, at trace priority.
#[macro_export]
macro_rules! func_entry {
    () => {
        $crate::__func!(entry $crate::global(), $crate::Scope::DEFAULT)
    };
    (logger: $logger:expr, scope: $scope:expr) => {
        $crate::__func!(entry $logger, $scope)
    };
    (logger: $logger:expr) => {
        $crate::__func!(entry $logger, $crate::Scope::DEFAULT)
    };
    (scope: $scope:expr) => {
        $crate::__func!(entry $crate::global(), $scope)
    };
}

/// Logs the return from the enclosing function as `<name> : <line> }`, at trace priority.
#[macro_export]
macro_rules! func_exit {
    () => {
        $crate::__func!(exit $crate::global(), $crate::Scope::DEFAULT)
    };
    (logger: $logger:expr, scope: $scope:expr) => {
        $crate::__func!(exit $logger, $scope)
    };
    (logger: $logger:expr) => {
        $crate::__func!(exit $logger, $crate::Scope::DEFAULT)
    };
    (scope: $scope:expr) => {
        $crate::__func!(exit $crate::global(), $scope)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    (@$mode:ident $level:expr; logger: $logger:expr, scope: $scope:expr, $($arg:tt)+) => {
        $crate::__emit!(@$mode $logger, $scope, $level, $($arg)+)
    };
    (@$mode:ident $level:expr; logger: $logger:expr, $($arg:tt)+) => {
        $crate::__emit!(@$mode $logger, $crate::Scope::DEFAULT, $level, $($arg)+)
    };
    (@$mode:ident $level:expr; scope: $scope:expr, $($arg:tt)+) => {
        $crate::__emit!(@$mode $crate::global(), $scope, $level, $($arg)+)
    };
    (@$mode:ident $level:expr; $($arg:tt)+) => {
        $crate::__emit!(@$mode $crate::global(), $crate::Scope::DEFAULT, $level, $($arg)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    (@fixed $logger:expr, $scope:expr, $level:expr, $($arg:tt)+) => {
        if const { $scope.allows($level) } {
            $crate::__emit!(@call $logger, $scope, $level, $($arg)+)
        } else {
            $crate::Status::filtered()
        }
    };
    (@runtime $logger:expr, $scope:expr, $level:expr, $($arg:tt)+) => {{
        let level: $crate::Level = $level;
        if $scope.allows(level) {
            $crate::__emit!(@call $logger, $scope, level, $($arg)+)
        } else {
            $crate::Status::filtered()
        }
    }};
    (@call $logger:expr, $scope:expr, $level:expr, $($arg:tt)+) => {
        $crate::Status::from($crate::__private::dispatch(
            $logger,
            &$scope,
            $level,
            file!(),
            $crate::__function_name!(),
            line!(),
            format_args!($($arg)+),
        ))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __func {
    (entry $logger:expr, $scope:expr) => {
        if const { $scope.allows($crate::Level::Trace) } {
            $crate::Status::from($crate::Logger::func_entry(
                $logger,
                $crate::__function_name!(),
            ))
        } else {
            $crate::Status::filtered()
        }
    };
    (exit $logger:expr, $scope:expr) => {
        if const { $scope.allows($crate::Level::Trace) } {
            $crate::Status::from($crate::Logger::func_exit(
                $logger,
                $crate::__function_name!(),
                line!(),
            ))
        } else {
            $crate::Status::filtered()
        }
    };
}

/// Name of the enclosing function, closures skipped.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __here() {}
        $crate::__private::function_name($crate::__private::type_name_of(__here))
    }};
}
