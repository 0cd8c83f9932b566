use std::fmt;

macro_rules! engine_code {
    (
        $(#[$attr:meta])*
        $name:ident($repr:ty) {
            $($(#[$const_attr:meta])* $code:ident = $value:expr,)*
        }
    ) => {
        $(#[$attr])*
        ///
        /// Values are defined by the debugger engine, and passed through
        /// unmodified (including the ones without a named constant).
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            $(
                $(#[$const_attr])*
                pub const $code: Self = Self($value);
            )*

            /// Returns the raw value of the code.
            pub const fn raw(self) -> $repr {
                self.0
            }

            /// Returns the name of the code, if known.
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$code => Some(stringify!($code)),)*
                    _ => None,
                }
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => f.debug_tuple(stringify!($name)).field(&self.0).finish(),
                }
            }
        }
    };
}

engine_code!(
    /// Logging level of a debug message.
    LoggingLevel(i32) {
        /// Trace level 0.
        TRACE_LEVEL0 = 0x0,
        /// Trace level 1.
        TRACE_LEVEL1 = 0x1,
        /// Trace level 2.
        TRACE_LEVEL2 = 0x2,
        /// Trace level 3.
        TRACE_LEVEL3 = 0x3,
        /// Trace level 4.
        TRACE_LEVEL4 = 0x4,
        /// Status level 0.
        STATUS_LEVEL0 = 0x14,
        /// Status level 1.
        STATUS_LEVEL1 = 0x15,
        /// Status level 2.
        STATUS_LEVEL2 = 0x16,
        /// Status level 3.
        STATUS_LEVEL3 = 0x17,
        /// Status level 4.
        STATUS_LEVEL4 = 0x18,
        /// Warning.
        WARNING = 0x28,
        /// Error.
        ERROR = 0x32,
        /// Panic.
        PANIC = 0x64,
    }
);

engine_code!(
    /// Reason why a step operation completed.
    StepReason(u32) {
        /// The step completed normally, within the same function.
        NORMAL = 0,
        /// The step returned from the function.
        RETURN = 1,
        /// The step entered a called function.
        CALL = 2,
        /// The step entered an exception filter.
        EXCEPTION_FILTER = 3,
        /// The step entered an exception handler.
        EXCEPTION_HANDLER = 4,
        /// The step was intercepted.
        INTERCEPT = 5,
        /// The step exited the thread.
        EXIT = 6,
    }
);

engine_code!(
    /// Phase of an exception being reported.
    ExceptionPhase(u32) {
        /// The exception was just thrown.
        FIRST_CHANCE = 1,
        /// The exception was just thrown within user code.
        USER_FIRST_CHANCE = 2,
        /// A handler catching the exception was found.
        CATCH_HANDLER_FOUND = 3,
        /// No handler catches the exception.
        UNHANDLED = 4,
    }
);

impl ExceptionPhase {
    /// Returns whether the exception was just thrown (no handler search
    /// happened yet).
    pub const fn is_first_chance(self) -> bool {
        matches!(self, Self::FIRST_CHANCE | Self::USER_FIRST_CHANCE)
    }
}

engine_code!(
    /// Kind of exception unwind being reported.
    UnwindKind(u32) {
        /// The unwind phase begins.
        BEGIN = 1,
        /// The exception was intercepted by the debugger.
        INTERCEPTED = 2,
    }
);

/// Flags attached to an exception being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExceptionFlags(u32);

impl ExceptionFlags {
    /// No flag set.
    pub const NONE: Self = Self(0);

    /// The exception can be intercepted by the debugger.
    pub const CAN_BE_INTERCEPTED: Self = Self(1);

    /// Returns the raw value of the flags.
    pub const fn bits(self) -> u32 {
        self.0
    }
}
