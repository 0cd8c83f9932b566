macro_rules! id_handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            id: u64,
        }

        impl $name {
            /// Creates a handle with the given ID.
            pub const fn new(id: u64) -> Self {
                Self { id }
            }

            /// Returns the handle's ID.
            pub const fn id(&self) -> u64 {
                self.id
            }
        }
    };
}

id_handle!(
    /// Breakpoint set by the debugger.
    Breakpoint
);

id_handle!(
    /// Stepper driving a step operation.
    Stepper
);

id_handle!(
    /// Function evaluation.
    Eval
);
