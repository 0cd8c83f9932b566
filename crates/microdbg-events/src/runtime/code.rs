use super::Handle;

/// Trait providing functions for working with stack frames.
pub trait Frame: Handle {
    /// Type of the function executing in the frame.
    type Function: Function;

    /// Returns the function executing in the frame, if known.
    fn function(&self) -> Option<Self::Function>;
}

/// Trait providing functions for working with functions.
///
/// The embedded runtime executes a compact form of the IL code, so that
/// instruction offsets it reports don't match the offsets found in the
/// standard IL code of the function.
pub trait Function: Handle {
    /// Returns whether symbol information is available for this function.
    fn has_symbols(&self) -> bool;

    /// Converts an instruction offset of the compact IL code into the
    /// corresponding offset of the standard IL code.
    ///
    /// # Note
    ///
    /// Only meaningful when [has_symbols](Self::has_symbols) is `true`.
    fn standard_offset(&self, compact_offset: u32) -> u32;
}
