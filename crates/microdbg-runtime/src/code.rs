use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Function of the debuggee, with optional symbol information.
#[derive(Clone)]
pub struct Function(Arc<FunctionInner>);

struct FunctionInner {
    token: u32,

    /// Compact IL offsets mapped to standard IL offsets.
    il_map: Option<BTreeMap<u32, u32>>,
}

impl Function {
    /// Creates a function without symbol information.
    pub fn new(token: u32) -> Self {
        Self(Arc::new(FunctionInner {
            token,
            il_map: None,
        }))
    }

    /// Creates a function with symbol information.
    ///
    /// `il_map` maps instruction offsets of the compact IL code to the
    /// offsets of the corresponding instructions in the standard IL code.
    pub fn with_symbols(token: u32, il_map: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self(Arc::new(FunctionInner {
            token,
            il_map: Some(il_map.into_iter().collect()),
        }))
    }

    /// Returns the metadata token of the function.
    pub fn token(&self) -> u32 {
        self.0.token
    }

    /// Converts a compact IL offset into a standard IL offset.
    ///
    /// Offsets falling between two mapped instructions are shifted along
    /// with the closest preceding one. Without symbol information, or when
    /// no mapped instruction precedes the offset, it is returned unchanged.
    pub fn standard_offset(&self, compact_offset: u32) -> u32 {
        let Some(il_map) = &self.0.il_map else {
            return compact_offset;
        };

        il_map
            .range(..=compact_offset)
            .next_back()
            .map_or(compact_offset, |(compact, standard)| {
                standard.saturating_add(compact_offset - compact)
            })
    }
}

impl microdbg_events::runtime::Function for Function {
    fn has_symbols(&self) -> bool {
        self.0.il_map.is_some()
    }

    fn standard_offset(&self, compact_offset: u32) -> u32 {
        self.standard_offset(compact_offset)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Function {}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("token", &format_args!("{:#x}", self.token()))
            .field("symbols", &self.0.il_map.is_some())
            .finish()
    }
}

/// Stack frame of a debuggee thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    depth: u32,
    function: Option<Function>,
}

impl Frame {
    /// Creates a frame executing the given function.
    pub fn new(depth: u32, function: &Function) -> Self {
        Self {
            depth,
            function: Some(function.clone()),
        }
    }

    /// Creates a frame whose function is unknown.
    pub const fn unknown(depth: u32) -> Self {
        Self {
            depth,
            function: None,
        }
    }

    /// Returns the depth of the frame in the thread's call stack.
    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

impl microdbg_events::runtime::Frame for Frame {
    type Function = Function;

    fn function(&self) -> Option<Self::Function> {
        self.function.clone()
    }
}
