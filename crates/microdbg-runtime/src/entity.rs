use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Debuggee process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    id: u64,
}

impl Process {
    /// Creates a process handle.
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Returns the process ID.
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Application domain of the debuggee.
#[derive(Clone)]
pub struct AppDomain(Arc<AppDomainInner>);

struct AppDomainInner {
    id: u64,
    process: Process,
}

impl AppDomain {
    /// Creates an application domain within the given process.
    pub fn new(id: u64, process: &Process) -> Self {
        Self(Arc::new(AppDomainInner {
            id,
            process: process.clone(),
        }))
    }

    /// Returns the application domain's ID.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Returns the process owning the application domain.
    pub fn process(&self) -> Process {
        self.0.process.clone()
    }
}

impl microdbg_events::runtime::AppDomain for AppDomain {
    type Process = Process;

    fn process(&self) -> Self::Process {
        self.process()
    }
}

impl PartialEq for AppDomain {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for AppDomain {}

impl fmt::Debug for AppDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppDomain")
            .field("id", &self.id())
            .field("process", &self.0.process.id())
            .finish()
    }
}

/// Assembly (or module) loaded into an application domain.
#[derive(Clone)]
pub struct Assembly(Arc<AssemblyInner>);

struct AssemblyInner {
    id: u64,
    name: String,
    app_domain: RwLock<AppDomain>,
}

impl Assembly {
    /// Creates an assembly loaded into the given application domain.
    pub fn new(id: u64, name: impl Into<String>, app_domain: &AppDomain) -> Self {
        Self(Arc::new(AssemblyInner {
            id,
            name: name.into(),
            app_domain: RwLock::new(app_domain.clone()),
        }))
    }

    /// Returns the assembly's ID.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Returns the assembly's name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the application domain the assembly is currently loaded into.
    pub fn app_domain(&self) -> AppDomain {
        self.0
            .app_domain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Moves the assembly into another application domain.
    pub fn move_to(&self, app_domain: &AppDomain) {
        tracing::debug!(
            assembly = self.name(),
            app_domain = app_domain.id(),
            "assembly moved"
        );

        *self
            .0
            .app_domain
            .write()
            .unwrap_or_else(PoisonError::into_inner) = app_domain.clone();
    }
}

impl microdbg_events::runtime::Assembly for Assembly {
    type AppDomain = AppDomain;

    fn app_domain(&self) -> Self::AppDomain {
        self.app_domain()
    }
}

impl PartialEq for Assembly {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Assembly {}

impl fmt::Debug for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembly")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

/// Class defined by an assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    token: u32,
    assembly: Assembly,
}

impl Class {
    /// Creates a class defined by the given assembly.
    pub fn new(token: u32, assembly: &Assembly) -> Self {
        Self {
            token,
            assembly: assembly.clone(),
        }
    }

    /// Returns the metadata token of the class.
    pub const fn token(&self) -> u32 {
        self.token
    }

    /// Returns the assembly defining the class.
    pub fn assembly(&self) -> Assembly {
        self.assembly.clone()
    }
}

impl microdbg_events::runtime::Class for Class {
    type Assembly = Assembly;

    fn assembly(&self) -> Self::Assembly {
        self.assembly()
    }
}
