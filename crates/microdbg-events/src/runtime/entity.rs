use super::Handle;

/// Trait providing functions for working with application domains.
pub trait AppDomain: Handle {
    /// Type of the process owning the application domain.
    type Process: Handle;

    /// Returns the process owning the application domain.
    fn process(&self) -> Self::Process;
}

/// Trait providing functions for working with assemblies.
pub trait Assembly: Handle {
    /// Type of the application domain the assembly is loaded into.
    type AppDomain: Handle;

    /// Returns the application domain the assembly is currently loaded into.
    fn app_domain(&self) -> Self::AppDomain;
}

/// Trait providing functions for working with classes.
pub trait Class: Handle {
    /// Type of the assembly defining the class.
    type Assembly: Handle;

    /// Returns the assembly defining the class.
    fn assembly(&self) -> Self::Assembly;
}
