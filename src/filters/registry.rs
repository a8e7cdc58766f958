//! Kernel registry for looking operators up by name.
//!
//! The collaborator that drives this crate usually knows operators only by a
//! string from its own configuration ("blur", "sobel_horizontal", ...). The
//! registry maps those names to kernel factories and runs chains of them.

use crate::convolution::convolve_any;
use crate::core::any::AnyMatrix;
use crate::core::error::{MatrixError, MatrixResult};
use crate::core::types::ElementType;
use crate::filters::apply::{blur_kernel_for, gaussian_kernel_for, kernel_for};
use crate::filters::kernels::{KernelCategory, KernelKind};
use indexmap::IndexMap;
use log::{debug, trace};
use std::sync::Arc;

/// Factory building a kernel for data of the given element kind.
pub type KernelFactory = Arc<dyn Fn(ElementType) -> MatrixResult<AnyMatrix> + Send + Sync>;

/// Registry entry containing the factory and what to show about it.
#[derive(Clone)]
pub struct KernelEntry {
    /// Factory function to create kernels.
    pub factory: KernelFactory,
    /// Human-readable summary.
    pub description: String,
    pub category: KernelCategory,
}

/// Registry for all named kernels.
pub struct KernelRegistry {
    /// Kernels indexed by their unique name.
    kernels: IndexMap<String, KernelEntry>,
    /// Kernel names grouped by category.
    categories: IndexMap<KernelCategory, Vec<String>>,
}

impl KernelRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            kernels: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the catalog kernels.
    ///
    /// Besides every [`KernelKind`], this registers `blur_5` and the Gaussian
    /// blurs `gaussian_blur_3`, `gaussian_blur_5` and `gaussian_blur_7` with
    /// their default sigma.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        for kind in KernelKind::ALL {
            registry.register(kind.name(), kind.description(), kind.category(), move |element_type| {
                kernel_for(kind, element_type)
            });
        }

        registry.register("blur_5", "5x5 box average", KernelCategory::Blur, |element_type| {
            blur_kernel_for(5, element_type)
        });

        for width in [3usize, 5, 7] {
            registry.register(
                &format!("gaussian_blur_{}", width),
                &format!("{}x{} Gaussian blur with default sigma", width, width),
                KernelCategory::Blur,
                move |element_type| gaussian_kernel_for(width, None, element_type),
            );
        }

        registry
    }

    /// Register a kernel factory under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, description: &str, category: KernelCategory, factory: F)
    where
        F: Fn(ElementType) -> MatrixResult<AnyMatrix> + Send + Sync + 'static,
    {
        trace!("Registering kernel '{}'", name);
        let entry = KernelEntry {
            factory: Arc::new(factory),
            description: description.to_string(),
            category,
        };

        if let Some(previous) = self.kernels.insert(name.to_string(), entry) {
            if let Some(names) = self.categories.get_mut(&previous.category) {
                names.retain(|n| n != name);
            }
        }

        self.categories
            .entry(category)
            .or_default()
            .push(name.to_string());
    }

    /// Get a registry entry.
    pub fn get(&self, name: &str) -> Option<&KernelEntry> {
        self.kernels.get(name)
    }

    /// Check if a kernel is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kernels.contains_key(name)
    }

    /// Get all registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kernels.keys().map(|s| s.as_str())
    }

    /// Get kernel names by category.
    pub fn by_category(&self, category: KernelCategory) -> Vec<&str> {
        self.categories
            .get(&category)
            .map(|names| names.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Unregister a kernel.
    pub fn unregister(&mut self, name: &str) -> bool {
        if let Some(entry) = self.kernels.shift_remove(name) {
            if let Some(names) = self.categories.get_mut(&entry.category) {
                names.retain(|n| n != name);
            }
            true
        } else {
            false
        }
    }

    /// Get the total number of registered kernels.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Build the kernel `name` for data of `element_type`.
    pub fn kernel(&self, name: &str, element_type: ElementType) -> MatrixResult<AnyMatrix> {
        let entry = self
            .kernels
            .get(name)
            .ok_or_else(|| MatrixError::UnknownKernel(name.to_string()))?;
        (entry.factory)(element_type)
    }

    /// Convolve `data` with the kernel registered as `name`.
    pub fn apply(&self, name: &str, data: &AnyMatrix) -> MatrixResult<AnyMatrix> {
        let kernel = self.kernel(name, data.element_type())?;
        convolve_any(data, &kernel)
    }

    /// Run `names` in order, feeding each result into the next.
    ///
    /// Every name is resolved before the first convolution runs, so an unknown
    /// name fails the chain without doing any work.
    pub fn apply_chain(&self, data: &AnyMatrix, names: &[&str]) -> MatrixResult<AnyMatrix> {
        if let Some(missing) = names.iter().find(|name| !self.contains(name)) {
            return Err(MatrixError::UnknownKernel(missing.to_string()));
        }

        let mut current = data.clone();
        for name in names {
            debug!("Applying '{}' to {}x{}", name, current.width(), current.height());
            current = self.apply(name, &current)?;
        }
        Ok(current)
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
