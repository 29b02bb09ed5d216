use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use jolt_class_file::ParsedClass;

/// The shared table of loaded classes, keyed by binary name. Classes are
/// inserted only after they pass the format check; lookups hand out shared
/// references, so a registered class is immutable from here on.
#[derive(Default)]
pub struct ClassRegistry {
    classes: Mutex<HashMap<String, Arc<ParsedClass>>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>, class: ParsedClass) -> Arc<ParsedClass> {
        let class = Arc::new(class);
        self.lock().insert(name.into(), Arc::clone(&class));
        class
    }

    pub fn get(&self, name: &str) -> Option<Arc<ParsedClass>> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<ParsedClass>>> {
        self.classes.lock().expect("class registry lock poisoned")
    }
}
