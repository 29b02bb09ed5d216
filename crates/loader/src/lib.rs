mod classpath;
mod error;
mod registry;

use std::{
    sync::{Arc, Mutex},
    thread,
};

use jolt_class_file::{format_check, ParseConfig, ParsedClass};

pub use classpath::{ClassBytes, Classpath};
pub use error::LoaderError;
pub use registry::ClassRegistry;

/// Runs the whole pipeline for one class: locate the bytes, parse them,
/// format-check the result, and register it.
pub fn load_class(
    classpath: &Classpath,
    registry: &ClassRegistry,
    name: &str,
    config: ParseConfig,
) -> Result<Arc<ParsedClass>, LoaderError> {
    let bytes = classpath.locate(name)?;
    let class = ParsedClass::parse(&bytes, config)?;
    format_check(&class, &config)?;

    let class = registry.insert(name, class);
    log::debug!("Loaded class {}", name);
    Ok(class)
}

/// Loads every named class, fanning the pipelines out over a small worker
/// fleet. Each class is parsed and checked independently; a failure affects
/// only the class it belongs to, and all failures are collected and
/// returned.
pub fn load_classes(
    classpath: &Classpath,
    registry: &ClassRegistry,
    names: &[String],
    config: ParseConfig,
) -> Vec<(String, LoaderError)> {
    let queue = Mutex::new(names.iter());
    let failures = Mutex::new(Vec::new());
    let workers = thread::available_parallelism()
        .map(usize::from)
        .unwrap_or(1)
        .min(names.len())
        .max(1);

    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| loop {
                let name = match queue.lock().expect("work queue lock poisoned").next() {
                    Some(name) => name,
                    None => break,
                };
                if let Err(err) = load_class(classpath, registry, name, config) {
                    log::warn!("Failed to load class {}: {}", name, err);
                    failures
                        .lock()
                        .expect("failure list lock poisoned")
                        .push((name.clone(), err));
                }
            });
        }
    });

    failures.into_inner().expect("failure list lock poisoned")
}
