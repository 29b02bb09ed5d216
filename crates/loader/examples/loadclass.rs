use std::env;

use jolt_class_file::ParseConfig;
use jolt_loader::{load_classes, ClassRegistry, Classpath};

fn main() {
    pretty_env_logger::init();

    let mut args = env::args().skip(1);
    let root = args.next().expect("usage: loadclass <classpath-root> <class>...");
    let names = args.collect::<Vec<_>>();

    let classpath = Classpath::new([root]);
    let registry = ClassRegistry::new();
    let config = ParseConfig {
        trace_format_check: true,
        ..ParseConfig::default()
    };

    let failures = load_classes(&classpath, &registry, &names, config);
    for (name, err) in &failures {
        eprintln!("{}: {}", name, err);
    }

    println!("{} classes loaded, {} failed", registry.len(), failures.len());
}
