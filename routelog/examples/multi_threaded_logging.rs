use std::sync::mpsc::channel;

use routelog::{ConsoleParams, FileParams, Level, Logger, Scope};

const WORKER: Scope = Scope::new().module("worker");

fn main() {
    // main thread logs to stdout through the process-wide logger
    routelog::init_logger(ConsoleParams::stdout().with_module_name("main thread")).unwrap();
    routelog::info!("Hello, world!");
    // worker threads share one file logger
    let path = "/tmp/routelog_workers.log";
    let workers = Logger::new();
    workers
        .init(FileParams::new(path).with_min_level(Level::Info))
        .unwrap();
    std::thread::scope(|s| {
        let senders: Vec<_> = (0..5)
            .map(|i| {
                let (sender, receiver) = channel::<&'static str>();
                let workers = &workers;
                s.spawn(move || {
                    routelog::func_entry!(logger: workers, scope: WORKER);
                    for message in receiver {
                        routelog::warn!(
                            logger: workers,
                            scope: WORKER,
                            "thread {i} received: {message}"
                        );
                    }
                    routelog::func_exit!(logger: workers, scope: WORKER);
                });
                sender
            })
            .collect();
        for sender in senders {
            sender.send("Hello, world!").unwrap();
        }
    });
    workers.deinit().unwrap();
    for line in std::fs::read_to_string(path).unwrap().lines().skip(2) {
        routelog::info!("{path}: {line}");
    }
    routelog::deinit_logger().unwrap();
}
