/// Escapes the capturing of output from tests so it's visible even when the test succeeds.
pub fn test_print(message: &str) {
    use std::io::Write;

    std::io::stdout()
        .lock()
        .write_all(message.as_bytes())
        .unwrap();
}

/// Runs `f` and prints how long it took under `label`.
pub fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let start = std::time::Instant::now();
    let result = f();
    test_print(&format!("{}: {:?}\n", label, start.elapsed()));

    result
}
