//! Runs every closure demonstration in order.

use crate::compare::{sort_with, ByName};
use crate::config::DemoConfig;
use crate::console::Console;
use crate::employee::{sample_roster, Employee};
use crate::error::Result;
use crate::function::{
    after_first_space, append_age, discarding_upper_case, do_string_operation, first_name,
    get_a_name, inc_by, last_name, upper_case_name, ConsumerExt, FunctionExt, UpperConcat,
};
use crate::launcher::{SleepOutcome, Snapshot, Spawn, TaskContext, TaskHandle};
use crate::predicate::{greater_than, less_than, print_employees_by_age, PredicateExt};
use crate::supplier::{random_below, rng_from_seed, take};
use std::fmt::Display;
use std::io;
use std::time::Duration;

/// Launches a task that waits for `delay` and then prints `value`.
///
/// A cancellation during the wait ends the task without printing.
pub fn launch_captured_printer<S: Spawn>(
    spawner: &S,
    console: &Console,
    value: Snapshot<i32>,
    delay: Duration,
) -> Result<TaskHandle> {
    let console = console.clone();
    spawner.launch_fallible("captured-value", move |ctx: &TaskContext| -> io::Result<()> {
        match ctx.sleep(delay) {
            SleepOutcome::Elapsed => console.line(value.get()),
            SleepOutcome::Cancelled => {
                tracing::info!(value = *value, "interrupted before printing");
                Ok(())
            }
        }
    })
}

/// Runs the demonstrations top to bottom.
///
/// Returns the handles of the tasks it launched; the caller decides whether
/// to wait for them. Only a task that cannot be started is an error: a
/// section whose output fails is logged and the next section still runs.
pub fn run<S: Spawn>(
    console: &Console,
    config: &DemoConfig,
    spawner: &S,
) -> Result<Vec<TaskHandle>> {
    let mut tasks = Vec::new();

    let out = console.clone();
    tasks.push(spawner.launch_fallible("greeter", move |_: &TaskContext| {
        out.line("Hello from a task launched with a closure.")
    })?);

    let out = console.clone();
    tasks.push(spawner.launch_fallible("block", move |_: &TaskContext| -> io::Result<()> {
        out.line("Line 1")?;
        out.line("Line 2")?;
        out.line("Line 3")
    })?);

    let mut employees = sample_roster();

    report("sorting", sorting(console, &mut employees));
    report("string operations", string_operations(console));

    report("captured values", console.heading("Captured values"));
    tasks.push(launch_captured_printer(
        spawner,
        console,
        Snapshot::new(config.captured_value),
        config.capture_delay(),
    )?);

    report("roster", roster(console, &employees));
    report("predicates", predicates(console, &employees));
    report("suppliers", suppliers(console, config));
    report("functions", functions(console, &employees));
    consumers(console);

    Ok(tasks)
}

fn report(section: &str, outcome: std::result::Result<(), impl Display>) {
    if let Err(err) = outcome {
        tracing::warn!(section, error = %err, "section output failed, continuing");
    }
}

fn sorting(console: &Console, employees: &mut [Employee]) -> io::Result<()> {
    console.heading("Sorting with comparators")?;
    sort_with(employees, &ByName);
    sort_with(employees, &|a: &Employee, b: &Employee| a.name().cmp(b.name()));
    for employee in employees.iter() {
        console.line(employee.name())?;
    }
    Ok(())
}

fn string_operations(console: &Console) -> io::Result<()> {
    console.heading("String operations")?;
    console.line(do_string_operation(&UpperConcat, "Andy", "Brown"))?;
    let upper_concat = |first: &str, second: &str| first.to_uppercase() + &second.to_uppercase();
    console.line(do_string_operation(&upper_concat, "Andy", "Brown"))
}

fn roster(console: &Console, employees: &[Employee]) -> io::Result<()> {
    console.line("---------------------------------------")?;
    employees.iter().try_for_each(|employee| -> io::Result<()> {
        console.line(employee.name())?;
        console.line(employee.age())
    })
}

fn predicates(console: &Console, employees: &[Employee]) -> io::Result<()> {
    console.heading("Predicates")?;
    print_employees_by_age(console, employees, "Employees over 30 : ", |e| e.age() > 30)?;
    print_employees_by_age(console, employees, "Employees under 30 : ", |e| e.age() < 30)?;
    print_employees_by_age(console, employees, "Employees over 18 : ", |e| e.age() > 18)?;

    let greater_than_15 = greater_than(15);
    let less_than_100 = less_than(100);
    console.line(greater_than_15(&20))?;
    console.line(less_than_100(&99))?;
    console.line(greater_than_15.and(less_than_100)(&44))
}

fn suppliers(console: &Console, config: &DemoConfig) -> Result<()> {
    console.heading("Suppliers")?;
    let mut random_supplier = random_below(rng_from_seed(config.seed), config.supplier_bound)?;
    for value in take(&mut random_supplier, config.supplier_draws) {
        console.line(value)?;
    }
    Ok(())
}

fn functions(console: &Console, employees: &[Employee]) -> io::Result<()> {
    console.heading("Functions")?;
    if let [first, second, ..] = employees {
        console.line(last_name(first))?;
        console.line(first_name(first))?;
        console.line(get_a_name(first_name, first))?;
        console.line(get_a_name(last_name, first))?;

        let upper_then_last =
            upper_case_name.and_then(|name: String| after_first_space(&name).to_string());
        console.line(upper_then_last(first))?;

        let upper_name = upper_case_name(second);
        console.line(append_age(&upper_name, second))?;
    }

    let inc_by_5 = inc_by(5);
    console.line(inc_by_5(10))
}

fn consumers(console: &Console) {
    report("consumers", console.heading("Consumers"));
    let print = |text: &str| report("consumers", console.line(text));
    discarding_upper_case.and_then_accept(print)("Hello, World!");
}

/// Waits for every task. Failures are logged, not returned: a task never
/// decides the outcome of the run.
pub fn wait_for(tasks: Vec<TaskHandle>) {
    for task in tasks {
        let name = task.name().to_string();
        match task.join() {
            Ok(()) => tracing::debug!(task = %name, "finished"),
            Err(err) => tracing::warn!(task = %name, error = %err, "task did not finish cleanly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::ThreadLauncher;
    use std::time::Instant;

    #[test]
    fn test_captured_printer_prints_value_after_delay() {
        let (console, captured) = Console::capture();
        let started = Instant::now();
        let handle = launch_captured_printer(
            &ThreadLauncher::new(),
            &console,
            Snapshot::new(65),
            Duration::from_millis(30),
        )
        .unwrap();

        handle.join().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(captured.lines(), vec!["65"]);
    }

    #[test]
    fn test_captured_printer_cancelled_prints_nothing() {
        let (console, captured) = Console::capture();
        let handle = launch_captured_printer(
            &ThreadLauncher::new(),
            &console,
            Snapshot::new(65),
            Duration::from_secs(30),
        )
        .unwrap();

        let started = Instant::now();
        handle.cancel();
        handle.join().unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(captured.contents().is_empty());
    }

    #[test]
    fn test_run_returns_without_waiting_for_delayed_task() {
        let (console, captured) = Console::capture();
        let config = DemoConfig {
            capture_delay_ms: 2_000,
            seed: Some(1),
            ..DemoConfig::default()
        };

        let started = Instant::now();
        let tasks = run(&console, &config, &ThreadLauncher::new()).unwrap();
        assert!(started.elapsed() < Duration::from_millis(1_500));
        assert_eq!(tasks.len(), 3);
        assert!(captured.contents().contains("=== Consumers ==="));

        for task in &tasks {
            task.cancel();
        }
        wait_for(tasks);
    }

    struct ClosedPipe;

    impl io::Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_survives_failing_console() {
        let console = Console::new(ClosedPipe, false);
        let config = DemoConfig {
            capture_delay_ms: 10,
            seed: Some(1),
            ..DemoConfig::default()
        };

        let tasks = run(&console, &config, &ThreadLauncher::new()).unwrap();
        assert_eq!(tasks.len(), 3);
        for task in tasks {
            // A task whose output fails still finishes cleanly.
            task.join().unwrap();
        }
    }

    #[test]
    fn test_section_failure_does_not_skip_later_sections() {
        let (console, captured) = Console::capture();
        let config = DemoConfig {
            supplier_bound: 0,
            seed: Some(1),
            ..DemoConfig::default()
        };

        let tasks = run(&console, &config, &ThreadLauncher::new()).unwrap();
        let output = captured.contents();
        assert!(output.contains("=== Suppliers ==="));
        assert!(output.contains("=== Functions ==="));
        assert!(output.contains("Hello, World!"));

        for task in &tasks {
            task.cancel();
        }
        wait_for(tasks);
    }
}
