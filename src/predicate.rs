//! Boolean tests over values and the filtering printer built on them.

use crate::console::Console;
use crate::employee::Employee;
use std::io;

/// Combinators for any `Fn(&T) -> bool`.
pub trait PredicateExt<T: ?Sized>: Fn(&T) -> bool + Sized {
    fn and<P>(self, other: P) -> impl Fn(&T) -> bool
    where
        P: Fn(&T) -> bool,
    {
        move |value: &T| self(value) && other(value)
    }

    fn or<P>(self, other: P) -> impl Fn(&T) -> bool
    where
        P: Fn(&T) -> bool,
    {
        move |value: &T| self(value) || other(value)
    }

    fn negate(self) -> impl Fn(&T) -> bool {
        move |value: &T| !self(value)
    }
}

impl<T: ?Sized, F> PredicateExt<T> for F where F: Fn(&T) -> bool {}

pub fn greater_than(bound: i32) -> impl Fn(&i32) -> bool + Copy {
    move |value: &i32| *value > bound
}

pub fn less_than(bound: i32) -> impl Fn(&i32) -> bool + Copy {
    move |value: &i32| *value < bound
}

/// Employees accepted by `condition`, in input order.
pub fn matching<'a, P>(
    employees: &'a [Employee],
    condition: P,
) -> impl Iterator<Item = &'a Employee> + 'a
where
    P: Fn(&Employee) -> bool + 'a,
{
    employees.iter().filter(move |employee| condition(employee))
}

/// Prints the label, a rule, then name, age and a blank line for every match.
/// Returns how many employees were printed.
pub fn print_employees_by_age<P>(
    console: &Console,
    employees: &[Employee],
    label: &str,
    condition: P,
) -> io::Result<usize>
where
    P: Fn(&Employee) -> bool,
{
    console.line(label)?;
    console.line("----------------------------")?;
    let mut printed = 0;
    for employee in matching(employees, condition) {
        console.line(employee.name())?;
        console.line(employee.age())?;
        console.blank()?;
        printed += 1;
    }
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::sample_roster;
    use proptest::prelude::*;

    #[test]
    fn test_int_predicates() {
        let greater_than_15 = greater_than(15);
        let less_than_100 = less_than(100);
        assert!(greater_than_15(&20));
        assert!(less_than_100(&99));
        assert!(greater_than_15.and(less_than_100)(&44));
        assert!(!greater_than_15.and(less_than_100)(&100));
    }

    #[test]
    fn test_or_and_negate() {
        let outside = less_than(0).or(greater_than(10));
        assert!(outside(&-1));
        assert!(outside(&11));
        assert!(!outside(&5));

        let inside = outside.negate();
        assert!(inside(&5));
        assert!(!inside(&11));
    }

    #[test]
    fn test_print_over_30() {
        let (console, captured) = Console::capture();
        let roster = sample_roster();
        let printed =
            print_employees_by_age(&console, &roster, "Employees over 30 : ", |e| e.age() > 30)
                .unwrap();

        assert_eq!(printed, 2);
        assert_eq!(
            captured.lines(),
            vec![
                "Employees over 30 : ",
                "----------------------------",
                "Jimmy Quartz",
                "44",
                "",
                "Clive Ruby",
                "33",
                "",
            ]
        );
    }

    #[test]
    fn test_no_match_prints_only_header() {
        let (console, captured) = Console::capture();
        let printed =
            print_employees_by_age(&console, &sample_roster(), "Nobody", |e| e.age() > 100)
                .unwrap();
        assert_eq!(printed, 0);
        assert_eq!(captured.lines().len(), 2);
    }

    #[test]
    fn test_source_is_untouched() {
        let roster = sample_roster();
        let (console, _captured) = Console::capture();
        print_employees_by_age(&console, &roster, "under 30", |e| e.age() < 30).unwrap();
        assert_eq!(roster, sample_roster());
    }

    proptest! {
        #[test]
        fn test_filter_prints_exactly_the_matches(ages in prop::collection::vec(-10i32..80, 0..30)) {
            let roster: Vec<Employee> = ages
                .iter()
                .enumerate()
                .map(|(i, age)| Employee::new(format!("e{i}"), *age))
                .collect();

            let (console, captured) = Console::capture();
            let printed = print_employees_by_age(&console, &roster, "label", |e| e.age() > 30).unwrap();

            let expected: Vec<&Employee> = roster.iter().filter(|e| e.age() > 30).collect();
            prop_assert_eq!(printed, expected.len());

            let lines = captured.lines();
            let printed_names: Vec<&str> = lines[2..].iter().step_by(3).map(String::as_str).collect();
            let expected_names: Vec<&str> = expected.iter().map(|e| e.name()).collect();
            prop_assert_eq!(printed_names, expected_names);
        }
    }
}
