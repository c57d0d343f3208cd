//! Value-producing callbacks: one- and two-argument functions, composition,
//! unary operators and value-consuming chains.

use crate::employee::Employee;

// =============================================================================
// Composition
// =============================================================================

/// Returns a function computing `g(f(x))`.
pub fn compose<A, B, C>(f: impl Fn(A) -> B, g: impl Fn(B) -> C) -> impl Fn(A) -> C {
    move |x| g(f(x))
}

/// Method form of [`compose`] for any one-argument function.
pub trait FunctionExt<A, B>: Fn(A) -> B + Sized {
    fn and_then<C, G>(self, next: G) -> impl Fn(A) -> C
    where
        G: Fn(B) -> C,
    {
        compose(self, next)
    }
}

impl<A, B, F> FunctionExt<A, B> for F where F: Fn(A) -> B {}

// =============================================================================
// Name functions
// =============================================================================

/// Everything after the first space, or the whole name when there is none.
pub fn after_first_space(name: &str) -> &str {
    name.split_once(' ').map_or(name, |(_, rest)| rest)
}

/// Everything before the first space, or the whole name when there is none.
pub fn before_first_space(name: &str) -> &str {
    name.split_once(' ').map_or(name, |(first, _)| first)
}

pub fn last_name(employee: &Employee) -> String {
    after_first_space(employee.name()).to_string()
}

pub fn first_name(employee: &Employee) -> String {
    before_first_space(employee.name()).to_string()
}

pub fn upper_case_name(employee: &Employee) -> String {
    employee.name().to_uppercase()
}

/// Applies whichever name getter the caller picked.
pub fn get_a_name<F>(getter: F, employee: &Employee) -> String
where
    F: Fn(&Employee) -> String,
{
    getter(employee)
}

/// Two-argument function: `"{name} {age}"`.
pub fn append_age(name: &str, employee: &Employee) -> String {
    format!("{} {}", name, employee.age())
}

// =============================================================================
// String operations
// =============================================================================

/// Single-method capability over two strings.
pub trait StringOperation {
    fn upper_and_concat(&self, first: &str, second: &str) -> String;
}

impl<F> StringOperation for F
where
    F: Fn(&str, &str) -> String,
{
    fn upper_and_concat(&self, first: &str, second: &str) -> String {
        self(first, second)
    }
}

/// The explicit-type implementation; a closure does the same job.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperConcat;

impl StringOperation for UpperConcat {
    fn upper_and_concat(&self, first: &str, second: &str) -> String {
        first.to_uppercase() + &second.to_uppercase()
    }
}

pub fn do_string_operation(op: &impl StringOperation, first: &str, second: &str) -> String {
    op.upper_and_concat(first, second)
}

// =============================================================================
// Unary operators
// =============================================================================

pub fn inc_by(step: i32) -> impl Fn(i32) -> i32 + Copy {
    move |value: i32| value + step
}

// =============================================================================
// Consumers
// =============================================================================

/// Callbacks that take a value and return nothing.
///
/// Chaining hands each stage the original input. Whatever a stage computes
/// is dropped, so an upper-casing stage ahead of a printing stage has no
/// visible effect.
pub trait ConsumerExt<T: ?Sized>: Fn(&T) + Sized {
    fn and_then_accept<C>(self, next: C) -> impl Fn(&T)
    where
        C: Fn(&T),
    {
        move |value: &T| {
            self(value);
            next(value);
        }
    }
}

impl<T: ?Sized, F> ConsumerExt<T> for F where F: Fn(&T) {}

/// A consumer that upper-cases its input and throws the result away.
pub fn discarding_upper_case(text: &str) {
    let _ = text.to_uppercase();
}
