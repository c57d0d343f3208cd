//! Ordering records with comparison callbacks.

use crate::employee::Employee;
use itertools::Itertools;
use rayon::prelude::*;
use std::cmp::Ordering;

/// A single-method ordering capability.
///
/// Implemented by named structs and by any `Fn(&T, &T) -> Ordering`, so a
/// closure can be passed anywhere a comparator is expected.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    fn reversed(self) -> Reversed<Self>
    where
        Self: Sized,
    {
        Reversed(self)
    }

    /// Falls back to `next` when `self` considers two values equal.
    fn then_comparing<C>(self, next: C) -> ThenComparing<Self, C>
    where
        Self: Sized,
        C: Comparator<T>,
    {
        ThenComparing(self, next)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

pub struct Reversed<C>(C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reversed<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

pub struct ThenComparing<A, B>(A, B);

impl<T: ?Sized, A: Comparator<T>, B: Comparator<T>> Comparator<T> for ThenComparing<A, B> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b).then_with(|| self.1.compare(a, b))
    }
}

/// Case-sensitive lexicographic order of employee names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

impl Comparator<Employee> for ByName {
    fn compare(&self, a: &Employee, b: &Employee) -> Ordering {
        a.name().cmp(b.name())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByAge;

impl Comparator<Employee> for ByAge {
    fn compare(&self, a: &Employee, b: &Employee) -> Ordering {
        a.age().cmp(&b.age())
    }
}

/// Stable in-place sort driven by a comparator.
pub fn sort_with<T, C>(items: &mut [T], comparator: &C)
where
    C: Comparator<T> + ?Sized,
{
    items.sort_by(|a, b| comparator.compare(a, b));
}

/// Parallel version of [`sort_with`]; also stable.
pub fn par_sort_with<T, C>(items: &mut [T], comparator: &C)
where
    T: Send,
    C: Comparator<T> + Sync + ?Sized,
{
    items.par_sort_by(|a, b| comparator.compare(a, b));
}

/// True when no adjacent pair is out of order under `comparator`.
pub fn is_sorted_with<T, C>(items: &[T], comparator: &C) -> bool
where
    C: Comparator<T> + ?Sized,
{
    items
        .iter()
        .tuple_windows()
        .all(|(a, b)| comparator.compare(a, b) != Ordering::Greater)
}
