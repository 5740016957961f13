//! Total orders used to sort the elements of a [`SkipSet`][crate::SkipSet].
//!
//! The comparison **must** be well-behaved. Given some ordering function
//! `f(a, b)`, it must satisfy the following properties:
//!
//! - Be well defined: `f(a, b)` should always return the same value
//! - Be anti-symmetric: `f(a, b) == Greater` iff `f(b, a) == Less` and
//!   `f(a, b) == Equal == f(b, a)`.
//! - By transitive: If `f(a, b) == Greater` and `f(b, c) == Greater` then
//!   `f(a, c) == Greater`.
//!
//! A misbehaving comparison cannot corrupt memory, but elements may be
//! reported missing or appear out of order.

use std::cmp::Ordering;

/// A total order over `T`.
///
/// Any `Fn(&T, &T) -> Ordering` is a comparator. When passing a closure,
/// annotate its parameter types (`|a: &u32, b: &u32| b.cmp(a)`) so that it is
/// general over the lifetimes of its arguments.
pub trait Comparator<T: ?Sized> {
    /// Compare `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural ordering of `T`, as given by its [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
