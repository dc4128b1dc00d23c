//! Recursive ancestor walks over the class model graph.
//!
//! Two traversal modes exist:
//!
//! - [`dig`] follows only the superclass chain. Fields and constructors are resolved
//!   this way, since neither is inherited through interfaces.
//! - [`dig_with_interfaces`] exhausts the superclass subtree first, then recurses into
//!   the directly declared interfaces in declaration order; the first subtree that
//!   yields a hit wins and no further siblings are examined.
//!
//! In both modes the `bound` is a *stop-after* marker: the bounding class itself is
//! still probed before the walk gives up on that chain. A `bound` of `None` walks to
//! the hierarchy root, whose missing superclass terminates the recursion naturally.
//!
//! Both walkers are generic over the probe's error type and never catch or wrap a
//! probe failure; it propagates to the caller unmodified.

use crate::{
    model::{ClassPool, ClassRc},
    search::{ClassMember, SearchOutcome},
    Error,
};

/// Dig through the superclass chain of `class`, probing each class in turn.
///
/// `probe` returns `Ok(None)` to continue the walk, or a [`SearchOutcome`] to stop it;
/// the outcome is wrapped together with the class it was produced for. When the probe
/// misses on the bounding class, the walk ends with `Ok(None)`.
///
/// # Errors
///
/// Returns any error raised by `probe`, or [`Error::ClassNotFound`] (converted into
/// `E`) when a superclass link names a class missing from the pool.
pub fn dig<R, E, F>(
    pool: &ClassPool,
    class: &ClassRc,
    probe: &mut F,
    bound: Option<&ClassRc>,
) -> Result<Option<ClassMember<R>>, E>
where
    E: From<Error>,
    F: FnMut(&ClassRc) -> Result<Option<SearchOutcome<R>>, E>,
{
    // try find in class itself
    if let Some(outcome) = probe(class)? {
        return Ok(Some(ClassMember::new(class.clone(), outcome.into_value())));
    }

    // the bound is inclusive: it was probed above, but ends the chain here
    if let Some(bound_class) = bound {
        if bound_class.name() == class.name() {
            return Ok(None);
        }
    }

    match class.super_name() {
        None => Ok(None),
        Some(super_name) => {
            let super_class = pool.get(&super_name).map_err(E::from)?;
            dig(pool, &super_class, probe, bound)
        }
    }
}

/// Dig through the superclass chain *and* the interface graph of `class`.
///
/// The superclass subtree is exhausted before any interface is considered; sibling
/// interfaces are tried in declaration order and the first hit ends the walk. The
/// bound applies along the superclass chain; interface subtrees receive the same
/// bound but are typically unrelated to it and are searched until found or exhausted.
///
/// # Errors
///
/// Same contract as [`dig`].
pub fn dig_with_interfaces<R, E, F>(
    pool: &ClassPool,
    class: &ClassRc,
    probe: &mut F,
    bound: Option<&ClassRc>,
) -> Result<Option<ClassMember<R>>, E>
where
    E: From<Error>,
    F: FnMut(&ClassRc) -> Result<Option<SearchOutcome<R>>, E>,
{
    // try find in class itself
    if let Some(outcome) = probe(class)? {
        return Ok(Some(ClassMember::new(class.clone(), outcome.into_value())));
    }

    if let Some(bound_class) = bound {
        if bound_class.name() == class.name() {
            return Ok(None);
        }
    }

    if let Some(super_name) = class.super_name() {
        let super_class = pool.get(&super_name).map_err(E::from)?;
        if let Some(found) = dig_with_interfaces(pool, &super_class, probe, bound)? {
            return Ok(Some(found));
        }
    }

    for interface_name in class.interface_names() {
        let interface = pool.get(&interface_name).map_err(E::from)?;
        if let Some(found) = dig_with_interfaces(pool, &interface, probe, bound)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ClassBuilder, ClassPool},
        Result,
    };

    fn chain_pool() -> (ClassPool, ClassRc, ClassRc, ClassRc) {
        let pool = ClassPool::new();
        let (first, second, third) = crate::test::linear_hierarchy(&pool);
        (pool, first, second, third)
    }

    #[test]
    fn test_probe_errors_propagate_unmodified() {
        let (pool, _, _, third) = chain_pool();

        let result: Result<Option<ClassMember<()>>> = dig(
            &pool,
            &third,
            &mut |_| Err(crate::Error::Error("probe exploded".to_string())),
            None,
        );
        assert!(matches!(result, Err(crate::Error::Error(msg)) if msg == "probe exploded"));
    }

    #[test]
    fn test_empty_outcome_still_stops_the_walk() {
        let (pool, _, second, third) = chain_pool();

        let found: Option<ClassMember<u32>> = dig::<_, crate::Error, _>(
            &pool,
            &third,
            &mut |class| {
                Ok((class.name() == second.name()).then(SearchOutcome::empty))
            },
            None,
        )
        .unwrap();

        let member = found.expect("walk should stop at Second");
        assert_eq!(member.owner().name(), "com.example.Second");
        assert!(member.value().is_none());
    }

    #[test]
    fn test_missing_superclass_is_reported() {
        let pool = ClassPool::new();
        let dangling = ClassBuilder::new("com.example.Dangling")
            .extends("com.example.NotRegistered")
            .build(&pool)
            .unwrap();

        let result: Result<Option<ClassMember<()>>> =
            dig(&pool, &dangling, &mut |_| Ok(None), None);
        assert!(matches!(
            result,
            Err(crate::Error::ClassNotFound(name)) if name == "com.example.NotRegistered"
        ));
    }
}
