use rjr_core::errors::{ErrorInfo, RjrError};
use rjr_core::FourVector;
use tracing::trace;

use crate::group::Cardinality;

/// Outcome of the hemisphere search.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Frame slot (index into the cardinality list) of each input object.
    pub assignment: Vec<usize>,
    /// Sum of the invariant masses of the per-slot object sums.
    pub metric: f64,
}

/// Sum of the invariant masses of the slots under `assignment`.
pub fn partition_metric(objects: &[FourVector], assignment: &[usize], slots: usize) -> f64 {
    let mut sums = vec![FourVector::zero(); slots];
    for (object, &slot) in objects.iter().zip(assignment) {
        if let Some(sum) = sums.get_mut(slot) {
            *sum += *object;
        }
    }
    sums.iter().map(FourVector::mass).sum()
}

/// Exhaustive search for the assignment of `objects` to slots that satisfies
/// every cardinality and minimizes [`partition_metric`].
///
/// Assignments are visited as base-`K` numbers with object 0 as the most
/// significant digit; among equal metrics the first visited wins.
pub fn min_mass_partition(
    objects: &[FourVector],
    cardinalities: &[Cardinality],
    max_objects: usize,
) -> Result<Partition, RjrError> {
    let slots = cardinalities.len();
    let count = objects.len();
    let required: usize = cardinalities.iter().map(Cardinality::minimum).sum();
    if count < required {
        let info = ErrorInfo::new("insufficient-objects", "too few visible objects for the combinatoric group")
            .with_context("objects", count.to_string())
            .with_context("required", required.to_string());
        return Err(RjrError::Input(info));
    }
    if count > max_objects {
        let info = ErrorInfo::new("too-many-objects", "visible object count exceeds the partition search cap")
            .with_context("objects", count.to_string())
            .with_context("max_objects", max_objects.to_string())
            .with_hint("raise SolverConfig::max_objects or preselect objects");
        return Err(RjrError::Input(info));
    }
    if slots == 0 {
        return Err(RjrError::input("no-slots", "combinatoric group has no frames"));
    }
    let total = u32::try_from(count)
        .ok()
        .and_then(|exponent| (slots as u64).checked_pow(exponent))
        .ok_or_else(|| {
            let info = ErrorInfo::new("search-overflow", "assignment space is too large to enumerate")
                .with_context("objects", count.to_string())
                .with_context("slots", slots.to_string());
            RjrError::Input(info)
        })?;

    let mut assignment = vec![0usize; count];
    let mut occupancy = vec![0usize; slots];
    let mut best: Option<Partition> = None;
    for code in 0..total {
        let mut rest = code;
        occupancy.iter_mut().for_each(|n| *n = 0);
        for slot in assignment.iter_mut().rev() {
            *slot = (rest % slots as u64) as usize;
            rest /= slots as u64;
            occupancy[*slot] += 1;
        }
        let valid = cardinalities
            .iter()
            .zip(&occupancy)
            .all(|(cardinality, &n)| cardinality.accepts(n));
        if !valid {
            continue;
        }
        let metric = partition_metric(objects, &assignment, slots);
        if best.as_ref().map_or(true, |current| metric < current.metric) {
            best = Some(Partition {
                assignment: assignment.clone(),
                metric,
            });
        }
    }

    let best = best.ok_or_else(|| {
        let info = ErrorInfo::new("no-valid-assignment", "no assignment satisfies every cardinality")
            .with_context("objects", count.to_string());
        RjrError::Input(info)
    })?;
    trace!(objects = count, slots, metric = best.metric, "hemisphere assignment chosen");
    Ok(best)
}
