//! Weighted random choice.
//!
//! Every selection in the crate (rarity, equipment, consumable, material,
//! spell) builds a `(candidate, weight)` list and goes through here.
//! The draw is a single uniform value in [0, 1): it is scaled by the total
//! weight and the first entry whose cumulative weight meets or exceeds it
//! wins. Zero, negative and non-finite weights never win.

/// Index of the chosen entry, or `None` when no weight is positive.
pub fn pick_index<I>(weights: I, roll: f64) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let iter = weights.into_iter();
    let total: f64 = iter.clone().map(sanitize).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let target = roll.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;

    for (i, w) in iter.enumerate() {
        let w = sanitize(w);
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(i);
        if cumulative >= target {
            return Some(i);
        }
    }

    // Float drift can leave the final cumulative a hair below target
    last_positive
}

/// Choose a candidate from `(candidate, weight)` pairs.
pub fn pick<T>(candidates: &[(T, f64)], roll: f64) -> Option<&T> {
    pick_index(candidates.iter().map(|(_, w)| *w), roll).map(|i| &candidates[i].0)
}

/// Scale weights in place so they sum to 1.0. Returns false (and leaves the
/// slice untouched) when nothing is positive.
pub fn normalize<T>(candidates: &mut [(T, f64)]) -> bool {
    let total: f64 = candidates.iter().map(|(_, w)| sanitize(*w)).sum();
    if total <= 0.0 || !total.is_finite() {
        return false;
    }
    for (_, w) in candidates.iter_mut() {
        *w = sanitize(*w) / total;
    }
    true
}

fn sanitize(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}
