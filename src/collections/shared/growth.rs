/// The smallest number of extra elements added by [`extra_capacity`].
pub const MIN_HEADROOM: usize = 4;
/// The largest number of extra elements added by [`extra_capacity`].
pub const MAX_HEADROOM: usize = 1024;
/// The headroom is `size >> HEADROOM_SHIFT` (12.5%) before clamping.
pub const HEADROOM_SHIFT: u32 = 3;

/// Returns the capacity that a growing container allocates when it needs room for at least `size`
/// elements: `size + clamp(size >> 3, 4, 1024)`.
///
/// Repeated appends therefore cost `O(1)` on average, while the wasted space never exceeds 1024
/// elements. Exact-size operations (`reserve_exact`, `shrink_to_fit`, `repeat`) bypass this policy.
/// Saturates instead of overflowing, leaving the layout calculation to report the overflow.
///
/// # Examples
/// ```
/// # use shared_lib::collections::shared::extra_capacity;
/// assert_eq!(extra_capacity(0), 4);
/// assert_eq!(extra_capacity(100), 112);
/// assert_eq!(extra_capacity(100_000), 101_024);
/// ```
pub const fn extra_capacity(size: usize) -> usize {
    let mut headroom = size >> HEADROOM_SHIFT;
    if headroom < MIN_HEADROOM {
        headroom = MIN_HEADROOM;
    } else if headroom > MAX_HEADROOM {
        headroom = MAX_HEADROOM;
    }
    size.saturating_add(headroom)
}
